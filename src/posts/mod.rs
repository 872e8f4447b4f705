pub mod ingest;
pub mod repository;
pub mod validation;

pub use validation::{ImageUpload, Rejection, Submission, ValidSubmission};
