pub mod store;
pub mod validator;

pub use store::MediaStore;
pub use validator::{DecodingValidator, ImageKind, ImageValidator};
