// Library exports for the confession board
// Integration tests drive the router through these modules

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod flash;
pub mod media;
pub mod posts;
pub mod routes;
pub mod state;
