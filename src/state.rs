use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::flash::FlashKey;
use crate::media::{DecodingValidator, ImageValidator, MediaStore};

pub type DbPool = Pool<SqliteConnectionManager>;

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub media: MediaStore,
    pub validator: Arc<dyn ImageValidator>,
    pub flash_key: FlashKey,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        let media = MediaStore::new(config.uploads_path());
        let flash_key = FlashKey::derive(&config.security.secret_key);
        Self {
            db,
            config,
            media,
            validator: Arc::new(DecodingValidator),
            flash_key,
        }
    }

    /// Swap the image validator, e.g. for a stricter or a fake one.
    pub fn with_validator(mut self, validator: Arc<dyn ImageValidator>) -> Self {
        self.validator = validator;
        self
    }
}
