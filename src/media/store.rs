use rand::Rng;
use std::path::{Path, PathBuf};

/// Owns the directory that uploaded images are written to.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if it does not exist yet.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Random 128-bit hex token followed by `.{extension}`.
    ///
    /// The client-supplied file name never reaches the disk.
    pub fn generate_key(extension: &str) -> String {
        let mut rng = rand::thread_rng();
        let bytes: [u8; 16] = rng.gen();
        format!("{}.{}", hex::encode(bytes), extension)
    }

    pub fn path_of(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Write `bytes` under `key`. Fails if a file with that key already exists.
    ///
    /// A write that fails part way removes the partial file again.
    pub async fn save(&self, key: &str, bytes: &[u8]) -> std::io::Result<()> {
        use tokio::io::AsyncWriteExt;

        self.write_new(key, |mut file| async move {
            file.write_all(bytes).await?;
            file.sync_all().await
        })
        .await
    }

    async fn write_new<F, Fut>(&self, key: &str, write: F) -> std::io::Result<()>
    where
        F: FnOnce(tokio::fs::File) -> Fut,
        Fut: std::future::Future<Output = std::io::Result<()>>,
    {
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_of(key))
            .await?;

        if let Err(e) = write(file).await {
            self.remove(key).await;
            return Err(e);
        }
        Ok(())
    }

    /// Best-effort removal, used to undo a save whose metadata never landed.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = tokio::fs::remove_file(self.path_of(key)).await {
            tracing::warn!("Failed to remove orphaned upload {}: {}", key, e);
        }
    }
}
