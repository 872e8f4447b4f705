use crate::db::models::{NewPost, Post};
use crate::error::AppResult;
use crate::media::MediaStore;
use crate::posts::repository;
use crate::posts::validation::ValidSubmission;
use crate::state::DbPool;

/// Store the image, then record the post.
///
/// The row is only written once the file is on disk. If the insert fails the
/// file is removed again.
pub async fn store_submission(
    db: &DbPool,
    media: &MediaStore,
    submission: ValidSubmission,
) -> AppResult<Post> {
    let key = MediaStore::generate_key(&submission.extension);
    media.save(&key, &submission.bytes).await?;

    let new_post = NewPost {
        name: submission.name,
        description: submission.description,
        image_filename: key.clone(),
    };

    match insert(db, &new_post) {
        Ok(post) => {
            tracing::info!(
                post_id = post.id,
                image = %post.image_filename,
                kind = %submission.kind,
                size = submission.bytes.len(),
                "Post created"
            );
            Ok(post)
        }
        Err(e) => {
            media.remove(&key).await;
            Err(e)
        }
    }
}

fn insert(db: &DbPool, new_post: &NewPost) -> AppResult<Post> {
    let conn = db.get()?;
    Ok(repository::insert_post(&conn, new_post)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageKind;
    use bytes::Bytes;
    use r2d2::Pool;
    use r2d2_sqlite::SqliteConnectionManager;

    fn test_pool() -> DbPool {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).unwrap();
        crate::db::run_migrations(&pool).unwrap();
        pool
    }

    fn valid() -> ValidSubmission {
        ValidSubmission {
            name: "Alice".into(),
            description: "hello".into(),
            extension: "png".into(),
            kind: ImageKind::Png,
            bytes: Bytes::from_static(b"image bytes"),
        }
    }

    fn files_in(dir: &std::path::Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn stores_file_and_row_with_matching_name() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());
        let pool = test_pool();

        let post = store_submission(&pool, &media, valid()).await.unwrap();

        assert_eq!(files_in(tmp.path()), vec![post.image_filename.clone()]);
        assert!(post.image_filename.ends_with(".png"));
        assert_eq!(
            std::fs::read(media.path_of(&post.image_filename)).unwrap(),
            b"image bytes"
        );
        let conn = pool.get().unwrap();
        assert_eq!(repository::count_posts(&conn).unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_file_write_creates_no_row() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path().join("does-not-exist"));
        let pool = test_pool();

        assert!(store_submission(&pool, &media, valid()).await.is_err());

        let conn = pool.get().unwrap();
        assert_eq!(repository::count_posts(&conn).unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_insert_removes_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());
        // No migrations: the posts table is missing
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())
            .unwrap();

        assert!(store_submission(&pool, &media, valid()).await.is_err());
        assert!(files_in(tmp.path()).is_empty());
    }
}
