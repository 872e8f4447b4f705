use rusqlite::{params, Connection, Row};

use crate::db::models::{NewPost, Post};

const POST_COLUMNS: &str = "id, name, description, image_filename, created_at";

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        image_filename: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a post and return it with the store-assigned id and timestamp.
pub fn insert_post(conn: &Connection, post: &NewPost) -> rusqlite::Result<Post> {
    conn.query_row(
        &format!(
            "INSERT INTO posts (name, description, image_filename)
             VALUES (?1, ?2, ?3)
             RETURNING {POST_COLUMNS}"
        ),
        params![post.name, post.description, post.image_filename],
        post_from_row,
    )
}

/// Every post, newest first. Equal timestamps fall back to insertion order.
pub fn list_posts(conn: &Connection) -> rusqlite::Result<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
    ))?;
    let posts = stmt
        .query_map([], post_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(posts)
}

#[cfg(test)]
pub fn count_posts(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
}
