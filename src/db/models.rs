/// URL prefix under which stored images are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image_filename: String,
    pub created_at: String,
}

impl Post {
    pub fn image_url(&self) -> String {
        format!("{}/{}", UPLOADS_URL_PREFIX, self.image_filename)
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub name: String,
    pub description: String,
    pub image_filename: String,
}
