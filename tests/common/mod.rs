#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use confessions::config::{Cli, Config};
use confessions::db;
use confessions::routes;
use confessions::state::AppState;
use image::{ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "----confessions-test-boundary";

/// An isolated app: its own database file and uploads directory.
pub struct TestApp {
    pub state: AppState,
    pub app: Router,
    _tmp: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(|state| state)
    }

    pub fn build(customize: impl FnOnce(AppState) -> AppState) -> Self {
        let tmp = TempDir::new().unwrap();
        let cli = Cli {
            config: None,
            host: None,
            port: None,
            data_dir: Some(tmp.path().to_path_buf()),
        };
        let config = Config::load_with_env(&cli, |_| None).unwrap();
        let pool = db::create_pool(&config.db_path()).unwrap();
        db::run_migrations(&pool).unwrap();

        let state = customize(AppState::new(pool, config));
        state.media.ensure_dir().unwrap();
        let app = routes::app(state.clone());

        Self {
            state,
            app,
            _tmp: tmp,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn upload(&self, parts: &[Part<'_>]) -> Response<Body> {
        self.send(upload_request(multipart_body(parts), true)).await
    }

    pub fn post_count(&self) -> i64 {
        let conn = self.state.db.get().unwrap();
        conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .unwrap()
    }

    pub fn stored_filenames(&self) -> Vec<String> {
        let conn = self.state.db.get().unwrap();
        let mut stmt = conn
            .prepare("SELECT image_filename FROM posts ORDER BY id")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    pub fn files_on_disk(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.uploads_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.state.media.dir().to_path_buf()
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
    /// A part with no `filename` attribute.
    Raw(&'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Raw(name, bytes) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(body: Vec<u8>, with_content_length: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if with_content_length {
        builder = builder.header(header::CONTENT_LENGTH, body.len());
    }
    builder.body(Body::from(body)).unwrap()
}

/// A noisy RGB PNG; 128x128 comes out at roughly 50 KiB.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut seed: u32 = 0x1234_5678;
    let img = RgbImage::from_fn(width, height, |_, _| {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let [r, g, b, _] = seed.to_be_bytes();
        Rgb([r, g, b])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn jpeg_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(16, 16, Rgb([200, 40, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// `name=value` from the response's Set-Cookie header, ready to send back.
pub fn flash_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set the flash cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should redirect")
        .to_str()
        .unwrap()
}
