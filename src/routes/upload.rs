use std::sync::Arc;

use askama::Template;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::error::{AppError, AppResult};
use crate::extractors::IncomingFlash;
use crate::flash::{self, Flash};
use crate::posts::ingest;
use crate::posts::validation::{ALLOWED_EXTENSIONS, MAX_UPLOAD_BYTES};
use crate::posts::{ImageUpload, Rejection, Submission};
use crate::routes::home::render_page;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/upload.html")]
pub struct UploadTemplate {
    pub flash: Option<Flash>,
    pub accept: String,
    pub max_upload_mb: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", get(upload_form).post(submit))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

async fn upload_form(IncomingFlash(flash): IncomingFlash) -> Response {
    let shown_flash = flash.is_some();
    let page = UploadTemplate {
        flash,
        accept: ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(","),
        max_upload_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
    };
    render_page(page, shown_flash)
}

async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> AppResult<Response> {
    // Refuse an oversized body before reading any of it
    if declared_length(&headers).is_some_and(|len| len > MAX_UPLOAD_BYTES as u64) {
        return Ok(reject(&state, Rejection::TooLarge));
    }

    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Ok(reject(&state, Rejection::TooLarge));
        }
        Err(e) => {
            tracing::debug!("Malformed multipart upload: {}", e);
            return Err(AppError::BadRequest(e.body_text()));
        }
    };

    // Decoding a full image is CPU-bound
    let validator = Arc::clone(&state.validator);
    let verdict = tokio::task::spawn_blocking(move || submission.validate(validator.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("Image validation task failed: {e}")))?;

    let valid = match verdict {
        Ok(valid) => valid,
        Err(rejection) => return Ok(reject(&state, rejection)),
    };

    ingest::store_submission(&state.db, &state.media, valid).await?;

    Ok(flash::redirect_with(
        &state.flash_key,
        "/",
        Flash::success("Posted successfully!"),
    ))
}

fn reject(state: &AppState, rejection: Rejection) -> Response {
    tracing::debug!(?rejection, "Submission rejected");
    flash::redirect_with(&state.flash_key, "/upload", Flash::error(rejection.to_string()))
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Collect the form fields. The first occurrence of each field wins and
/// unknown fields are skipped.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, MultipartError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" if submission.name.is_none() => {
                submission.name = Some(field.text().await?);
            }
            "description" if submission.description.is_none() => {
                submission.description = Some(field.text().await?);
            }
            "image" if submission.image.is_none() => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                submission.image = Some(ImageUpload { file_name, bytes });
            }
            _ => continue,
        }
    }

    Ok(submission)
}
