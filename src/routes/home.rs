use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{NaiveDateTime, Utc};

use crate::db::models::Post;
use crate::error::AppResult;
use crate::extractors::IncomingFlash;
use crate::flash::{self, Flash};
use crate::posts::repository;
use crate::state::AppState;

/// What the listing shows for one post.
pub struct PostView {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub timestamp: String,
    pub relative_time: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        let image_url = post.image_url();
        Self {
            relative_time: parse_and_format_time(&post.created_at),
            name: post.name,
            description: post.description,
            image_url,
            timestamp: post.created_at,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub posts: Vec<PostView>,
    pub flash: Option<Flash>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Render a page, clearing the flash cookie when the page displayed one.
pub fn render_page<T: Template>(page: T, shown_flash: bool) -> Response {
    if shown_flash {
        ([(header::SET_COOKIE, flash::clear_cookie())], Html(page)).into_response()
    } else {
        Html(page).into_response()
    }
}

pub async fn index(
    State(state): State<AppState>,
    IncomingFlash(flash): IncomingFlash,
) -> AppResult<Response> {
    let posts = {
        let conn = state.db.get()?;
        repository::list_posts(&conn)?
    };

    let shown_flash = flash.is_some();
    let page = IndexTemplate {
        posts: posts.into_iter().map(PostView::from).collect(),
        flash,
    };
    Ok(render_page(page, shown_flash))
}

// --- Time formatting ---

fn parse_and_format_time(db_time: &str) -> String {
    NaiveDateTime::parse_from_str(db_time, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| format_relative_time(&dt))
        .unwrap_or_else(|_| db_time.to_string())
}

pub fn format_relative_time(dt: &NaiveDateTime) -> String {
    let now = Utc::now().naive_utc();
    let diff = now.signed_duration_since(*dt);

    let seconds = diff.num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = diff.num_minutes();
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = diff.num_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = diff.num_days();
    if days < 7 {
        return format!("{}d ago", days);
    }

    dt.format("%b %-d, %Y").to_string()
}
