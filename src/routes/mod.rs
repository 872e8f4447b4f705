pub mod assets;
pub mod home;
pub mod upload;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::db::models::UPLOADS_URL_PREFIX;
use crate::state::AppState;

/// The whole HTTP surface, ready to serve.
pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.media.dir());

    Router::new()
        .route("/", get(home::index))
        .route("/assets/{*path}", get(assets::serve))
        .merge(upload::router())
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
