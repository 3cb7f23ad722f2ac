use axum::{extract::DefaultBodyLimit, Extension, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{config::Config, state::AppState};

pub mod download;
pub mod index;
pub mod upload;
pub mod ws;

// multipart 邊界 + 表頭的額外空間；實際檔案上限由 gateway 逐塊檢查
const MULTIPART_SLACK: u64 = 64 * 1024;

pub fn router() -> Router {
    Router::new()
        .merge(index::router())
        .merge(upload::router())
        .merge(download::router())
        .merge(ws::router())
}

pub fn app(state: AppState, cfg: &Config) -> Router {
    let body_limit = usize::try_from(cfg.max_upload_bytes.saturating_add(MULTIPART_SLACK))
        .unwrap_or(usize::MAX);

    router()
        .nest_service("/static", ServeDir::new(&cfg.static_dir))
        .layer(Extension(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
