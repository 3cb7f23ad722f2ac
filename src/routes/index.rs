use axum::{response::Html, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::fmt::Write;

use crate::{protocol::UPLOAD_TIME_FMT, state::AppState, store::UploadedFile};

#[derive(Serialize)]
struct FileJson {
    name: String,
    size: u64,
    time: String,
}

impl From<UploadedFile> for FileJson {
    fn from(f: UploadedFile) -> Self {
        Self { time: f.uploaded_at.format(UPLOAD_TIME_FMT).to_string(), name: f.name, size: f.size }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/files", get(list_files))
}

async fn list_files(Extension(st): Extension<AppState>) -> Json<Vec<FileJson>> {
    Json(st.store.snapshot().await.into_iter().map(FileJson::from).collect())
}

/* 頁面模板不在這裡做，只吐最基本的清單 + 連線網址 */
async fn index(Extension(st): Extension<AppState>) -> Html<String> {
    let files = st.store.snapshot().await;
    let mut rows = String::new();
    for f in &files {
        // 檔名已經清洗過，只含 [A-Za-z0-9._-]
        let _ = write!(
            rows,
            r#"<li><a href="/download/{n}">{n}</a> ({s} bytes, {t})</li>"#,
            n = f.name,
            s = f.size,
            t = f.uploaded_at.format(UPLOAD_TIME_FMT),
        );
    }

    Html(format!(
        concat!(
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>LAN Hub</title></head><body>",
            "<p>Connect: <a href=\"{url}\">{url}</a></p>",
            "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">",
            "<input type=\"file\" name=\"file\"><button>Upload</button></form>",
            "<ul id=\"files\">{rows}</ul></body></html>"
        ),
        url = st.server_url,
        rows = rows,
    ))
}
