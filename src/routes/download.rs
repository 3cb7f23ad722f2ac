use axum::{
    body::Body,
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use tokio_util::io::ReaderStream;

use crate::{error::AppResult, state::AppState};

pub fn router() -> Router {
    Router::new().route("/download/:filename", get(download))
}

async fn download(
    Extension(st): Extension<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let (file, len) = st.gateway.handle_download(&filename).await?;
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_LENGTH, len.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
