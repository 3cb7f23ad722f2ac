use axum::{extract::multipart::Multipart, response::Redirect, routing::post, Extension, Router};
use futures_util::StreamExt;
use tracing::error;

use crate::{
    error::{self, AppErr, AppResult},
    state::AppState,
    utils::sanitize,
};

pub fn router() -> Router {
    Router::new().route("/upload", post(upload_file))
}

pub async fn upload_file(
    Extension(st): Extension<AppState>,
    mut mp: Multipart,
) -> AppResult<Redirect> {
    let limit = st.gateway.max_upload();

    while let Some(field) = mp.next_field().await.map_err(|e| error::multipart(e, limit))? {
        if field.name() != Some("file") {
            continue;
        }

        let name = sanitize::filename(field.file_name().unwrap_or_default());
        if name.is_empty() {
            return Err(AppErr::EmptyFilename);
        }

        let body = field.map(move |chunk| chunk.map_err(|e| error::multipart(e, limit)));
        return match st.gateway.handle_upload(&name, body).await {
            Ok(_) => Ok(Redirect::to("/")),
            Err(e) => {
                error!(name = %name, error = %e, "upload failed");
                Err(e)
            }
        };
    }

    Err(AppErr::MissingFile)
}
