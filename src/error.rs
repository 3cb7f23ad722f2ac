use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

pub type AppResult<T> = Result<T, AppErr>;

#[derive(thiserror::Error, Debug)]
pub enum AppErr {
    #[error("no file part in request")]
    MissingFile,

    #[error("empty filename")]
    EmptyFilename,

    #[error("payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed upload: {0}")]
    Malformed(String),
}

impl AppErr {
    pub fn too_large_message(limit: u64) -> String {
        format!("File is too large! Maximum size is {}MB", limit / (1024 * 1024))
    }
}

impl IntoResponse for AppErr {
    fn into_response(self) -> Response {
        match self {
            /* 使用者沒選檔：跟原本一樣回首頁 */
            AppErr::MissingFile | AppErr::EmptyFilename => Redirect::to("/").into_response(),
            AppErr::PayloadTooLarge { limit } => {
                (StatusCode::PAYLOAD_TOO_LARGE, Self::too_large_message(limit)).into_response()
            }
            AppErr::NotFound(_) => (StatusCode::NOT_FOUND, "File not found").into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Upload failed: {other}"),
            )
                .into_response(),
        }
    }
}

/* ── 小助手：multipart 錯誤 → AppErr，保留 413 ── */
pub fn multipart(e: axum::extract::multipart::MultipartError, limit: u64) -> AppErr {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppErr::PayloadTooLarge { limit }
    } else {
        AppErr::Malformed(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (AppErr::MissingFile, StatusCode::SEE_OTHER),
            (AppErr::EmptyFilename, StatusCode::SEE_OTHER),
            (AppErr::PayloadTooLarge { limit: 1 }, StatusCode::PAYLOAD_TOO_LARGE),
            (AppErr::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppErr::Malformed("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppErr::Storage(std::io::Error::other("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.into_response().status(), code);
        }
    }

    #[test]
    fn too_large_message_uses_configured_limit() {
        assert_eq!(
            AppErr::too_large_message(500 * 1024 * 1024),
            "File is too large! Maximum size is 500MB"
        );
    }
}
