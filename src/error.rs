use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures talking to the document store.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer from the API. Displays only the API's own message.
    #[error("{message}")]
    Api { status: u16, code: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// The submission could not be turned into a record.
    #[error("{0}")]
    Build(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("property `{0}` is not declared on the database")]
    MissingProperty(String),

    #[error("property `{id}` is not a {expected} property")]
    WrongPropertyKind { id: String, expected: &'static str },
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Build(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<TranslateError> for AppError {
    fn from(err: TranslateError) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "message": self.to_string() });
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
