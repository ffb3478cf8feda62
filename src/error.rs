use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum GaError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analytics API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Token exchange failed: {0}")]
    Token(String),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Response contained no metric value")]
    EmptyReport,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GaError>;

impl GaError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        GaError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl fmt::Display) -> Self {
        GaError::Config(message.to_string())
    }

    /// Short tag used when logging a per-window failure, so transport
    /// problems can be told apart from bad response shapes in the logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GaError::Http(_) => "transport",
            GaError::Api { .. } => "api",
            GaError::Token(_) | GaError::Jwt(_) => "auth",
            GaError::EmptyReport => "empty-report",
            GaError::Json(_) => "decode",
            GaError::Config(_) => "config",
            GaError::Io(_) => "io",
            GaError::Csv(_) => "csv",
        }
    }
}
