#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Failed to write output: {0}")]
    ExportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ExportError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ExportError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ExportError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
