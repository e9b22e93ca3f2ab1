use finstat::FinstatError;

/// Exit code for configuration and input data problems
pub const EXIT_USER_ERROR: i32 = 1;
/// Exit code for everything else
pub const EXIT_INTERNAL_ERROR: i32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("{0}")]
    Config(String),
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),
    #[error(transparent)]
    Finstat(#[from] FinstatError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConnectorError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ConnectorError::Config(_) | ConnectorError::MissingParameters(_) => EXIT_USER_ERROR,
            ConnectorError::Finstat(e) if e.is_user_error() => EXIT_USER_ERROR,
            _ => EXIT_INTERNAL_ERROR,
        }
    }
}
