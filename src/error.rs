pub const SCRAPE_FALLBACK_MESSAGE: &str = "Failed to scrape data";
pub const TRANSPORT_MESSAGE: &str =
    "An error occurred while scraping. Please check your connection and try again.";
pub const EXPORT_MESSAGE: &str = "Failed to export data";
pub const BUSY_MESSAGE: &str = "A scrape request is already in progress";

#[derive(Debug, thiserror::Error)]
pub enum PresenterError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Another request is in flight")]
    Busy,

    #[error("Backend reported an error: {0}")]
    Application(String),

    #[error("Failed to reach backend: {0}")]
    Transport(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PresenterError {
    /// Text shown to the user on the view. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            PresenterError::Validation(msg) => msg.clone(),
            PresenterError::Busy => BUSY_MESSAGE.to_string(),
            PresenterError::Application(msg) => msg.clone(),
            PresenterError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
            PresenterError::Export(_) => EXPORT_MESSAGE.to_string(),
            PresenterError::Config(msg) => format!("Configuration error: {}", msg),
            PresenterError::Io(_) => EXPORT_MESSAGE.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PresenterError::Validation(_) => ErrorKind::Validation,
            PresenterError::Busy => ErrorKind::Busy,
            PresenterError::Application(_) => ErrorKind::Application,
            PresenterError::Transport(_) => ErrorKind::Transport,
            PresenterError::Export(_) | PresenterError::Io(_) => ErrorKind::Export,
            PresenterError::Config(_) => ErrorKind::Config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Busy,
    Application,
    Transport,
    Export,
    Config,
}

impl From<reqwest::Error> for PresenterError {
    fn from(err: reqwest::Error) -> Self {
        PresenterError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for PresenterError {
    fn from(err: serde_json::Error) -> Self {
        PresenterError::Transport(format!("Malformed response: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PresenterError>;
