use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// What the view layer gets to know about a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Status(u16),
    Decode,
    Io,
    Config,
}

impl AppError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            AppError::Http(e) if e.is_decode() => FetchErrorKind::Decode,
            AppError::Http(e) => match e.status() {
                Some(s) => FetchErrorKind::Status(s.as_u16()),
                None => FetchErrorKind::Network,
            },
            AppError::Status { status, .. } => FetchErrorKind::Status(*status),
            AppError::Json(_) => FetchErrorKind::Decode,
            AppError::Io(_) => FetchErrorKind::Io,
            AppError::Config(_) => FetchErrorKind::Config,
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::Network => write!(f, "network failure"),
            FetchErrorKind::Status(s) => write!(f, "server returned {s}"),
            FetchErrorKind::Decode => write!(f, "unreadable response"),
            FetchErrorKind::Io => write!(f, "local IO failure"),
            FetchErrorKind::Config => write!(f, "misconfiguration"),
        }
    }
}
