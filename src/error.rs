#[derive(Debug, thiserror::Error)]
pub enum TcgError {
    #[error("Bad response: HTTP {status} from {url}")]
    BadResponse { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown card category: {0}")]
    UnknownCategory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of a [`TcgError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-200 status or a network-layer fault.
    Transport,
    /// Payload did not match the expected shape.
    Decoding,
    /// Detail discriminator not recognized.
    UnknownCategory,
    Other,
}

impl TcgError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TcgError::BadResponse { .. } => ErrorKind::Transport,
            TcgError::Http(e) if e.is_decode() => ErrorKind::Decoding,
            TcgError::Http(_) => ErrorKind::Transport,
            TcgError::Json(_) => ErrorKind::Decoding,
            TcgError::UnknownCategory(_) => ErrorKind::UnknownCategory,
            TcgError::Io(_) | TcgError::InvalidArgument(_) => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TcgError>;
