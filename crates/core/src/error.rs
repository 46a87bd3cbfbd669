use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {details}")]
    Status { status: u16, details: String },

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("regex error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("unknown mode: {0}")]
    InvalidMode(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T, E = PanelError> = std::result::Result<T, E>;
