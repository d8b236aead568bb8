use reqwest::StatusCode;

/// Errors produced by the registry client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response (connect, TLS, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry answered with a non-success status.
    #[error("registry api error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    /// The selected operation needs a parameter the item did not supply.
    #[error("operation '{operation}' requires parameter '{parameter}'")]
    MissingParameter {
        operation: &'static str,
        parameter: &'static str,
    },

    /// The operation name is not one the registry supports.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The configured auth header name or value is not a valid HTTP header.
    #[error("invalid auth header: {0}")]
    InvalidHeader(String),

    /// Item parameters could not be read.
    #[error("invalid item parameters: {0}")]
    InvalidParameters(#[from] serde_json::Error),

    /// A failure while executing a specific input item.
    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// HTTP status of the failed call, when the registry answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status(),
            Error::Item { source, .. } => source.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
