use reqwest::StatusCode;

/// Errors surfaced by [`crate::HnClient`] operations.
///
/// Nothing is retried internally; callers polling for possibly deleted entities should treat
/// `NotFound` as ordinary control flow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-supplied identifier cannot be used (e.g. non-numeric or negative item id).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Server answered with a success status but an empty or null payload.
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    /// Non-success HTTP status (`status` set) or transport failure (`status` is `None`).
    #[error("http error{}: {message}", status_suffix(.status))]
    Http {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http {
            status: e.status(),
            message: e.to_string(),
        }
    }
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Error::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Stable snake_case code, suitable for logs and machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::NotFound { .. } => "not_found",
            Error::Http {
                status: Some(s), ..
            } => status_code_label(*s),
            Error::Http { status: None, .. } => "transport_error",
            Error::Decode(_) => "decode_error",
            Error::Config(_) => "config_error",
        }
    }
}

fn status_suffix(status: &Option<StatusCode>) -> String {
    status.map(|s| format!(" {}", s)).unwrap_or_default()
}

pub fn status_code_label(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::TOO_MANY_REQUESTS => "rate_limited",
        s if s.is_server_error() => "upstream_error",
        _ => "http_error",
    }
}
