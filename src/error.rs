use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised at the collection-server API boundary.
///
/// Every gateway operation resolves to exactly one of these variants, so
/// callers can tell "log in again" apart from "the server said no" and
/// "the network ate it" without inspecting message strings.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// No token or base URL in the session snapshot. Raised before any
    /// network call is attempted.
    #[error("missing session credentials, log in again")]
    PreconditionMissing,

    /// The stored token expiry is in the past.
    #[error("session expired, log in again")]
    AuthExpired,

    /// The server answered with a 401/403-class status.
    #[error("authentication rejected by server")]
    AuthRejected,

    /// Any other non-success HTTP status.
    #[error("server rejected the request: HTTP {0}")]
    ServerRejected(u16),

    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("network failure: {0}")]
    Network(String),

    /// The response body (or a QR payload) did not decode into the
    /// expected shape, or a 2xx response carried a failure envelope.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ApiError {
    /// Whether this error must force the caller back to re-authentication.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::PreconditionMissing | ApiError::AuthExpired | ApiError::AuthRejected
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::MalformedPayload(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
