use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur in Lojistas.
/// It uses the `thiserror` crate for ergonomic error handling and automatic
/// conversion from underlying library errors.
///
/// # Error Conversion
///
/// - `sqlx::Error` → `AppError::DatabaseError`
/// - `serde_json::Error` → `AppError::SerializationError`
///
/// # Examples
///
/// ```no_run
/// use lojistas_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::Generic("Something went wrong".to_string()))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed.
    ///
    /// Wraps all errors from SQLx operations: connection failures, query
    /// errors and constraint violations.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// HTTP client request failed.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// The shopping-search provider answered with an error.
    ///
    /// `status` carries the provider's HTTP status when it sent one, so the
    /// gateway can echo it back to its caller.
    #[error("Provider error: {message}")]
    ProviderError { status: Option<u16>, message: String },

    /// The provider answered successfully but without a listings array.
    ///
    /// Holds the provider's own message when it sent one.
    #[error("{}", .0.as_deref().unwrap_or("No results found"))]
    NoListings(Option<String>),

    /// User input rejected before any I/O.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network or connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Settings file could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::DatabaseError(e) => {
                if e.to_string().contains("connection") {
                    "Cannot connect to database. Is PostgreSQL running?\n   Check DATABASE_URL."
                        .to_string()
                } else {
                    format!("Database error: {}", e)
                }
            }
            AppError::ClientError(msg) => {
                if msg.contains("connect") {
                    format!(
                        "Cannot reach the search gateway: {}\n   Is lojistas-gateway running? Check GATEWAY_URL.",
                        msg
                    )
                } else {
                    format!("API error: {}", msg)
                }
            }
            AppError::ProviderError { status, message } => match status {
                Some(401) | Some(403) => {
                    "The shopping search provider rejected the API key.\n   Check SERPAPI_KEY on the gateway."
                        .to_string()
                }
                Some(429) => {
                    "The shopping search provider is rate limiting requests.\n   Wait a moment and try again."
                        .to_string()
                }
                _ => format!("Search provider error: {}", message),
            },
            AppError::ValidationError(msg) => msg.clone(),
            AppError::NetworkError(msg) => {
                format!("Network error: {}\n   Check your internet connection.", msg)
            }
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   The provider may be slow. Try again later.",
                    secs
                )
            }
            _ => self.to_string(),
        }
    }

    /// HTTP status an upstream failure should be reported with.
    ///
    /// Provider statuses in the 4xx/5xx range are echoed; everything else is
    /// a plain 500.
    pub fn upstream_status(&self) -> u16 {
        match self {
            AppError::ProviderError {
                status: Some(code), ..
            } if (400..600).contains(code) => *code,
            _ => 500,
        }
    }
}
