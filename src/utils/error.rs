// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FmpError {
    #[error("Network request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 401 Unauthorized, 403 Forbidden

    #[error("Failed to parse FMP response: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Section must be in [1, 1A, 1B, 2, 3, 4, 5, 6, 7, 7A, 8, 9, 9A, 9B, 10, 11, 12, 13, 14, 15], got '{0}'")]
    InvalidSection(String),

    // Carries the locator's diagnostic text verbatim
    #[error("{0}")]
    FilingNotLocated(String),

    #[error("Extraction request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Extraction service returned HTTP {0}")]
    Http(reqwest::StatusCode),

    #[error("Failed to store section text: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("HTTP error: {0}")]
    HttpError(#[source] reqwest::Error),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
}

// reqwest puts the request URL into its errors, and the FMP and extractor
// keys travel as query parameters. Strip it before anything is stored.
impl From<reqwest::Error> for FmpError {
    fn from(e: reqwest::Error) -> Self {
        FmpError::Network(e.without_url())
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(e: reqwest::Error) -> Self {
        ExtractError::Network(e.without_url())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::HttpError(e.without_url())
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Invalid ticker '{0}': expected a non-empty alphabetic symbol")]
    InvalidTicker(String),

    #[error("Invalid year '{0}': expected a 4-digit year (e.g., 2024)")]
    InvalidYear(String),

    #[error("Invalid path '{path}': {source}")]
    UnwritablePath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Giving up after {0} invalid attempts")]
    TooManyAttempts(usize),

    #[error("Input closed before a value was entered")]
    Closed,

    #[error("I/O error while reading input: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Market data request failed: {0}")]
    Fmp(#[from] FmpError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
