use thiserror::Error;

/// Why a single device could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No usable HTTP response: refused, timed out, TLS failure, and so on.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// A response arrived but its body could not be read or decoded.
    #[error("unreadable response body: {0}")]
    Body(String),
}

/// Conditions that end a scan before every result has been aggregated.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid extraction selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("scan aborted, unreadable page from {address}: {reason}")]
    Aborted { address: String, reason: String },

    #[error("scan cancelled after {received} of {expected} results")]
    Cancelled { received: usize, expected: usize },

    #[error("all workers stopped after {received} of {expected} results")]
    Incomplete { received: usize, expected: usize },
}
