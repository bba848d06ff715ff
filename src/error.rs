//! Error types for merge-gate

use chrono::{DateTime, Utc};

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can occur in merge-gate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requirement value failed grammar or range validation
    #[error("{0}")]
    Validation(String),

    /// A dependency reference is not a well-formed pull request URL
    #[error("Invalid pull request URL: {0}")]
    InvalidUrl(String),

    /// The referenced pull request does not exist (or is not visible)
    #[error("PR not found: {owner}/{repo}#{number}")]
    NotFound {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Pull request number
        number: u64,
    },

    /// API quota is exhausted or nearly exhausted
    #[error("Rate limit exhausted ({remaining} remaining). Resets at {reset_at}")]
    RateLimited {
        /// When the quota resets
        reset_at: DateTime<Utc>,
        /// Remaining requests at the time of the error
        remaining: u32,
    },

    /// GitHub API errors (unexpected status, malformed response)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// HTTP transport errors (connect, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether a retry could plausibly succeed.
    ///
    /// Not-found and rate-limit responses are final: the answer will not
    /// change before the next evaluation run (or quota reset).
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::GitHubApi(_) | Self::Http(_))
    }
}
