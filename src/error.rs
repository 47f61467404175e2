use thiserror::Error;

/// Errors raised while driving a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    /// No session could be opened against any WebDriver endpoint
    #[error("failed to open browser session: {0}")]
    Session(String),

    /// A WebDriver command failed
    #[error("browser command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// A script returned something other than what the caller expected
    #[error("unexpected script result: {0}")]
    Script(String),

    /// Navigation to a page failed
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
}

/// Errors raised while fetching a single product page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("no record could be extracted")]
    Empty,

    /// The request never started because the worker pool was shut down
    #[error("fetch cancelled before it started")]
    Cancelled,
}

/// Errors that stop a pagination strategy early
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("invalid catalog configuration: {0}")]
    Config(String),
}
