use thiserror::Error;

/// Errors produced by the crawl engine.
///
/// Transient UI failures (stale elements, intercepted clicks, hover
/// timeouts) are deliberately absent: those are swallowed at the
/// interaction site and surface only as debug logs, never as errors.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The browser process could not be started or connected to.
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// The rendering engine reports itself as an automated agent, or the
    /// session died before the crawl could start.
    #[error("Browser session rejected: {0}")]
    SessionRejected(String),

    /// A stored cookie carries a same-site value the browser will not
    /// accept even after normalization.
    #[error("Cookie '{name}' rejected: unrecognized SameSite value '{same_site}'")]
    CookieRejected { name: String, same_site: String },

    /// The login wall is still present after a submit attempt.
    #[error("Authentication failed for '{username}': {reason}")]
    AuthenticationFailed { username: String, reason: String },

    /// The target page never stabilized within the retry budget.
    #[error("Navigation to '{url}' failed after {attempts} attempts: {reason}")]
    NavigationFailed {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// A JavaScript evaluation over CDP failed or returned nothing usable.
    #[error("Page evaluation failed: {0}")]
    PageEvaluationFailed(String),

    /// The rendered document could not be fetched or parsed.
    #[error("Page parse failed: {0}")]
    PageParseFailed(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;
