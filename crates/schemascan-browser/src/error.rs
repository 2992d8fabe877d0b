use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

/// Errors raised while fetching a page.
///
/// All variants carry the underlying cause as text; the fetcher makes one
/// attempt per scan and never retries.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("page evaluation failed: {0}")]
    Evaluation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrowserError::Navigation("DNS lookup failed".to_string());
        assert_eq!(err.to_string(), "navigation failed: DNS lookup failed");
    }

    #[test]
    fn test_timeout_error() {
        let err = BrowserError::Timeout("navigation exceeded 30s".to_string());
        assert!(err.to_string().contains("30s"));
    }
}
