//! Error types for venue_nav

use thiserror::Error;

/// Main error type for venue navigation.
///
/// Errors are only raised while loading a venue or validating configuration.
/// Route queries never fail: geometric problems degrade to a fallback route.
#[derive(Debug, Error)]
pub enum NavError {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Obstacle record that cannot be normalized (non-finite coordinates)
    #[error("Invalid obstacle '{name}': {reason}")]
    InvalidObstacle { name: String, reason: String },
    /// Malformed JSON layout or configuration
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// gnuplot could not render or save a figure
    #[error("Visualization error: {0}")]
    Visualization(String),
}

/// Result type alias for navigation operations
pub type NavResult<T> = Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NavError::InvalidParameter("cache_capacity must be at least 1".to_string());
        assert_eq!(format!("{}", err), "Invalid parameter: cache_capacity must be at least 1");
    }

    #[test]
    fn test_invalid_obstacle_display() {
        let err = NavError::InvalidObstacle {
            name: "booth 7".to_string(),
            reason: "x1 is NaN".to_string(),
        };
        assert_eq!(format!("{}", err), "Invalid obstacle 'booth 7': x1 is NaN");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NavError = io_err.into();
        assert!(matches!(err, NavError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: NavError = json_err.into();
        assert!(matches!(err, NavError::Parse(_)));
    }
}
