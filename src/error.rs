//! UI configuration error types.

use thiserror::Error;

/// Errors raised while building a [`crate::Ui`].
#[derive(Debug, Error, PartialEq)]
pub enum UiError {
    #[error("no input source configured")]
    MissingInputSource,

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

/// Result type alias for UI construction.
pub type Result<T> = std::result::Result<T, UiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            UiError::MissingInputSource.to_string(),
            "no input source configured"
        );
        assert_eq!(
            UiError::InvalidViewport {
                width: 0.0,
                height: 720.0
            }
            .to_string(),
            "invalid viewport 0x720"
        );
    }
}
