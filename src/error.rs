//! Error types for voxtrain.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainError {
    // Corpus collection errors (recovered per-line / per-speaker)
    #[error("Invalid PROMPTS line [{line}] in dir [{dir}]")]
    InvalidPromptsLine { line: String, dir: String },

    // External tool errors (fatal for the current stage)
    #[error("External tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("External tool {tool} failed: {detail}")]
    ToolFailed { tool: String, detail: String },

    // General I/O errors (fatal for the current stage)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TrainError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_invalid_prompts_line_display() {
        let error = TrainError::InvalidPromptsLine {
            line: "header_no_digit bad".to_string(),
            dir: "spk1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid PROMPTS line [header_no_digit bad] in dir [spk1]"
        );
    }

    #[test]
    fn test_tool_not_found_display() {
        let error = TrainError::ToolNotFound {
            tool: "sphinxtrain".to_string(),
        };
        assert_eq!(error.to_string(), "External tool not found: sphinxtrain");
    }

    #[test]
    fn test_tool_failed_display() {
        let error = TrainError::ToolFailed {
            tool: "flac".to_string(),
            detail: "exit status: 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "External tool flac failed: exit status: 1"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: TrainError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: TrainError = io_error.into();
        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<TrainError>();
        assert_sync::<TrainError>();
    }
}
