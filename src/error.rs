//! Error handling for Furnish
//!
//! Only text recovery can fail inside the pipeline. The remaining variants
//! belong to the collaborator boundary (manifest files, CLI input/output).

use std::path::PathBuf;

use thiserror::Error;

/// Maximum number of characters of raw model output kept in an error excerpt.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Result type alias for Furnish operations
pub type Result<T> = std::result::Result<T, FurnishError>;

/// Main error type for Furnish operations
#[derive(Error, Debug)]
pub enum FurnishError {
    // Recovery Errors
    #[error("Model output could not be parsed as JSON: {excerpt}")]
    UnparsableOutput { excerpt: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Catalog Errors
    #[error("Invalid asset manifest: {reason}")]
    InvalidManifest { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FurnishError {
    /// Build an `UnparsableOutput` error from the offending raw text.
    pub fn unparsable(raw: &str) -> Self {
        FurnishError::UnparsableOutput {
            excerpt: excerpt(raw),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            FurnishError::UnparsableOutput { .. } => "UNPARSABLE_OUTPUT",
            FurnishError::FileNotFound { .. } => "FILE_NOT_FOUND",
            FurnishError::FileReadError { .. } => "FILE_READ_ERROR",
            FurnishError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            FurnishError::InvalidManifest { .. } => "INVALID_MANIFEST",
            FurnishError::Io(_) => "IO_ERROR",
            FurnishError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FurnishError::UnparsableOutput { .. } | FurnishError::FileNotFound { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            FurnishError::UnparsableOutput { .. } => vec![
                "Retry the generation request with a stricter prompt",
                "Ask the model to answer with a single JSON object and no prose",
            ],
            FurnishError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Use '-' to read the model output from stdin",
            ],
            FurnishError::InvalidManifest { .. } => vec![
                "The manifest must be a JSON object mapping asset keys to entries",
                "Every entry needs at least a 'path' field",
            ],
            _ => vec![],
        }
    }
}

/// Cut `raw` down to a bounded, never-empty excerpt for diagnostics.
pub fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    match trimmed.char_indices().nth(EXCERPT_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = FurnishError::unparsable("not json");
        assert_eq!(err.error_code(), "UNPARSABLE_OUTPUT");

        let err = FurnishError::FileNotFound {
            path: PathBuf::from("layout.txt"),
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_unparsable_is_recoverable() {
        let err = FurnishError::unparsable("Sorry, I can't help with that.");
        assert!(err.is_recoverable());
        assert!(!err.recovery_suggestions().is_empty());
    }

    #[test]
    fn test_excerpt_short_input_kept_whole() {
        assert_eq!(excerpt("  hello  "), "hello");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let raw = "x".repeat(5_000);
        let cut = excerpt(&raw);
        assert_eq!(cut.chars().count(), EXCERPT_MAX_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let raw = "é".repeat(EXCERPT_MAX_CHARS + 10);
        let cut = excerpt(&raw);
        assert!(cut.starts_with('é'));
        assert_eq!(cut.chars().filter(|c| *c == 'é').count(), EXCERPT_MAX_CHARS);
    }

    #[test]
    fn test_excerpt_never_empty() {
        assert_eq!(excerpt(""), "<empty>");
        assert_eq!(excerpt(" \n\t"), "<empty>");
    }
}
