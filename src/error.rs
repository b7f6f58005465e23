//! Error types for the bootstrap layer.

use std::path::PathBuf;

/// Result type alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during bring-up.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Environment Resolution Errors (fatal before any background task)
    // =========================================================================
    /// The current OS/architecture pair is not recognized.
    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    // =========================================================================
    // Extraction Errors
    // =========================================================================
    /// Could not create the native library extraction directory.
    #[error("failed to prepare native library directory {path}: {source}")]
    NativeDirSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Instance Construction Errors
    // =========================================================================
    /// The application library was not found anywhere on the code search path.
    #[error("application library '{name}' not found on the code search path ({searched} entries)")]
    AppLibraryNotFound { name: String, searched: usize },

    /// The application library could not be loaded or is missing its entry symbol.
    #[error("failed to load application library {path}: {source}")]
    AppLibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// The application constructor itself failed.
    #[error("failed to construct application instance: {reason}")]
    Construction { reason: String },

    // =========================================================================
    // Guard Violations
    // =========================================================================
    /// Bring-up was triggered from outside the canonical process entry point.
    #[error(
        "bring-up invoked outside the canonical entry point; duplicate or incorrectly loaded bootstrap?"
    )]
    GuardViolation,

    // =========================================================================
    // Pool / Worker Errors
    // =========================================================================
    /// The instance pool has shut down.
    #[error("instance pool closed")]
    PoolClosed,

    /// The background worker has shut down.
    #[error("background worker unavailable")]
    WorkerUnavailable,

    /// The bootstrap behind a handle has been dropped.
    #[error("bootstrap is no longer alive")]
    BootstrapGone,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// The configuration file could not be parsed.
    #[error("invalid configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a construction failure carrying the application's own message.
    pub fn construction(reason: impl Into<String>) -> Self {
        Self::Construction {
            reason: reason.into(),
        }
    }

    /// Returns the message reported to the progress UI.
    ///
    /// The innermost cause is preferred over wrapper text, so the user sees
    /// the application constructor's own message rather than a generic
    /// "construction failed" envelope.
    pub fn user_message(&self) -> String {
        if let Self::Construction { reason } = self {
            return reason.clone();
        }
        let mut current: &dyn std::error::Error = self;
        while let Some(source) = current.source() {
            current = source;
        }
        current.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_unwraps_construction() {
        let err = Error::construction("missing project file");
        assert_eq!(err.user_message(), "missing project file");
    }

    #[test]
    fn test_user_message_prefers_innermost_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such resource");
        let err = Error::NativeDirSetup {
            path: PathBuf::from("/tmp/x"),
            source: io,
        };
        assert_eq!(err.user_message(), "no such resource");
    }

    #[test]
    fn test_user_message_without_source_is_display() {
        let err = Error::GuardViolation;
        assert_eq!(err.user_message(), err.to_string());
    }
}
