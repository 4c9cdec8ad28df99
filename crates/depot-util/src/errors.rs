use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all depot operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DepotError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A provider call failed while handling the given library coordinate.
    #[error("Provider failure for {lib} {coord}")]
    #[diagnostic(help("Check the coordinate fields and the repository configuration"))]
    Provider {
        lib: String,
        coord: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An alias name or alias key was not recognized.
    #[error("Unknown alias key: {key}")]
    #[diagnostic(help("Check the [aliases] tables in the deps file"))]
    Alias { key: String },

    /// Malformed input detected before or at the edge of expansion.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A task was aborted because a sibling task failed and the pool shut down.
    #[error("Canceled: {message}")]
    Canceled { message: String },
}

impl DepotError {
    /// Wrap a provider-originated failure with the responsible lib and coord.
    pub fn provider(
        lib: impl Into<String>,
        coord: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Provider {
            lib: lib.into(),
            coord: coord.into(),
            cause: cause.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenience alias used across the depot crates.
pub type DepotResult<T> = Result<T, DepotError>;
