//! Error types with credential-free messages.
//!
//! Every context string in this module is built from host, port, database,
//! and user name only. Passwords are never part of an error message or of
//! anything reachable through the source chain.

use thiserror::Error;

/// Main error type for ddlscribe operations.
#[derive(Debug, Error)]
pub enum DdlScribeError {
    /// Invalid CLI arguments, connection configuration, or statement text
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Failure to open or authenticate a database connection
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A statement failed server-side; propagated unchanged, never retried
    #[error("Statement execution failed: {context}")]
    Execution {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem failure while creating directories or writing files
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Cooperative cancellation observed at a suspension point
    #[error("Operation cancelled: {context}")]
    Cancelled { context: String },
}

/// Convenience type alias for Results with `DdlScribeError`
pub type Result<T> = std::result::Result<T, DdlScribeError>;

impl DdlScribeError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a connection error with context
    pub fn connection<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates an execution error with the underlying driver error
    pub fn execution<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Execution {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an execution error with no underlying driver error,
    /// e.g. a NULL value in a column the contract requires to be non-null.
    pub fn execution_message(context: impl Into<String>) -> Self {
        Self::Execution {
            context: context.into(),
            source: None,
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a cancellation error
    pub fn cancelled(context: impl Into<String>) -> Self {
        Self::Cancelled {
            context: context.into(),
        }
    }

    /// Returns true for cooperative cancellation
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Formats the error with its full source chain for stderr diagnostics.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {self}");

        let mut source = std::error::Error::source(self);
        let mut depth = 1usize;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {depth}: {err}"));
            source = err.source();
            depth = depth.saturating_add(1);
        }

        output
    }
}
