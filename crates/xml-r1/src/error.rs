//! Error types for R1 XML formatting.
//!
//! Failures travel through [`FormatError`]; whether one aborts a whole call
//! depends on where it is raised. Structural failures (unparsable XML,
//! broken I/O) always unwind. Value-level failures such as malformed base64
//! are fatal for the value that raised them but are caught by the parent's
//! scan loop when raised inside a nested child. Content-level findings
//! (unsupported properties, integrity mismatches) never become errors; they
//! go to the [`Diagnostics`](crate::diagnostics::Diagnostics) sink instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    /// XML reader or writer error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML reported while cursoring, with positional context
    #[error("XML syntax error: {0}")]
    Syntax(String),

    /// IO error during formatting
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed base64 in an attribute or element content
    #[error("invalid base64 in {context}: {source}")]
    Base64 {
        context: &'static str,
        source: base64::DecodeError,
    },

    /// Value-level failure (bad dispatch, misuse of the cursor)
    #[error("{0}")]
    Value(String),
}

impl FormatError {
    pub fn base64(context: &'static str, source: base64::DecodeError) -> Self {
        FormatError::Base64 { context, source }
    }

    /// Whether this failure must abort the whole decode.
    ///
    /// Structural failures (unparsable XML, IO) unwind the call immediately.
    /// Anything else raised while interpreting a nested child is caught by
    /// the parent's scan loop and converted into a diagnostic.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FormatError::Xml(_) | FormatError::Syntax(_) | FormatError::Io(_)
        )
    }
}

/// Result type alias for formatting operations.
pub type Result<T> = std::result::Result<T, FormatError>;
