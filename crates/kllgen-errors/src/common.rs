//! Common error types and utilities used across all kllgen crates.
//!
//! This module provides the top-level error enum that wraps every error
//! class, along with categories, severity levels and context helpers.

use core::fmt;

use crate::{Diagnostic, DiagnosticReport, RangeError, ReferenceError, ShapeError, TemplateError};

/// Top-level error type for a generation pass.
#[derive(Debug, thiserror::Error)]
pub enum KllError {
    /// Unresolved symbol
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Value outside its table or encoding range
    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    /// Structural mismatch
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Template substitution failure
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Validation found one or more errors
    #[error("Validation failed: {0}")]
    Validation(DiagnosticReport),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Configuration could not be parsed or migrated
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl KllError {
    /// Get the error category for classification.
    ///
    /// A failed validation reports the category of its first error, so a
    /// host tool can map a whole report onto one exit status.
    pub fn category(&self) -> ErrorCategory {
        match self {
            KllError::Reference(_) => ErrorCategory::Reference,
            KllError::Range(_) => ErrorCategory::Range,
            KllError::Shape(_) => ErrorCategory::Shape,
            KllError::Template(_) => ErrorCategory::Template,
            KllError::Validation(report) => report
                .errors()
                .next()
                .map(Diagnostic::category)
                .unwrap_or(ErrorCategory::Other),
            KllError::Io(_) => ErrorCategory::Io,
            KllError::Config(_) => ErrorCategory::Config,
            KllError::Other(_) => ErrorCategory::Other,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            KllError::Template(_) | KllError::Io(_) | KllError::Config(_) => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::Error,
        }
    }

    /// Whether the error stops a generation pass without collecting more.
    pub fn is_fatal(&self) -> bool {
        self.severity() >= ErrorSeverity::Critical
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        KllError::Config(msg.into())
    }

    /// Create a generic error with a message.
    pub fn other(msg: impl Into<String>) -> Self {
        KllError::Other(msg.into())
    }
}

impl From<std::io::Error> for KllError {
    fn from(e: std::io::Error) -> Self {
        KllError::Io(e)
    }
}

impl From<DiagnosticReport> for KllError {
    fn from(report: DiagnosticReport) -> Self {
        KllError::Validation(report)
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unresolved symbol
    Reference = 0,
    /// Value out of range
    Range = 1,
    /// Structural mismatch
    Shape = 2,
    /// Template substitution
    Template = 3,
    /// I/O errors
    Io = 4,
    /// Configuration parse or schema errors
    Config = 5,
    /// Other errors
    Other = 255,
}

impl ErrorCategory {
    /// Process exit status used by the command-line host for this category.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Reference => 2,
            ErrorCategory::Range => 3,
            ErrorCategory::Shape => 4,
            ErrorCategory::Template => 5,
            ErrorCategory::Io => 6,
            ErrorCategory::Config => 7,
            ErrorCategory::Other => 1,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Reference => write!(f, "ReferenceError"),
            ErrorCategory::Range => write!(f, "RangeError"),
            ErrorCategory::Shape => write!(f, "ShapeError"),
            ErrorCategory::Template => write!(f, "TemplateError"),
            ErrorCategory::Io => write!(f, "IOError"),
            ErrorCategory::Config => write!(f, "ConfigError"),
            ErrorCategory::Other => write!(f, "Error"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, output is still produced
    Warning = 1,
    /// Error, no output is produced
    Error = 2,
    /// Critical, the pass stops immediately
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Context information for errors.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation that was being performed
    pub operation: String,
    /// Additional context key-value pairs
    pub context: Vec<(String, String)>,
}

impl ErrorContext {
    /// Create a new error context for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            context: Vec::new(),
        }
    }

    /// Add a context key-value pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation: {}", self.operation)?;
        for (key, value) in &self.context {
            write!(f, ", {}: {}", key, value)?;
        }
        Ok(())
    }
}

/// Extension trait for adding context to errors.
///
/// Only untyped errors (I/O, configuration, other) absorb the context text;
/// classified errors pass through unchanged so the host can still map them
/// onto an exit status.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, ctx: ErrorContext) -> Result<T, KllError>;

    /// Add context with an operation name.
    fn with_context(self, operation: impl Into<String>) -> Result<T, KllError>;
}

impl<T, E: Into<KllError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, ctx: ErrorContext) -> Result<T, KllError> {
        self.map_err(|e| match e.into() {
            KllError::Io(io) => KllError::Io(std::io::Error::new(
                io.kind(),
                format!("{}: {}", ctx, io),
            )),
            KllError::Config(msg) => KllError::Config(format!("{}: {}", ctx, msg)),
            KllError::Other(msg) => KllError::Other(format!("{}: {}", ctx, msg)),
            typed => typed,
        })
    }

    fn with_context(self, operation: impl Into<String>) -> Result<T, KllError> {
        self.context(ErrorContext::new(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Reference.to_string(), "ReferenceError");
        assert_eq!(ErrorCategory::Shape.to_string(), "ShapeError");
        assert_eq!(ErrorCategory::Io.to_string(), "IOError");
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
        assert!(ErrorSeverity::Error > ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning > ErrorSeverity::Info);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let categories = [
            ErrorCategory::Reference,
            ErrorCategory::Range,
            ErrorCategory::Shape,
            ErrorCategory::Template,
            ErrorCategory::Io,
            ErrorCategory::Config,
            ErrorCategory::Other,
        ];
        let mut codes: Vec<i32> = categories.iter().map(|c| c.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), categories.len());
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_template_errors_are_fatal() {
        let err: KllError = TemplateError::unknown("map.h", "Nope", 3).into();
        assert!(err.is_fatal());
        assert_eq!(err.category(), ErrorCategory::Template);

        let err: KllError = ReferenceError::missing_result("T0", "R9").into();
        assert!(!err.is_fatal());
        assert_eq!(err.category(), ErrorCategory::Reference);
    }

    #[test]
    fn test_error_context() {
        let ctx = ErrorContext::new("render_template")
            .with("template", "kiibohdKeymap.h")
            .with("line", "42");
        let text = ctx.to_string();
        assert!(text.contains("render_template"));
        assert!(text.contains("kiibohdKeymap.h"));
    }

    #[test]
    fn test_result_ext_keeps_io_variant() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let with_ctx = result.with_context("read_template");
        assert!(matches!(with_ctx, Err(KllError::Io(_))));
        if let Err(err) = with_ctx {
            assert!(err.to_string().contains("read_template"));
            assert_eq!(err.category(), ErrorCategory::Io);
        }
    }

    #[test]
    fn test_kll_error_is_std_error() {
        let err: KllError = ShapeError::display_row(2, 38, 37).into();
        let _: &dyn std::error::Error = &err;
    }
}
