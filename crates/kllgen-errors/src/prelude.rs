//! Prelude module for convenient error handling imports.
//!
//! # Example
//!
//! ```
//! use kllgen_errors::prelude::*;
//!
//! fn resolve(results: &[&str], trigger: &str, result: &str) -> Result<usize> {
//!     results
//!         .iter()
//!         .position(|r| *r == result)
//!         .ok_or_else(|| ReferenceError::missing_result(trigger, result).into())
//! }
//!
//! assert!(resolve(&["R0"], "T0", "R1").is_err());
//! ```

pub use crate::{
    Result,
    common::{ErrorCategory, ErrorContext, ErrorSeverity, KllError, ResultExt},
    diagnostic::{Check, Diagnostic, DiagnosticError, DiagnosticReport},
    range::RangeError,
    reference::ReferenceError,
    shape::ShapeError,
    template::TemplateError,
};

/// Build an [`ErrorContext`](crate::ErrorContext) from an operation and key/value pairs.
///
/// # Example
///
/// ```
/// use kllgen_errors::error_context;
///
/// let ctx = error_context!("write_output", "path" => "generatedKeymap.h");
/// assert!(ctx.to_string().contains("generatedKeymap.h"));
/// ```
#[macro_export]
macro_rules! error_context {
    ($operation:expr $(, $key:expr => $value:expr)* $(,)?) => {
        {
            let mut ctx = $crate::ErrorContext::new($operation);
            $(
                ctx = ctx.with($key, $value);
            )*
            ctx
        }
    };
}
