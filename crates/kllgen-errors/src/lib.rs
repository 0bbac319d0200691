//! Error types for the kllgen keymap assembler and firmware emitter
//!
//! Generation failures fall into a small, fixed taxonomy so that the host
//! tool can report them uniformly and pick an exit status per class.
//!
//! # Architecture
//!
//! - [`common`]: Top-level [`KllError`], categories, severities and context helpers
//! - [`reference`]: Unresolved symbols ([`ReferenceError`])
//! - [`range`]: Values outside a table or encoding range ([`RangeError`])
//! - [`shape`]: Structural mismatches ([`ShapeError`])
//! - [`template`]: Placeholder substitution failures ([`TemplateError`])
//! - [`diagnostic`]: Collected validation findings ([`DiagnosticReport`])
//!
//! # Collection vs. fail-fast
//!
//! Reference, range and shape errors found by the validation pass are
//! collected into a [`DiagnosticReport`] so one run reports every problem.
//! Template, configuration and I/O errors abort immediately.
//!
//! # Example
//!
//! ```
//! use kllgen_errors::prelude::*;
//!
//! fn check_scan_code(symbol: &str, scan_code: u32, max: u16) -> Result<()> {
//!     if scan_code > u32::from(max) {
//!         return Err(RangeError::scan_code(symbol, scan_code, max).into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_scan_code("T0", 0x20, 0x1F).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod diagnostic;
pub mod prelude;
pub mod range;
pub mod reference;
pub mod shape;
pub mod template;

pub use common::{ErrorCategory, ErrorContext, ErrorSeverity, KllError, ResultExt};
pub use diagnostic::{Check, Diagnostic, DiagnosticError, DiagnosticReport};
pub use range::RangeError;
pub use reference::ReferenceError;
pub use shape::ShapeError;
pub use template::TemplateError;

/// A specialized `Result` type for kllgen operations.
pub type Result<T> = std::result::Result<T, KllError>;
