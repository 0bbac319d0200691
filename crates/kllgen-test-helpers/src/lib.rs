//! Shared test utilities for kllgen.
//!
//! This crate provides unwrap helpers, text assertions and keymap
//! fixtures to reduce duplication across the test suites.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`assertions`] - Assertion macros for generated C text
//! - [`fixtures`] - Ready-made keymap configurations
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! kllgen-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use kllgen_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "fixtures")]
#[cfg_attr(docsrs, doc(cfg(feature = "fixtures")))]
pub mod fixtures;

pub use must::*;
