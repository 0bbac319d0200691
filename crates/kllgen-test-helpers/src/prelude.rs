//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use kllgen_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_err, must_some, must_with};
pub use crate::{assert_has_line, assert_occurrences};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{
    display_keymap, empty_keymap, full_keymap, interconnect_keymap, ktype_pixels,
    rainbow_keymap, single_trigger_keymap, standard_capabilities,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
