//! Keymap assembler and C table emitter.
//!
//! A generation pass is a pure function from a [`KeymapConfig`] and a set
//! of [`Templates`] to output strings. The configuration is assembled into
//! symbol indices, scan maps and bytecode guides, validated, and only then
//! formatted into the firmware's C tables.
//!
//! # Example
//!
//! ```
//! use kllgen_emitter::{Templates, generate};
//! use kllgen_model::KeymapConfig;
//!
//! let config = KeymapConfig::new("empty", 2);
//! let outputs = generate(&config, &Templates::builtin()?)?;
//! assert!(outputs.keymap.contains("MaxScanCode 0x2"));
//! assert!(outputs.pixelmap.is_empty());
//! # Ok::<(), kllgen_errors::KllError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod animation;
pub mod assembly;
pub mod bytecode;
pub mod format;
pub mod json;
pub mod layers;
pub mod pixel;
pub mod placeholder;
pub mod position;
pub mod scanmap;
pub mod symbols;
pub mod template;
pub mod validate;

pub use assembly::Assembly;
pub use placeholder::Placeholder;
pub use template::{Template, Templates};

use kllgen_errors::{DiagnosticReport, KllError};
use kllgen_model::KeymapConfig;
use tracing::{info, warn};

/// Rendered text of one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub keymap: String,
    /// Empty when the configuration has no pixel section.
    pub pixelmap: String,
    pub defines: String,
    pub json: String,
}

/// Assemble and validate `config` without rendering anything.
pub fn check(config: &KeymapConfig) -> DiagnosticReport {
    Assembly::build(config).validate()
}

/// Run a full generation pass.
///
/// # Errors
///
/// Returns [`KllError::Validation`] when any error-severity diagnostic was
/// collected, or a [`KllError::Template`] when a template cannot be
/// rendered against this configuration.
pub fn generate(config: &KeymapConfig, templates: &Templates) -> Result<Outputs, KllError> {
    let assembly = Assembly::build(config);
    let report = assembly.validate().into_result()?;
    for diagnostic in report.warnings() {
        warn!(check = diagnostic.check.as_str(), symbol = %diagnostic.symbol, "{}", diagnostic.error);
    }
    templates.warn_unused(&assembly);

    let keymap = templates.keymap.render(&assembly)?;
    let defines = templates.defines.render(&assembly)?;
    let pixelmap = if assembly.pixels.is_some() {
        templates.pixelmap.render(&assembly)?
    } else {
        String::new()
    };
    let json = json::dump(&assembly)?;

    info!(
        config = %config.name,
        results = assembly.results.len(),
        triggers = assembly.triggers.len(),
        layers = assembly.layers.len(),
        "generated keymap"
    );
    Ok(Outputs {
        keymap,
        pixelmap,
        defines,
        json,
    })
}
