//! Normalized keymap configuration tree.
//!
//! The frontend (KLL parsing and merging) writes one tree per target as
//! JSON or YAML. This crate owns its schema, version migration and loading.
//!
//! # Example
//!
//! ```
//! use kllgen_model::{ConfigFormat, load_str};
//!
//! let text = r#"{ "name": "empty", "max_scan_code": 2, "layers": [ { "name": "default" } ] }"#;
//! let config = load_str(text, ConfigFormat::Json)?;
//! assert_eq!(config.layers.len(), 1);
//! # Ok::<(), kllgen_errors::KllError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod pixels;
pub mod types;

pub use pixels::*;
pub use types::*;

use std::path::Path;

use kllgen_errors::{KllError, ResultExt, error_context};
use tracing::{debug, info};

/// Current configuration schema version.
/// Increment this when the tree structure changes incompatibly.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Capabilities that version 0 trees implicitly treated as safe to run
/// from any firmware context.
pub const SAFE_CAPABILITIES: &[&str] = &[
    "layerState",
    "layerLatch",
    "layerLock",
    "layerShift",
    "layerRotate",
    "testThreadSafe",
    "consCtrlOut",
    "noneOut",
    "sysCtrlOut",
    "usbKeyOut",
    "mouseOut",
    "mouseWheelOut",
    "flashMode",
];

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension; JSON unless `.yaml`/`.yml`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Json,
        }
    }
}

/// Migrate a configuration to the current schema version.
///
/// Returns `Ok(true)` if migration was performed, `Ok(false)` if the tree
/// was already at the current version.
///
/// # Errors
///
/// Returns [`KllError::Config`] if `config.schema_version` is greater than
/// [`CURRENT_SCHEMA_VERSION`].
pub fn migrate_config(config: &mut KeymapConfig) -> Result<bool, KllError> {
    if config.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(KllError::config(format!(
            "unsupported schema version {}: maximum supported is {}",
            config.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    if config.schema_version == CURRENT_SCHEMA_VERSION {
        return Ok(false);
    }

    // v0 → v1: capability feature flags became explicit.
    for capability in &mut config.capabilities {
        if SAFE_CAPABILITIES.contains(&capability.name.as_str()) {
            capability.feature = CapabilityFeature::Safe;
        }
    }
    config.schema_version = CURRENT_SCHEMA_VERSION;
    Ok(true)
}

/// Schema-level sanity checks that do not need the emitter.
///
/// # Errors
///
/// Returns [`KllError::Config`] when the tree has no layers or an
/// unsupported state word size.
pub fn validate_config(config: &KeymapConfig) -> Result<(), KllError> {
    if config.layers.is_empty() {
        return Err(KllError::config("at least one (default) layer is required"));
    }
    if let Some(bits) = config.state_word_size
        && !matches!(bits, 8 | 16 | 32)
    {
        return Err(KllError::config(format!(
            "state_word_size must be 8, 16 or 32, got {bits}"
        )));
    }
    Ok(())
}

/// Parse, migrate and sanity-check a configuration document.
///
/// # Errors
///
/// Returns [`KllError::Config`] on parse errors, future schema versions
/// and schema-level problems.
pub fn load_str(text: &str, format: ConfigFormat) -> Result<KeymapConfig, KllError> {
    let mut config: KeymapConfig = match format {
        ConfigFormat::Json => {
            serde_json::from_str(text).map_err(|e| KllError::config(e.to_string()))?
        }
        ConfigFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|e| KllError::config(e.to_string()))?
        }
    };
    if migrate_config(&mut config)? {
        info!(name = %config.name, "migrated configuration to schema version {CURRENT_SCHEMA_VERSION}");
    }
    validate_config(&config)?;
    debug!(
        name = %config.name,
        layers = config.layers.len(),
        triggers = config.triggers.len(),
        results = config.results.len(),
        "loaded configuration"
    );
    Ok(config)
}

/// Read and load a configuration file, choosing the format by extension.
///
/// # Errors
///
/// Returns [`KllError::Io`] if the file cannot be read, otherwise the
/// errors of [`load_str`] with the path attached.
pub fn load_path(path: &Path) -> Result<KeymapConfig, KllError> {
    let ctx = || error_context!("load_config", "path" => path.display().to_string());
    let text = std::fs::read_to_string(path).context(ctx())?;
    load_str(&text, ConfigFormat::from_path(path)).context(ctx())
}

/// Serialize a configuration as pretty JSON.
///
/// # Errors
///
/// Returns [`KllError::Config`] if serialization fails.
pub fn to_json(config: &KeymapConfig) -> Result<String, KllError> {
    serde_json::to_string_pretty(config).map_err(|e| KllError::config(e.to_string()))
}
