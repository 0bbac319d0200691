//! `kllgen check`: validation without output

use std::path::Path;

use anyhow::Result;

use crate::output;

/// Execute the check command
///
/// A report with errors is returned as the command's error so it is printed
/// once, by the same path that reports `generate` failures.
pub fn execute(config_path: &Path, json: bool) -> Result<()> {
    let config = kllgen_model::load_path(config_path)?;
    let report = kllgen_emitter::check(&config).into_result()?;
    output::print_report(&config.name, &report, json);
    Ok(())
}
