//! Output formatting for CLI responses

use std::path::PathBuf;

use anyhow::Error;
use colored::*;
use kllgen_emitter::Placeholder;
use kllgen_errors::{Diagnostic, DiagnosticReport, ErrorCategory, ErrorSeverity, KllError};
use serde::Serialize;
use serde_json::json;

use crate::error::CliError;

/// One diagnostic as printed by `--json`.
#[derive(Debug, Serialize)]
struct DiagnosticJson {
    severity: String,
    category: String,
    check: &'static str,
    symbol: String,
    message: String,
}

impl From<&Diagnostic> for DiagnosticJson {
    fn from(d: &Diagnostic) -> Self {
        Self {
            severity: d.severity.to_string(),
            category: d.category().to_string(),
            check: d.check.as_str(),
            symbol: d.symbol.clone(),
            message: d.error.to_string(),
        }
    }
}

fn diagnostics_json(report: &DiagnosticReport) -> Vec<DiagnosticJson> {
    report.iter().map(DiagnosticJson::from).collect()
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

fn error_category(error: &Error) -> ErrorCategory {
    if let Some(e) = error.downcast_ref::<KllError>() {
        e.category()
    } else if let Some(e) = error.downcast_ref::<CliError>() {
        e.category()
    } else {
        ErrorCategory::Other
    }
}

fn validation_report(error: &Error) -> Option<&DiagnosticReport> {
    match error.downcast_ref::<KllError>() {
        Some(KllError::Validation(report)) => Some(report),
        _ => None,
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let mut error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_category(error).to_string(),
        }
    });
    if let (Some(report), Some(object)) = (validation_report(error), error_json.as_object_mut()) {
        object.insert("diagnostics".into(), json!(diagnostics_json(report)));
    }
    print_json(&error_json);
}

fn print_diagnostic_human(d: &Diagnostic) {
    let label = match d.severity {
        ErrorSeverity::Warning | ErrorSeverity::Info => d.severity.to_string().yellow().bold(),
        ErrorSeverity::Error | ErrorSeverity::Critical => d.severity.to_string().red().bold(),
    };
    let check = format!("[{}]", d.check);
    eprintln!("  {label} {} {}: {}", check.dimmed(), d.symbol.bold(), d.error);
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    if let Some(report) = validation_report(error) {
        for d in report.iter() {
            print_diagnostic_human(d);
        }
        return;
    }

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print a passing validation report
pub fn print_report(name: &str, report: &DiagnosticReport, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "config": name,
            "diagnostics": diagnostics_json(report),
        }));
        return;
    }

    for d in report.iter() {
        print_diagnostic_human(d);
    }
    let warnings = report.warnings().count();
    if warnings == 0 {
        println!("{} {} is valid", "✓".green(), name.bold());
    } else {
        println!(
            "{} {} is valid with {warnings} warning(s)",
            "✓".yellow(),
            name.bold()
        );
    }
}

/// Print the files a generation pass wrote
pub fn print_generated(name: &str, written: &[PathBuf], json: bool) {
    if json {
        let files: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        print_json(&json!({
            "success": true,
            "config": name,
            "outputs": files,
        }));
        return;
    }

    println!("{} Generated {}", "✓".green(), name.bold());
    for path in written {
        println!("  {} {}", "→".cyan(), path.display());
    }
}

/// Print every recognised placeholder
pub fn print_placeholders(json: bool) {
    if json {
        let list: Vec<serde_json::Value> = Placeholder::ALL
            .iter()
            .map(|p| json!({ "name": p.name(), "needs_pixels": p.needs_pixels() }))
            .collect();
        print_json(&json!({ "success": true, "placeholders": list }));
        return;
    }

    println!("{}", "Template placeholders:".bold());
    for p in Placeholder::ALL {
        if p.needs_pixels() {
            println!("  <|{p}|> {}", "(pixel section)".dimmed());
        } else {
            println!("  <|{p}|>");
        }
    }
}
