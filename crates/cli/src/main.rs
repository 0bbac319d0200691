//! kllgen - keymap assembler and firmware table emitter
//!
//! Reads a normalized keymap configuration tree and renders the C headers,
//! pixel map source and JSON settings dump consumed by kiibohd firmware.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod error;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kllgen_errors::KllError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::GenerateArgs;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "kllgen")]
#[command(about = "Keymap assembler - emit kiibohd firmware tables from a configuration tree")]
#[command(version)]
#[command(long_about = "
kllgen assembles a normalized keymap configuration (JSON or YAML) into the
trigger/result bytecode, layer scan maps, pixel maps and animation frames
of a kiibohd-style keyboard firmware, and renders them through C templates.

Use --json for machine-readable output suitable for build scripts.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble, validate and write every output
    Generate(GenerateArgs),

    /// Assemble and validate only; prints every diagnostic, writes nothing
    Check {
        /// Configuration tree (.json, .yaml or .yml)
        config: std::path::PathBuf,
    },

    /// List the placeholders templates may use
    Placeholders,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("KLLGEN_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            format!("kllgen={log_level},kllgen_emitter={log_level},kllgen_model={log_level}").into()
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Process exit status for an error that reached the binary's edge.
fn exit_code(error: &anyhow::Error) -> u8 {
    let code = if let Some(e) = error.downcast_ref::<KllError>() {
        e.category().exit_code()
    } else if let Some(e) = error.downcast_ref::<CliError>() {
        e.category().exit_code()
    } else {
        1
    };
    u8::try_from(code).unwrap_or(1)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(exit_code(&e))
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate(args) => commands::generate::execute(args, cli.json),
        Commands::Check { config } => commands::check::execute(config, cli.json),
        Commands::Placeholders => {
            output::print_placeholders(cli.json);
            Ok(())
        }
        Commands::Completion { shell } => {
            completion::generate_completion(*shell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use kllgen_errors::{DiagnosticReport, RangeError, ReferenceError, TemplateError};
    use std::path::PathBuf;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_generate_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["kllgen", "generate", "board.json"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        let Commands::Generate(args) = cli.command else {
            return Err("expected generate".into());
        };
        assert_eq!(args.config, PathBuf::from("board.json"));
        assert_eq!(args.out_dir, PathBuf::from("."));
        assert!(args.map_template.is_none());
        assert!(args.json_output.is_none());
        Ok(())
    }

    #[test]
    fn parse_generate_overrides() -> TestResult {
        let cli = Cli::try_parse_from([
            "kllgen",
            "generate",
            "board.yaml",
            "--map-template",
            "t/map.h",
            "--pixel-output",
            "pix.c",
            "--out-dir",
            "build",
        ])?;
        let Commands::Generate(args) = cli.command else {
            return Err("expected generate".into());
        };
        assert_eq!(args.map_template, Some(PathBuf::from("t/map.h")));
        assert_eq!(args.pixel_output, Some(PathBuf::from("pix.c")));
        assert_eq!(args.out_dir, PathBuf::from("build"));
        Ok(())
    }

    #[test]
    fn parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["kllgen", "check", "board.json", "--json", "-vv"])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Check { .. }));
        Ok(())
    }

    #[test]
    fn parse_rejects_missing_config() {
        assert!(Cli::try_parse_from(["kllgen", "generate"]).err().is_some());
    }

    #[test]
    fn exit_codes_follow_error_category() {
        let reference: anyhow::Error =
            KllError::from(ReferenceError::missing_result("T0", "R9")).into();
        assert_eq!(exit_code(&reference), 2);

        let mut report = DiagnosticReport::new();
        report.error(
            kllgen_errors::Check::ScanCodeRange,
            "T0",
            RangeError::scan_code("T0", 9, 8),
        );
        let validation: anyhow::Error = KllError::Validation(report).into();
        assert_eq!(exit_code(&validation), 3);

        let template: anyhow::Error =
            KllError::from(TemplateError::unknown("map.h", "Nope", 1)).into();
        assert_eq!(exit_code(&template), 5);

        let config: anyhow::Error = KllError::config("bad").into();
        assert_eq!(exit_code(&config), 7);

        assert_eq!(exit_code(&anyhow::anyhow!("plain")), 1);
    }
}
