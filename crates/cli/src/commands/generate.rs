//! `kllgen generate`: render every output and write them atomically

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use kllgen_emitter::{Template, Templates};
use kllgen_errors::KllError;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::commands::{
    DEFAULT_DEF_OUTPUT, DEFAULT_JSON_OUTPUT, DEFAULT_MAP_OUTPUT, DEFAULT_PIXEL_OUTPUT,
    GenerateArgs,
};
use crate::error::CliError;
use crate::output;

/// Execute the generate command
pub fn execute(args: &GenerateArgs, json: bool) -> Result<()> {
    let config = kllgen_model::load_path(&args.config)?;
    let templates = load_templates(args)?;
    let outputs = kllgen_emitter::generate(&config, &templates)?;

    let files = [
        (args.output_path(args.map_output.as_ref(), DEFAULT_MAP_OUTPUT), outputs.keymap),
        (args.output_path(args.pixel_output.as_ref(), DEFAULT_PIXEL_OUTPUT), outputs.pixelmap),
        (args.output_path(args.def_output.as_ref(), DEFAULT_DEF_OUTPUT), outputs.defines),
        (args.output_path(args.json_output.as_ref(), DEFAULT_JSON_OUTPUT), outputs.json),
    ];
    prepare_out_dir(&args.out_dir)?;
    let written = write_outputs(&files)?;

    output::print_generated(&config.name, &written, json);
    Ok(())
}

/// Built-in templates with any overrides from the command line applied.
fn load_templates(args: &GenerateArgs) -> Result<Templates> {
    let mut templates = Templates::builtin().map_err(KllError::from)?;
    if let Some(path) = &args.map_template {
        templates.keymap = read_template(path)?;
    }
    if let Some(path) = &args.pixel_template {
        templates.pixelmap = read_template(path)?;
    }
    if let Some(path) = &args.def_template {
        templates.defines = read_template(path)?;
    }
    Ok(templates)
}

fn read_template(path: &Path) -> Result<Template> {
    let text = fs::read_to_string(path).map_err(|source| CliError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    let template =
        Template::parse(path.display().to_string(), &text).map_err(KllError::from)?;
    debug!(template = %path.display(), "loaded template override");
    Ok(template)
}

fn prepare_out_dir(dir: &Path) -> Result<(), CliError> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::OutputDirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(|source| CliError::OutputWrite {
        path: dir.to_path_buf(),
        source,
    })
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Stage every file as a temporary sibling, then rename them into place.
///
/// Nothing is renamed until every temporary file was written, so a failed
/// write leaves previous outputs untouched. If a rename fails, the outputs
/// already renamed are rolled back to their previous contents.
fn write_outputs(files: &[(PathBuf, String)]) -> Result<Vec<PathBuf>, CliError> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, text) in files {
        let write_err = |source| CliError::OutputWrite {
            path: path.clone(),
            source,
        };
        let dir = parent_dir(path);
        fs::create_dir_all(dir).map_err(write_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(text.as_bytes()).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        let previous = if path.is_file() {
            Some(fs::read(path).map_err(write_err)?)
        } else {
            None
        };
        staged.push((tmp, path, previous));
    }

    let mut written: Vec<(&PathBuf, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
    for (tmp, path, previous) in staged {
        if let Err(e) = tmp.persist(path) {
            roll_back(written);
            return Err(CliError::OutputWrite {
                path: path.clone(),
                source: e.error,
            });
        }
        debug!(output = %path.display(), "wrote output");
        written.push((path, previous));
    }
    Ok(written.into_iter().map(|(path, _)| path.clone()).collect())
}

/// Put back what an interrupted [`write_outputs`] replaced.
fn roll_back(written: Vec<(&PathBuf, Option<Vec<u8>>)>) {
    for (path, previous) in written.into_iter().rev() {
        let restored = match previous {
            Some(contents) => NamedTempFile::new_in(parent_dir(path))
                .and_then(|mut tmp| {
                    tmp.write_all(&contents)?;
                    tmp.persist(path).map_err(|e| e.error)
                })
                .map(drop),
            None => fs::remove_file(path),
        };
        match restored {
            Ok(()) => debug!(output = %path.display(), "rolled back output"),
            Err(e) => warn!(output = %path.display(), error = %e, "failed to roll back output"),
        }
    }
}
