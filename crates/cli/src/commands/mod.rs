//! Command implementations for the kllgen CLI

pub mod check;
pub mod generate;

use std::path::PathBuf;

use clap::Args;

pub const DEFAULT_MAP_OUTPUT: &str = "generatedKeymap.h";
pub const DEFAULT_PIXEL_OUTPUT: &str = "generatedPixelmap.c";
pub const DEFAULT_DEF_OUTPUT: &str = "kll_defs.h";
pub const DEFAULT_JSON_OUTPUT: &str = "kll.json";

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Configuration tree (.json, .yaml or .yml)
    pub config: PathBuf,

    /// Keymap header template (built-in kiibohdKeymap.h when omitted)
    #[arg(long)]
    pub map_template: Option<PathBuf>,

    /// Pixel map source template (built-in kiibohdPixelmap.c when omitted)
    #[arg(long)]
    pub pixel_template: Option<PathBuf>,

    /// Defines header template (built-in kiibohdDefs.h when omitted)
    #[arg(long)]
    pub def_template: Option<PathBuf>,

    /// Keymap header output [default: <out-dir>/generatedKeymap.h]
    #[arg(long)]
    pub map_output: Option<PathBuf>,

    /// Pixel map output [default: <out-dir>/generatedPixelmap.c]
    #[arg(long)]
    pub pixel_output: Option<PathBuf>,

    /// Defines header output [default: <out-dir>/kll_defs.h]
    #[arg(long)]
    pub def_output: Option<PathBuf>,

    /// JSON settings dump [default: <out-dir>/kll.json]
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Directory for outputs not given an explicit path
    #[arg(long, default_value = ".", env = "KLLGEN_OUT_DIR")]
    pub out_dir: PathBuf,
}

impl GenerateArgs {
    /// Explicit path, or `default` inside the output directory.
    pub fn output_path(&self, explicit: Option<&PathBuf>, default: &str) -> PathBuf {
        explicit
            .cloned()
            .unwrap_or_else(|| self.out_dir.join(default))
    }
}
