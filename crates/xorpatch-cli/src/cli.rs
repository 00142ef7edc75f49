//! Command-line arguments and configuration loading.
//!
//! Configuration is layered: built-in defaults, then an optional JSON file
//! (`--config`), then individual flags or their environment variables.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use xorpatch_formats::patch::PatchConfig;

/// Generate and apply XOR binary patches.
#[derive(Debug, Parser)]
#[command(
    name = "xorpatch",
    about = "Generate and apply XOR binary patches",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// JSON configuration file
    #[arg(long, global = true, env = "XORPATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bytes processed per chunk
    #[arg(long, global = true, env = "XORPATCH_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Refuse inputs larger than this many bytes
    #[arg(long, global = true, env = "XORPATCH_MAX_INPUT_SIZE")]
    pub max_input_size: Option<u64>,

    /// Do not log progress updates
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a patch that turns the original file into the modified file
    Generate {
        /// The original file
        #[arg(long)]
        original: Option<PathBuf>,

        /// The modified file
        #[arg(long)]
        modified: Option<PathBuf>,

        /// Where to write the patch (default: <modified>_patch.bin)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Rebuild the modified file from the original file and a patch
    Apply {
        /// The original file
        #[arg(long)]
        original: Option<PathBuf>,

        /// The patch file
        #[arg(long)]
        patch: Option<PathBuf>,

        /// Where to write the modified file (default: patch name before "_patch")
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show the checksum and output size recorded in a patch
    Inspect {
        /// The patch file
        #[arg(long)]
        patch: Option<PathBuf>,
    },
}

impl GlobalOptions {
    /// Build the session configuration from defaults, file and flags.
    pub fn load_config(&self) -> Result<PatchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => PatchConfig::default(),
        };

        if let Some(chunk_size) = self.chunk_size {
            config = config.with_chunk_size(chunk_size);
        }
        if self.max_input_size.is_some() {
            config = config.with_max_input_size(self.max_input_size);
        }

        Ok(config)
    }
}
