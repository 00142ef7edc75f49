//! Subcommand execution.

use crate::cli::{Cli, Command};
use crate::output::{commit, patch_path_for, restored_path_for, staged_sink};
use crate::progress::LogProgress;
use anyhow::{Context, Result, bail};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use xorpatch_formats::patch::{
    AbortHandle, ByteSource, InputRole, PatchError, PatchSession, ReaderSource,
};

/// Build a session from the global options and run the parsed command.
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.options.load_config()?;
    let session = PatchSession::new(config);
    install_abort_handler(session.abort_handle());

    let mut progress = LogProgress::new(cli.options.quiet);
    execute(&session, cli.command, &mut progress)
}

fn install_abort_handler(abort: AbortHandle) {
    let handler = ctrlc::set_handler(move || {
        warn!("Caught ctrl-c, stopping after the current chunk");
        abort.abort();
    });
    if let Err(err) = handler {
        warn!("Failed to set ctrl-c handler: {err}");
    }
}

/// Run one command on an existing session.
pub fn execute(session: &PatchSession, command: Command, progress: &mut LogProgress) -> Result<()> {
    match command {
        Command::Generate {
            original,
            modified,
            output,
        } => {
            require(original.as_deref(), InputRole::Original)?;
            let Some(destination) = output.or_else(|| modified.as_deref().and_then(patch_path_for))
            else {
                return Err(PatchError::MissingInput(InputRole::Modified).into());
            };

            let mut original = open_source(original.as_deref())?;
            let mut modified = open_source(modified.as_deref())?;
            let sink = staged_sink(&destination)?;

            let writer = session.generate(
                original.as_mut().map(|source| source as &mut dyn ByteSource),
                modified.as_mut().map(|source| source as &mut dyn ByteSource),
                sink,
                progress,
            )?;
            commit(writer, &destination)?;
            info!("Saved patch file to {}", destination.display());
        }

        Command::Apply {
            original,
            patch,
            output,
        } => {
            require(original.as_deref(), InputRole::Original)?;
            let destination = match (output, patch.as_deref()) {
                (Some(output), _) => output,
                (None, None) => return Err(PatchError::MissingInput(InputRole::Patch).into()),
                (None, Some(patch)) => restored_name_or_bail(patch)?,
            };

            let mut original = open_source(original.as_deref())?;
            let mut patch = open_source(patch.as_deref())?;
            let sink = staged_sink(&destination)?;

            let writer = session.apply(
                original.as_mut().map(|source| source as &mut dyn ByteSource),
                patch.as_mut().map(|source| source as &mut dyn ByteSource),
                sink,
                progress,
            )?;
            commit(writer, &destination)?;
            info!("Saved modified file to {}", destination.display());
        }

        Command::Inspect { patch } => {
            let mut patch = open_source(patch.as_deref())?;
            let trailer =
                session.inspect(patch.as_mut().map(|source| source as &mut dyn ByteSource))?;
            println!("Original checksum: {}", trailer.checksum);
            println!("Modified size:     {} bytes", trailer.modified_length);
        }
    }

    Ok(())
}

fn require(path: Option<&Path>, role: InputRole) -> Result<&Path, PatchError> {
    path.ok_or(PatchError::MissingInput(role))
}

fn restored_name_or_bail(patch: &Path) -> Result<PathBuf> {
    match restored_path_for(patch) {
        Some(path) => Ok(path),
        None => bail!(
            "cannot derive an output name from {} (no \"_patch\" in the name); pass --output",
            patch.display()
        ),
    }
}

fn open_source(path: Option<&Path>) -> Result<Option<ReaderSource<File>>> {
    path.map(|path| {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        ReaderSource::new(file).with_context(|| format!("failed to read {}", path.display()))
    })
    .transpose()
}
