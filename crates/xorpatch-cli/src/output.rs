//! Output file naming and staged writes.
//!
//! Outputs are written to a temporary file next to the destination and
//! moved into place only after the operation succeeds. A failed or aborted
//! operation drops the temporary file, leaving no partial artifact behind.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use xorpatch_formats::patch::WriterSink;

/// Marker separating the modified file name from the patch extension
pub const PATCH_MARKER: &str = "_patch";

/// Sink type used for every file output
pub type StagedSink = WriterSink<BufWriter<NamedTempFile>>;

/// Default patch location: `<modified file name>_patch.bin` beside it
pub fn patch_path_for(modified: &Path) -> Option<PathBuf> {
    let mut name: OsString = modified.file_name()?.to_os_string();
    name.push(PATCH_MARKER);
    name.push(".bin");
    Some(modified.with_file_name(name))
}

/// Default restored location: the patch file name cut at the last `_patch`
///
/// Returns `None` when the name has no `_patch` marker or nothing before it.
pub fn restored_path_for(patch: &Path) -> Option<PathBuf> {
    let name = patch.file_name()?.to_str()?;
    let stem = &name[..name.rfind(PATCH_MARKER)?];
    if stem.is_empty() {
        return None;
    }
    Some(patch.with_file_name(stem))
}

/// Open a temporary file in the destination's directory and wrap it in a sink
pub fn staged_sink(destination: &Path) -> Result<StagedSink> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    Ok(WriterSink::new(BufWriter::new(temp)))
}

/// Move a finished staged output to its destination
pub fn commit(writer: BufWriter<NamedTempFile>, destination: &Path) -> Result<()> {
    let temp = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    temp.persist(destination)
        .with_context(|| format!("failed to write {}", destination.display()))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xorpatch_formats::patch::ByteSink;

    #[test]
    fn test_patch_path_for() {
        assert_eq!(
            patch_path_for(Path::new("/data/game.exe")),
            Some(PathBuf::from("/data/game.exe_patch.bin"))
        );
        assert_eq!(
            patch_path_for(Path::new("rom.gba")),
            Some(PathBuf::from("rom.gba_patch.bin"))
        );
        assert_eq!(patch_path_for(Path::new("/")), None);
    }

    #[test]
    fn test_restored_path_for() {
        assert_eq!(
            restored_path_for(Path::new("/data/game.exe_patch.bin")),
            Some(PathBuf::from("/data/game.exe"))
        );
        // Cut happens at the last marker
        assert_eq!(
            restored_path_for(Path::new("my_patch_v2_patch.bin")),
            Some(PathBuf::from("my_patch_v2"))
        );
        assert_eq!(restored_path_for(Path::new("update.bin")), None);
        assert_eq!(restored_path_for(Path::new("_patch.bin")), None);
    }

    #[test]
    fn test_staged_output_is_committed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let destination = dir.path().join("out.bin");

        let mut sink = staged_sink(&destination).expect("staged sink");
        sink.append(b"staged").expect("append");
        assert!(!destination.exists());

        let writer = sink.finalize().expect("finalize");
        commit(writer, &destination).expect("commit");
        assert_eq!(std::fs::read(&destination).unwrap(), b"staged".to_vec());
    }

    #[test]
    fn test_dropped_staged_output_leaves_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let destination = dir.path().join("out.bin");

        let mut sink = staged_sink(&destination).expect("staged sink");
        sink.append(b"partial").expect("append");
        drop(sink);

        assert!(!destination.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
