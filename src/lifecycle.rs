// src/lifecycle.rs
//! File lifecycle routing. Every input file must end in exactly one terminal
//! location — processed or failed — no matter which stage gave up on it. A
//! failed rename is contained per file: the file stays in the incoming set
//! and the next invocation rediscovers and retries it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

/// Terminal outcome of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Processed,
    Failed,
}

#[derive(Debug, Error)]
#[error("could not move {} to {}: {source}", from.display(), to.display())]
pub struct RelocationError {
    pub from: PathBuf,
    pub to: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Move `file` into `dest_dir` under the same file name.
pub fn relocate(file: &Path, dest_dir: &Path) -> Result<PathBuf, RelocationError> {
    let name = file.file_name().ok_or_else(|| RelocationError {
        from: file.to_path_buf(),
        to: dest_dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let target = dest_dir.join(name);
    fs::rename(file, &target).map_err(|source| RelocationError {
        from: file.to_path_buf(),
        to: target.clone(),
        source,
    })?;
    Ok(target)
}

/// End-of-run catch-all used by the sweeping profile: move every regular
/// file still present in `incoming` to `failed_dir`, attempted or not.
/// Returns the original paths of the files that were actually moved.
pub fn sweep_leftovers(incoming: &Path, failed_dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(incoming) {
        Ok(e) => e,
        Err(e) => {
            warn!(target: "lifecycle", error = %e, dir = %incoming.display(), "leftover sweep skipped");
            return Vec::new();
        }
    };

    let mut moved = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        match relocate(&path, failed_dir) {
            Ok(_) => {
                info!(target: "lifecycle", file = %path.display(), "leftover swept to failed set");
                moved.push(path);
            }
            Err(e) => warn!(target: "lifecycle", error = %e, "leftover sweep move failed"),
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocate_moves_and_keeps_the_name() {
        let tmp = tempfile::tempdir().unwrap();
        let src_dir = tmp.path().join("in");
        let dst_dir = tmp.path().join("out");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&dst_dir).unwrap();

        let file = src_dir.join("doc.pdf");
        fs::write(&file, b"x").unwrap();

        let target = relocate(&file, &dst_dir).unwrap();
        assert_eq!(target, dst_dir.join("doc.pdf"));
        assert!(!file.exists());
        assert!(target.exists());
    }

    #[test]
    fn failed_relocation_leaves_the_file_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("doc.pdf");
        fs::write(&file, b"x").unwrap();

        let missing = tmp.path().join("does-not-exist");
        let err = relocate(&file, &missing).unwrap_err();
        assert_eq!(err.from, file);
        assert!(file.exists(), "source must survive a failed move");
    }

    #[test]
    fn sweep_takes_every_remaining_regular_file() {
        let tmp = tempfile::tempdir().unwrap();
        let incoming = tmp.path().join("incoming");
        let failed = tmp.path().join("failed");
        fs::create_dir_all(&incoming).unwrap();
        fs::create_dir_all(&failed).unwrap();
        fs::create_dir_all(incoming.join("subdir")).unwrap();

        fs::write(incoming.join("a.pdf"), b"x").unwrap();
        fs::write(incoming.join("notes.txt"), b"x").unwrap();

        let moved = sweep_leftovers(&incoming, &failed);
        assert_eq!(moved.len(), 2);
        assert!(failed.join("a.pdf").exists());
        assert!(failed.join("notes.txt").exists());
        assert!(incoming.join("subdir").exists(), "directories are left alone");
    }

    #[test]
    fn sweep_on_missing_directory_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let moved = sweep_leftovers(&tmp.path().join("gone"), tmp.path());
        assert!(moved.is_empty());
    }
}
