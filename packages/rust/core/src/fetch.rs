//! Corpus retrieval via a shallow `git clone`.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info, instrument};

use docsetgen_shared::{DocsetError, Result};

/// Clone `repo_url` into `dest` with `--depth 1`, replacing any previous
/// checkout at that path.
///
/// A spawn failure or non-zero exit is fatal; git's stderr is carried in the
/// error unchanged.
#[instrument(skip_all, fields(repo_url = %repo_url, dest = %dest.display()))]
pub fn fetch_corpus(repo_url: &str, dest: &Path) -> Result<()> {
    if dest.exists() {
        debug!("removing previous checkout");
        std::fs::remove_dir_all(dest).map_err(|e| DocsetError::io(dest, e))?;
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
    }

    info!("cloning documentation repository");
    let output = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(repo_url)
        .arg(dest)
        .output()
        .map_err(|e| DocsetError::fetch(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        return Err(DocsetError::fetch(format!(
            "git clone exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    info!("clone complete");
    Ok(())
}
