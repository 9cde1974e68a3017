//! Gzip-compressed tar archives of a bundle directory.

use std::fs::File;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::{debug, info};

use docsetgen_shared::{DocsetError, Result};

/// Archive `source_dir` into `dest` with every entry stored under `arc_name/`.
/// Returns the archive size in bytes.
pub fn create_archive(source_dir: &Path, arc_name: &str, dest: &Path) -> Result<u64> {
    if !source_dir.is_dir() {
        return Err(DocsetError::validation(format!(
            "cannot archive {}: not a directory",
            source_dir.display()
        )));
    }

    let file = File::create(dest).map_err(|e| DocsetError::io(dest, e))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    builder
        .append_dir_all(arc_name, source_dir)
        .map_err(|e| DocsetError::Archive(format!("adding {}: {e}", source_dir.display())))?;

    let encoder = builder
        .into_inner()
        .map_err(|e| DocsetError::Archive(format!("finishing tar stream: {e}")))?;
    encoder
        .finish()
        .map_err(|e| DocsetError::Archive(format!("finishing gzip stream: {e}")))?;

    let size = std::fs::metadata(dest)
        .map_err(|e| DocsetError::io(dest, e))?
        .len();

    info!(archive = %dest.display(), size, "archive created");
    debug!(source = %source_dir.display(), arc_name, "archived directory");
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "docsetgen-archive-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let file = File::open(archive).unwrap();
        let mut reader = tar::Archive::new(GzDecoder::new(file));
        reader
            .entries()
            .unwrap()
            .map(|e| {
                e.unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .trim_end_matches('/')
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn archive_nests_under_arc_name() {
        let tmp = temp_dir();
        let bundle = tmp.join("build").join("Demo.docset");
        std::fs::create_dir_all(bundle.join("Contents/Resources/Documents")).unwrap();
        std::fs::write(bundle.join("Contents/Info.plist"), "<plist/>").unwrap();
        std::fs::write(bundle.join("Contents/Resources/Documents/index.html"), "<html/>").unwrap();

        let dest = tmp.join("Demo-1.0.tgz");
        let size = create_archive(&bundle, "Demo.docset", &dest).unwrap();
        assert!(size > 0);

        let names = entry_names(&dest);
        assert!(names.contains(&"Demo.docset/Contents/Info.plist".to_string()));
        assert!(names.contains(&"Demo.docset/Contents/Resources/Documents/index.html".to_string()));
        assert!(names.iter().all(|n| n.starts_with("Demo.docset")));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_source_is_rejected() {
        let tmp = temp_dir();
        let err = create_archive(&tmp.join("nope"), "X.docset", &tmp.join("x.tgz")).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
