//! Release packaging for finished docset bundles.
//!
//! Treats the bundle directory as opaque and produces, in the output
//! directory:
//! - `<Name>-<version>.tgz`: the archive
//! - `<Name>.xml`: the viewer feed
//! - `<Name>-<version>.json`: release metadata with checksums
//! - `<Name>.tgz`: a link to the latest versioned archive

mod archive;
mod checksum;
mod feed;
mod metadata;

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use docsetgen_shared::{DocsetError, Result};

pub use archive::create_archive;
pub use checksum::{Checksums, checksum_file};
pub use feed::render_feed;
pub use metadata::{ArchiveInfo, ReleaseMetadata, format_size, generated_at_now};

/// Identity of one release.
#[derive(Debug, Clone)]
pub struct ReleaseSpec {
    /// Docset name (bundle is `<name>.docset`).
    pub name: String,
    /// Version string, `YYYY.MM.DD` by default.
    pub version: String,
    /// Primary download location.
    pub base_url: Option<String>,
    /// Additional download locations.
    pub mirrors: Vec<String>,
}

impl ReleaseSpec {
    /// Version-less archive name (`Nushell.tgz`).
    pub fn archive_name(&self) -> String {
        format!("{}.tgz", self.name)
    }

    /// Versioned archive name (`Nushell-2026.10.18.tgz`).
    pub fn versioned_archive_name(&self) -> String {
        format!("{}-{}.tgz", self.name, self.version)
    }

    pub fn feed_file_name(&self) -> String {
        format!("{}.xml", self.name)
    }

    pub fn metadata_file_name(&self) -> String {
        format!("{}-{}.json", self.name, self.version)
    }

    /// Download URLs for `file_name`: the base URL first, then each mirror,
    /// with trailing slashes trimmed.
    pub fn download_urls(&self, file_name: &str) -> Vec<String> {
        self.base_url
            .iter()
            .chain(self.mirrors.iter())
            .map(|base| format!("{}/{file_name}", base.trim_end_matches('/')))
            .collect()
    }
}

/// Today's date as a release version (`YYYY.MM.DD`).
pub fn default_version() -> String {
    chrono::Local::now().format("%Y.%m.%d").to_string()
}

/// Base URL of a GitHub release asset directory for `owner/repo`.
pub fn github_release_base_url(repo: &str, version: &str) -> Result<String> {
    let mut parts = repo.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(format!(
            "https://github.com/{owner}/{name}/releases/download/v{version}"
        )),
        _ => Err(DocsetError::config(format!(
            "invalid repository '{repo}': expected owner/repo"
        ))),
    }
}

/// Files written by [`package_bundle`].
#[derive(Debug, Clone)]
pub struct PackageResult {
    pub archive_path: PathBuf,
    pub feed_path: PathBuf,
    pub metadata_path: PathBuf,
    pub latest_link: PathBuf,
    pub checksums: Checksums,
    pub metadata: ReleaseMetadata,
}

/// Archive, hash and describe a finished bundle.
#[instrument(skip_all, fields(name = %spec.name, version = %spec.version))]
pub fn package_bundle(bundle: &Path, spec: &ReleaseSpec, output_dir: &Path) -> Result<PackageResult> {
    std::fs::create_dir_all(output_dir).map_err(|e| DocsetError::io(output_dir, e))?;

    let versioned_name = spec.versioned_archive_name();
    let archive_path = output_dir.join(&versioned_name);
    let size = create_archive(bundle, &format!("{}.docset", spec.name), &archive_path)?;

    let checksums = checksum_file(&archive_path)?;
    info!(sha256 = %checksums.sha256, "checksums calculated");

    let feed_path = output_dir.join(spec.feed_file_name());
    let feed = render_feed(&spec.version, &spec.download_urls(&spec.archive_name()));
    std::fs::write(&feed_path, feed).map_err(|e| DocsetError::io(&feed_path, e))?;
    info!(path = %feed_path.display(), "feed written");

    let metadata = ReleaseMetadata {
        name: spec.name.clone(),
        version: spec.version.clone(),
        archive: ArchiveInfo {
            filename: versioned_name.clone(),
            size,
            size_human: format_size(size),
        },
        checksums: checksums.clone(),
        generated_at: generated_at_now(),
        urls: spec.download_urls(&versioned_name),
    };
    let metadata_path = output_dir.join(spec.metadata_file_name());
    let json = serde_json::to_string_pretty(&metadata)
        .map_err(|e| DocsetError::validation(format!("JSON serialization failed: {e}")))?;
    std::fs::write(&metadata_path, json).map_err(|e| DocsetError::io(&metadata_path, e))?;
    info!(path = %metadata_path.display(), "metadata written");

    let latest_link = link_latest(output_dir, &spec.archive_name(), &versioned_name)?;

    Ok(PackageResult {
        archive_path,
        feed_path,
        metadata_path,
        latest_link,
        checksums,
        metadata,
    })
}

/// Point `dir/link_name` at `dir/target_name`, replacing whatever was there.
/// The link target is relative so the directory can be moved as a whole.
pub fn link_latest(dir: &Path, link_name: &str, target_name: &str) -> Result<PathBuf> {
    let link = dir.join(link_name);
    if link.symlink_metadata().is_ok() {
        std::fs::remove_file(&link).map_err(|e| DocsetError::io(&link, e))?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(target_name, &link).map_err(|e| DocsetError::io(&link, e))?;

    #[cfg(not(unix))]
    std::fs::copy(dir.join(target_name), &link).map_err(|e| DocsetError::io(&link, e))?;

    info!(link = %link.display(), target = target_name, "latest archive link updated");
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "docsetgen-artifacts-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn spec() -> ReleaseSpec {
        ReleaseSpec {
            name: "Nushell".into(),
            version: "2026.10.18".into(),
            base_url: Some("https://example.com/docsets/".into()),
            mirrors: vec!["https://mirror.example.org/nu".into()],
        }
    }

    fn fake_bundle(root: &Path) -> PathBuf {
        let bundle = root.join("Nushell.docset");
        let docs = bundle.join("Contents/Resources/Documents");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(bundle.join("Contents/Info.plist"), "<plist/>").unwrap();
        std::fs::write(docs.join("index.html"), "<html></html>").unwrap();
        bundle
    }

    #[test]
    fn release_names() {
        let spec = spec();
        assert_eq!(spec.archive_name(), "Nushell.tgz");
        assert_eq!(spec.versioned_archive_name(), "Nushell-2026.10.18.tgz");
        assert_eq!(spec.feed_file_name(), "Nushell.xml");
        assert_eq!(spec.metadata_file_name(), "Nushell-2026.10.18.json");
    }

    #[test]
    fn download_urls_base_then_mirrors() {
        let urls = spec().download_urls("Nushell.tgz");
        assert_eq!(
            urls,
            vec![
                "https://example.com/docsets/Nushell.tgz",
                "https://mirror.example.org/nu/Nushell.tgz",
            ]
        );

        let no_base = ReleaseSpec {
            base_url: None,
            mirrors: vec![],
            ..spec()
        };
        assert!(no_base.download_urls("Nushell.tgz").is_empty());
    }

    #[test]
    fn github_base_url() {
        assert_eq!(
            github_release_base_url("acme/nushell-docset", "2026.10.18").unwrap(),
            "https://github.com/acme/nushell-docset/releases/download/v2026.10.18"
        );
        assert!(github_release_base_url("acme", "1").is_err());
        assert!(github_release_base_url("a/b/c", "1").is_err());
        assert!(github_release_base_url("/repo", "1").is_err());
    }

    #[test]
    fn default_version_is_dotted_date() {
        let v = default_version();
        let parts: Vec<_> = v.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 4);
        assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn package_writes_all_outputs() {
        let tmp = temp_dir();
        let bundle = fake_bundle(&tmp.join("build"));
        let out = tmp.join("releases");

        let result = package_bundle(&bundle, &spec(), &out).unwrap();

        assert_eq!(result.archive_path, out.join("Nushell-2026.10.18.tgz"));
        assert!(result.archive_path.is_file());
        assert_eq!(result.checksums, checksum_file(&result.archive_path).unwrap());

        let feed = std::fs::read_to_string(&result.feed_path).unwrap();
        assert!(feed.contains("<version>2026.10.18</version>"));
        assert!(feed.contains("<url>https://example.com/docsets/Nushell.tgz</url>"));
        assert!(feed.contains("<url>https://mirror.example.org/nu/Nushell.tgz</url>"));

        let meta: ReleaseMetadata =
            serde_json::from_str(&std::fs::read_to_string(&result.metadata_path).unwrap()).unwrap();
        assert_eq!(meta.archive.filename, "Nushell-2026.10.18.tgz");
        assert_eq!(meta.archive.size, std::fs::metadata(&result.archive_path).unwrap().len());
        assert_eq!(meta.urls[0], "https://example.com/docsets/Nushell-2026.10.18.tgz");
        assert_eq!(meta.checksums, result.checksums);

        let linked = std::fs::read(&result.latest_link).unwrap();
        assert_eq!(linked, std::fs::read(&result.archive_path).unwrap());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[test]
    fn latest_link_is_relative_and_replaced() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("Demo-1.tgz"), b"one").unwrap();
        std::fs::write(tmp.join("Demo-2.tgz"), b"two").unwrap();

        link_latest(&tmp, "Demo.tgz", "Demo-1.tgz").unwrap();
        let link = link_latest(&tmp, "Demo.tgz", "Demo-2.tgz").unwrap();

        assert_eq!(std::fs::read_link(&link).unwrap(), PathBuf::from("Demo-2.tgz"));
        assert_eq!(std::fs::read(&link).unwrap(), b"two");

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
