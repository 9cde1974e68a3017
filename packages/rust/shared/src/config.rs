//! Docset configuration for docsetgen.
//!
//! The config file is optional: `--config <path>` wins, then `./docsetgen.toml`
//! in the working directory, then the built-in defaults (the Nushell docset).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsetError, Result};
use crate::types::{EntryType, Section};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "docsetgen.toml";

// ---------------------------------------------------------------------------
// Config structs (matching docsetgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level docset config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsetConfig {
    /// Bundle identity and viewer bootstrap settings.
    #[serde(default)]
    pub docset: DocsetMeta,

    /// Known section directories, in navigation order.
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,

    /// Non-content files and directories.
    #[serde(default)]
    pub exclusions: ExclusionsConfig,
}

impl Default for DocsetConfig {
    fn default() -> Self {
        Self {
            docset: DocsetMeta::default(),
            sections: default_sections(),
            exclusions: ExclusionsConfig::default(),
        }
    }
}

/// `[docset]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsetMeta {
    /// Bundle name; the bundle directory is `<name>.docset`.
    #[serde(default = "default_name")]
    pub name: String,

    /// Heading and `<title>` of the generated index page.
    #[serde(default = "default_title")]
    pub title: String,

    /// `CFBundleIdentifier` written to the manifest.
    #[serde(default = "default_bundle_id")]
    pub bundle_id: String,

    /// `DocSetPlatformFamily` written to the manifest.
    #[serde(default = "default_bundle_id")]
    pub platform_family: String,

    /// Home page, relative to the `Documents` directory.
    #[serde(default = "default_index_page")]
    pub index_page: String,

    /// Online location viewers fall back to.
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,

    /// Git repository holding the markdown corpus.
    #[serde(default = "default_repo_url")]
    pub repo_url: String,

    /// Icon file at the corpus root, copied to the bundle root when present.
    #[serde(default = "default_icon")]
    pub icon: String,
}

impl Default for DocsetMeta {
    fn default() -> Self {
        Self {
            name: default_name(),
            title: default_title(),
            bundle_id: default_bundle_id(),
            platform_family: default_bundle_id(),
            index_page: default_index_page(),
            fallback_url: default_fallback_url(),
            repo_url: default_repo_url(),
            icon: default_icon(),
        }
    }
}

fn default_name() -> String {
    "Nushell".into()
}
fn default_title() -> String {
    "Nushell Documentation".into()
}
fn default_bundle_id() -> String {
    "nushell".into()
}
fn default_index_page() -> String {
    "index.html".into()
}
fn default_fallback_url() -> String {
    "https://www.nushell.sh/".into()
}
fn default_repo_url() -> String {
    "https://github.com/nushell/nushell.github.io.git".into()
}
fn default_icon() -> String {
    "icon.png".into()
}

/// `[[sections]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Display name, unique across sections.
    pub name: String,
    /// Subdirectory of the corpus root.
    pub dir: String,
    /// Entry type for pages in this section.
    #[serde(default)]
    pub entry_type: EntryType,
}

impl SectionConfig {
    fn new(name: &str, dir: &str, entry_type: EntryType) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            entry_type,
        }
    }

    /// An empty [`Section`] for this entry, ready to be filled by the collector.
    pub fn to_section(&self) -> Section {
        Section {
            name: self.name.clone(),
            dir: self.dir.clone(),
            entry_type: self.entry_type,
            files: Vec::new(),
        }
    }
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("Book", "book", EntryType::Guide),
        SectionConfig::new("Commands", "commands", EntryType::Command),
        SectionConfig::new("Cookbook", "cookbook", EntryType::Guide),
        SectionConfig::new("Language Guide", "lang-guide", EntryType::Guide),
    ]
}

/// `[exclusions]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionsConfig {
    /// Exact file names that are never rendered or indexed.
    #[serde(default = "default_excluded_files")]
    pub file_names: Vec<String>,

    /// Directory names whose whole subtree is skipped (tool metadata).
    #[serde(default = "default_excluded_dirs")]
    pub dir_names: Vec<String>,
}

impl Default for ExclusionsConfig {
    fn default() -> Self {
        Self {
            file_names: default_excluded_files(),
            dir_names: default_excluded_dirs(),
        }
    }
}

impl ExclusionsConfig {
    /// Whether a file with this name is excluded.
    pub fn excludes_file(&self, file_name: &str) -> bool {
        self.file_names.iter().any(|n| n == file_name) || self.excludes_dir(file_name)
    }

    /// Whether a directory with this name is skipped entirely.
    pub fn excludes_dir(&self, dir_name: &str) -> bool {
        self.dir_names.iter().any(|n| n == dir_name)
    }
}

fn default_excluded_files() -> Vec<String> {
    vec!["README.md".into()]
}
fn default_excluded_dirs() -> Vec<String> {
    vec![".vuepress".into()]
}

impl DocsetConfig {
    /// Bundle directory name (`<name>.docset`).
    pub fn bundle_dir_name(&self) -> String {
        format!("{}.docset", self.docset.name)
    }

    /// Directory name of the corpus checkout: the last segment of the
    /// repository URL without a `.git` suffix.
    pub fn corpus_dir_name(&self) -> String {
        let trimmed = self.docset.repo_url.trim_end_matches('/');
        let last = trimmed
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(trimmed);
        let name = last.strip_suffix(".git").unwrap_or(last);
        if name.is_empty() {
            "corpus".into()
        } else {
            name.to_string()
        }
    }

    /// Reject configurations the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.docset.name.trim().is_empty() {
            return Err(DocsetError::config("docset.name must not be empty"));
        }

        let mut names = HashSet::new();
        let mut dirs = HashSet::new();
        for section in &self.sections {
            if section.name.trim().is_empty() {
                return Err(DocsetError::config("section name must not be empty"));
            }
            if !names.insert(section.name.as_str()) {
                return Err(DocsetError::config(format!(
                    "duplicate section name '{}'",
                    section.name
                )));
            }
            if !dirs.insert(section.dir.as_str()) {
                return Err(DocsetError::config(format!(
                    "section directory '{}' is used by more than one section",
                    section.dir
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Resolve and load the config: explicit path, then `./docsetgen.toml`, then
/// defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<DocsetConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    tracing::debug!("no config file found, using built-in defaults");
    Ok(DocsetConfig::default())
}

/// Load and validate the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<DocsetConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsetError::io(path, e))?;

    let config: DocsetConfig = toml::from_str(&content)
        .map_err(|e| DocsetError::config(format!("failed to parse {}: {e}", path.display())))?;
    config.validate()?;

    tracing::debug!(?path, sections = config.sections.len(), "loaded config");
    Ok(config)
}

/// Write the default config to `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(DocsetError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&DocsetConfig::default())
        .map_err(|e| DocsetError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| DocsetError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}
