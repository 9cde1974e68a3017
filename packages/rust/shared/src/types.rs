//! Core domain types for docset generation.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File extension of rendered pages.
pub const HTML_EXTENSION: &str = "html";

/// Joiner used when flattening a relative source path into a file name.
pub const PATH_JOINER: &str = "_";

// ---------------------------------------------------------------------------
// EntryType
// ---------------------------------------------------------------------------

/// Lookup-table entry type, as understood by Dash-compatible viewers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// A command reference page.
    Command,
    /// Any other documentation page.
    #[default]
    Guide,
}

impl EntryType {
    /// The value stored in the `type` column of the lookup table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::Guide => "Guide",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Command" => Ok(Self::Command),
            "Guide" => Ok(Self::Guide),
            other => Err(format!("unknown entry type '{other}'")),
        }
    }
}

/// Entry types order by their stored name, matching the lookup table.
impl PartialOrd for EntryType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntryType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A named grouping of source files collected from one known subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Display name (e.g. `Language Guide`).
    pub name: String,
    /// Source subdirectory under the corpus root (e.g. `lang-guide`).
    pub dir: String,
    /// Entry type used for every page in this section.
    pub entry_type: EntryType,
    /// Markdown files under `dir`, sorted, exclusions already applied.
    pub files: Vec<PathBuf>,
}

impl Section {
    /// Output directory name for this section inside the HTML tree.
    pub fn slug(&self) -> String {
        section_slug(&self.name)
    }

    /// True when collection found no files for this section.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Lowercase the section name and replace spaces with underscores.
pub fn section_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', PATH_JOINER)
}

/// Map a source path (relative to the corpus root) to its page path relative
/// to the HTML root: `<slug>/<components joined by "_">.html`.
///
/// `commands/ls.md` in the `Commands` section becomes
/// `commands/commands_ls.html`.
pub fn target_html_path(slug: &str, relative_path: &Path) -> String {
    let renamed = relative_path.with_extension(HTML_EXTENSION);
    let file_name = renamed
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(PATH_JOINER);

    format!("{slug}/{file_name}")
}

// ---------------------------------------------------------------------------
// DocumentEntry / IndexRecord
// ---------------------------------------------------------------------------

/// One source file's resolved identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// Absolute path of the markdown source.
    pub source_path: PathBuf,
    /// Path of the source relative to the corpus root.
    pub relative_path: PathBuf,
    /// Display title (never empty).
    pub title: String,
    /// Page path relative to the HTML root, always `/`-separated.
    pub html_path: String,
    /// Entry type inherited from the owning section.
    pub entry_type: EntryType,
}

impl DocumentEntry {
    /// The lookup-table row for this entry.
    pub fn index_record(&self) -> IndexRecord {
        IndexRecord {
            name: self.title.clone(),
            entry_type: self.entry_type,
            path: self.html_path.clone(),
        }
    }
}

/// A row of the `searchIndex` lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Display name shown by the viewer.
    pub name: String,
    /// Entry type (`Command` / `Guide`).
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Page path relative to the `Documents` directory.
    pub path: String,
}
