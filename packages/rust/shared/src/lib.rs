//! Shared types, error model, and configuration for docsetgen.
//!
//! This crate is the foundation depended on by all other docsetgen crates.
//! It provides:
//! - [`DocsetError`], the unified error type
//! - Domain types ([`Section`], [`DocumentEntry`], [`IndexRecord`], [`EntryType`])
//! - Configuration ([`DocsetConfig`], config loading)

pub mod config;
pub mod error;
pub mod markup;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, DocsetConfig, DocsetMeta, ExclusionsConfig, SectionConfig, init_config,
    load_config, load_config_from,
};
pub use error::{DocsetError, Result};
pub use markup::escape_html;
pub use types::{
    DocumentEntry, EntryType, HTML_EXTENSION, IndexRecord, PATH_JOINER, Section, section_slug,
    target_html_path,
};
