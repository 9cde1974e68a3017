//! Core pipeline orchestration and domain logic for docsetgen.
//!
//! This crate ties together corpus retrieval, collection, markdown rendering,
//! bundle assembly and release packaging into end-to-end workflows
//! (`generate`, `build_release`).

pub mod assembler;
pub mod collector;
pub mod fetch;
pub mod html;
pub mod pipeline;
pub mod release;
