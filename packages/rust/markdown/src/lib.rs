//! Markdown-to-HTML page generation.
//!
//! Extracts display titles from markdown sources, strips front matter, renders
//! bodies with `pulldown-cmark` (or a preformatted fallback), wraps them in the
//! shared page shell and builds the navigation index page.

mod frontmatter;
mod page;
mod render;
mod title;

pub use frontmatter::{front_matter_title, split_front_matter, strip_front_matter};
pub use page::{NavSection, STYLESHEET, index_page, render_page, render_page_with};
pub use render::RenderEngine;
pub use title::{extract_title, filename_title, heading_title, title_from_content};

pub use docsetgen_shared::escape_html;
