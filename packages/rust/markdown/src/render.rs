//! Markdown → HTML fragment rendering.
//!
//! The CommonMark engine (`pulldown-cmark`) is compiled in with the default
//! `cmark` feature. Without it every page degrades to escaped preformatted
//! text instead of failing.

#[cfg(feature = "cmark")]
use std::collections::HashSet;

#[cfg(feature = "cmark")]
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::escape_html;

/// Which renderer turns markdown into an HTML fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEngine {
    /// Full CommonMark rendering with tables, heading anchors and hard breaks.
    CommonMark,
    /// Escaped source text inside `<pre>`.
    Preformatted,
}

impl RenderEngine {
    /// The best engine available in this build.
    pub fn detect() -> Self {
        if cfg!(feature = "cmark") {
            Self::CommonMark
        } else {
            Self::Preformatted
        }
    }

    /// Render a markdown body. Empty input yields an empty fragment.
    pub fn render_fragment(self, markdown: &str) -> String {
        if markdown.trim().is_empty() {
            return String::new();
        }

        match self {
            Self::CommonMark => render_commonmark(markdown),
            Self::Preformatted => preformatted(markdown),
        }
    }
}

fn preformatted(markdown: &str) -> String {
    format!("<pre>{}</pre>", escape_html(markdown))
}

#[cfg(not(feature = "cmark"))]
fn render_commonmark(markdown: &str) -> String {
    tracing::warn!("markdown engine not compiled in, emitting preformatted text");
    preformatted(markdown)
}

#[cfg(feature = "cmark")]
fn render_commonmark(markdown: &str) -> String {
    // Fenced code blocks and lenient lists are plain CommonMark. Heading
    // attribute blocks stay off: a trailing `{...}` is heading text.
    let options = Options::ENABLE_TABLES;

    let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, options)
        .map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        })
        .collect();

    assign_heading_ids(&mut events);

    let mut html = String::with_capacity(markdown.len() + markdown.len() / 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    html
}

/// Give every heading a unique slug anchor.
#[cfg(feature = "cmark")]
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut used = HashSet::new();

    let mut i = 0;
    while i < events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            i += 1;
            continue;
        }

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            end += 1;
        }

        let slug = unique_slug(slugify(&text), &mut used);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
        i = end;
    }
}

/// `Working with Lists!` → `working-with-lists`.
#[cfg(feature = "cmark")]
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

#[cfg(feature = "cmark")]
fn unique_slug(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_renders_nothing() {
        assert_eq!(RenderEngine::CommonMark.render_fragment(""), "");
        assert_eq!(RenderEngine::Preformatted.render_fragment("  \n"), "");
    }

    #[test]
    fn preformatted_escapes_source() {
        let html = RenderEngine::Preformatted.render_fragment("# a <b> & c");
        assert_eq!(html, "<pre># a &lt;b&gt; &amp; c</pre>");
    }

    #[cfg(feature = "cmark")]
    #[test]
    fn detect_prefers_commonmark() {
        assert_eq!(RenderEngine::detect(), RenderEngine::CommonMark);
    }

    #[cfg(feature = "cmark")]
    #[test]
    fn renders_fenced_code() {
        let html = RenderEngine::CommonMark.render_fragment("```nu\nls | where size > 1kb\n```\n");
        assert!(html.contains("<pre><code class=\"language-nu\">"));
        assert!(html.contains("ls | where size &gt; 1kb"));
    }

    #[cfg(feature = "cmark")]
    #[test]
    fn renders_tables() {
        let md = "| flag | description |\n| --- | --- |\n| `-a` | all |\n";
        let html = RenderEngine::CommonMark.render_fragment(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>flag</th>"));
        assert!(html.contains("<code>-a</code>"));
    }

    #[cfg(feature = "cmark")]
    #[test]
    fn headings_get_unique_anchors() {
        let md = "# Working with Lists!\n\n## Examples\n\n## Examples\n";
        let html = RenderEngine::CommonMark.render_fragment(md);
        assert!(html.contains("<h1 id=\"working-with-lists\">"));
        assert!(html.contains("<h2 id=\"examples\">"));
        assert!(html.contains("<h2 id=\"examples_1\">"));
    }

    #[cfg(feature = "cmark")]
    #[test]
    fn brace_text_stays_in_headings() {
        let html = RenderEngine::CommonMark.render_fragment("## Record literal {name: value}\n");
        assert!(html.contains(">Record literal {name: value}</h2>"), "{html}");
        assert!(html.contains("<h2 id=\"record-literal-name-value\">"), "{html}");
        assert!(!html.contains("name:=\"\""));

        let html = RenderEngine::CommonMark.render_fragment("# ls {#x}\n");
        assert!(html.contains(">ls {#x}</h1>"), "{html}");
    }

    #[cfg(feature = "cmark")]
    #[test]
    fn soft_breaks_become_line_breaks() {
        let html = RenderEngine::CommonMark.render_fragment("first line\nsecond line\n");
        assert!(html.contains("first line<br />"));
    }

    #[cfg(feature = "cmark")]
    #[test]
    fn slugify_handles_symbols() {
        assert_eq!(slugify("  `str` -- Strings  "), "str-strings");
        assert_eq!(slugify("???"), "section");
    }
}
