//! Full HTML documents: content pages and the navigation index page.

use docsetgen_shared::DocumentEntry;

use crate::escape_html;
use crate::frontmatter::strip_front_matter;
use crate::render::RenderEngine;

/// Stylesheet embedded in every page.
pub const STYLESHEET: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            line-height: 1.6;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            color: #24292e;
        }
        code {
            background-color: #f6f8fa;
            padding: 2px 6px;
            border-radius: 3px;
            font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace;
            font-size: 85%;
        }
        pre {
            background-color: #f6f8fa;
            padding: 16px;
            border-radius: 6px;
            overflow-x: auto;
        }
        pre code {
            background-color: transparent;
            padding: 0;
        }
        h1, h2, h3, h4, h5, h6 {
            margin-top: 24px;
            margin-bottom: 16px;
            font-weight: 600;
            line-height: 1.25;
        }
        h1 {
            font-size: 2em;
            border-bottom: 1px solid #eaecef;
            padding-bottom: 0.3em;
        }
        h2 {
            font-size: 1.5em;
            border-bottom: 1px solid #eaecef;
            padding-bottom: 0.3em;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            margin: 16px 0;
        }
        table th, table td {
            border: 1px solid #dfe2e5;
            padding: 6px 13px;
        }
        table th {
            background-color: #f6f8fa;
            font-weight: 600;
        }
        table tr:nth-child(2n) {
            background-color: #f6f8fa;
        }
        a {
            color: #0366d6;
            text-decoration: none;
        }
        a:hover {
            text-decoration: underline;
        }
        blockquote {
            border-left: 4px solid #dfe2e5;
            padding: 0 15px;
            color: #6a737d;
            margin: 0;
        }
"#;

const BODY_OPEN: &str = "<body>";

/// Render a markdown source file (front matter included) into a complete page.
pub fn render_page(source: &str, title: &str) -> String {
    render_page_with(RenderEngine::detect(), source, title)
}

/// [`render_page`] with an explicit engine.
pub fn render_page_with(engine: RenderEngine, source: &str, title: &str) -> String {
    let body = engine.render_fragment(strip_front_matter(source));
    html_document(title, &body)
}

/// Wrap an HTML fragment in the page shell.
fn html_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n    \
         <meta charset=\"UTF-8\">\n    \
         <title>{title}</title>\n    \
         <style>\n{STYLESHEET}    </style>\n\
         </head>\n\
         {BODY_OPEN}\n\
         {body}\n\
         </body>\n\
         </html>\n",
        title = escape_html(title),
    )
}

/// One navigation group on the index page.
#[derive(Debug, Clone, Copy)]
pub struct NavSection<'a> {
    /// Section display name, used as the `<h2>` heading.
    pub name: &'a str,
    /// Rendered pages of the section, in display order.
    pub entries: &'a [DocumentEntry],
}

/// Build the top-level `index.html`: a heading for the whole set followed by
/// one linked list per non-empty section.
pub fn index_page(doc_title: &str, sections: &[NavSection<'_>]) -> String {
    let mut links = String::new();
    for section in sections.iter().filter(|s| !s.entries.is_empty()) {
        links.push_str(&format!("<h2>{}</h2><ul>", escape_html(section.name)));
        for entry in section.entries {
            links.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(&entry.html_path),
                escape_html(&entry.title)
            ));
        }
        links.push_str("</ul>");
    }

    let shell = html_document(doc_title, "");
    shell.replacen(
        BODY_OPEN,
        &format!("{BODY_OPEN}<h1>{}</h1>{links}", escape_html(doc_title)),
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsetgen_shared::EntryType;
    use std::path::PathBuf;

    fn entry(rel: &str, title: &str, html: &str, entry_type: EntryType) -> DocumentEntry {
        DocumentEntry {
            source_path: PathBuf::from("/corpus").join(rel),
            relative_path: PathBuf::from(rel),
            title: title.into(),
            html_path: html.into(),
            entry_type,
        }
    }

    #[test]
    fn page_has_shell_and_title() {
        let html = render_page_with(RenderEngine::Preformatted, "hello", "A & B");
        assert!(html.starts_with("<!DOCTYPE html>\n<html>\n<head>"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("border-collapse: collapse;"));
        assert!(html.contains("<body>\n<pre>hello</pre>\n</body>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn stylesheet_is_identical_across_pages() {
        let a = render_page_with(RenderEngine::Preformatted, "one", "One");
        let b = render_page_with(RenderEngine::Preformatted, "two", "Two");
        let style = |s: &str| {
            let start = s.find("<style>").unwrap();
            let end = s.find("</style>").unwrap();
            s[start..end].to_string()
        };
        assert_eq!(style(&a), style(&b));
    }

    #[test]
    fn front_matter_is_not_rendered() {
        let source = "---\ntitle: Hidden\n---\n\nVisible body\n";
        let html = render_page_with(RenderEngine::Preformatted, source, "T");
        assert!(html.contains("<pre>Visible body\n</pre>"));
        assert!(!html.contains("Hidden"));
    }

    #[test]
    fn empty_body_is_valid_shell() {
        let html = render_page_with(RenderEngine::CommonMark, "", "Empty");
        assert!(html.contains("<body>\n\n</body>"));
    }

    #[cfg(feature = "cmark")]
    #[test]
    fn page_renders_markdown() {
        let html = render_page("# The ls command\n\nList *files*.\n", "The ls command");
        assert!(html.contains("<h1 id=\"the-ls-command\">The ls command</h1>"));
        assert!(html.contains("<em>files</em>"));
    }

    #[test]
    fn index_page_groups_sections() {
        let commands = vec![
            entry("commands/ls.md", "The ls command", "commands/commands_ls.html", EntryType::Command),
            entry("commands/ps.md", "ps", "commands/commands_ps.html", EntryType::Command),
        ];
        let book = vec![entry("book/intro.md", "Intro", "book/book_intro.html", EntryType::Guide)];
        let sections = [
            NavSection { name: "Book", entries: &book },
            NavSection { name: "Commands", entries: &commands },
            NavSection { name: "Cookbook", entries: &[] },
        ];

        let html = index_page("Nushell Documentation", &sections);

        assert!(html.contains(
            "<body><h1>Nushell Documentation</h1><h2>Book</h2><ul><li><a href=\"book/book_intro.html\">Intro</a></li></ul>"
        ));
        assert!(html.contains(
            "<h2>Commands</h2><ul><li><a href=\"commands/commands_ls.html\">The ls command</a></li>"
        ));
        assert!(!html.contains("Cookbook"));
        assert!(html.contains("<title>Nushell Documentation</title>"));
        assert_eq!(html.matches("<body>").count(), 1);
    }

    #[test]
    fn index_page_escapes_titles() {
        let entries = vec![entry("book/x.md", "a < b", "book/book_x.html", EntryType::Guide)];
        let html = index_page("Docs", &[NavSection { name: "Book", entries: &entries }]);
        assert!(html.contains(">a &lt; b</a>"));
    }
}
