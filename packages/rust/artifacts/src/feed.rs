//! Dash-style docset feed (`<Name>.xml`).

use docsetgen_shared::escape_html;

/// Render the feed document: the version followed by one `<url>` per
/// download location.
pub fn render_feed(version: &str, urls: &[String]) -> String {
    let mut lines = vec!["<entry>".to_string()];
    lines.push(format!("    <version>{}</version>", escape_html(version)));
    for url in urls {
        lines.push(format!("    <url>{}</url>", escape_html(url)));
    }
    lines.push("</entry>".to_string());
    lines.join("\n")
}
