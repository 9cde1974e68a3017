//! Front-matter detection.
//!
//! A block only counts when the very first line is exactly `---` and a later
//! line is exactly `---`. An unterminated block is treated as plain content.

use std::sync::LazyLock;

use regex::Regex;

const DELIMITER: &str = "---";

/// Split `content` into `(block, body)` when it starts with a complete
/// front-matter block. `block` excludes both delimiter lines.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if trim_eol(first) != DELIMITER {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if trim_eol(line) == DELIMITER {
            return Some((&content[start..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Drop a leading front-matter block and the whitespace after it.
pub fn strip_front_matter(content: &str) -> &str {
    match split_front_matter(content) {
        Some((_, body)) => body.trim_start(),
        None => content,
    }
}

/// The `title:` value of the front-matter block, unquoted, if non-empty.
pub fn front_matter_title(content: &str) -> Option<String> {
    static TITLE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^title:\s*(.*)$").expect("valid regex"));

    let (block, _) = split_front_matter(content)?;
    block.lines().find_map(|line| {
        let caps = TITLE_RE.captures(line.trim_end_matches('\r'))?;
        let value = unquote(caps[1].trim()).trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_complete_block() {
        let content = "---\ntitle: Intro\nlayout: doc\n---\n\n# Body\n";
        let (block, body) = split_front_matter(content).unwrap();
        assert_eq!(block, "title: Intro\nlayout: doc\n");
        assert_eq!(body, "\n# Body\n");
    }

    #[test]
    fn handles_crlf_delimiters() {
        let content = "---\r\ntitle: Windows\r\n---\r\nbody";
        let (block, body) = split_front_matter(content).unwrap();
        assert_eq!(block, "title: Windows\r\n");
        assert_eq!(body, "body");
        assert_eq!(front_matter_title(content).as_deref(), Some("Windows"));
    }

    #[test]
    fn unterminated_block_is_absent() {
        let content = "---\ntitle: Broken\n\n# Heading\n";
        assert!(split_front_matter(content).is_none());
        assert_eq!(strip_front_matter(content), content);
        assert!(front_matter_title(content).is_none());
    }

    #[test]
    fn first_line_must_be_exact_delimiter() {
        assert!(split_front_matter("----\ntitle: x\n---\n").is_none());
        assert!(split_front_matter("--- \ntitle: x\n---\n").is_none());
        assert!(split_front_matter("text\n---\ntitle: x\n---\n").is_none());
    }

    #[test]
    fn strip_trims_leading_whitespace() {
        let content = "---\ntitle: x\n---\n\n\n  Hello\n";
        assert_eq!(strip_front_matter(content), "Hello\n");
    }

    #[test]
    fn strip_leaves_plain_content_untouched() {
        assert_eq!(strip_front_matter("\n# Title\n"), "\n# Title\n");
    }

    #[test]
    fn title_strips_quotes() {
        assert_eq!(
            front_matter_title("---\ntitle: \"Quoted Title\"\n---\n").as_deref(),
            Some("Quoted Title")
        );
        assert_eq!(
            front_matter_title("---\ntitle:   'Single'  \n---\n").as_deref(),
            Some("Single")
        );
    }

    #[test]
    fn title_key_must_start_the_line() {
        let content = "---\nsubtitle: Nope\n---\n";
        assert!(front_matter_title(content).is_none());
    }

    #[test]
    fn empty_title_is_ignored() {
        assert!(front_matter_title("---\ntitle: \"\"\n---\n").is_none());
        assert!(front_matter_title("---\ntitle:\n---\n").is_none());
    }
}
