//! Template markup normalisation.

use std::sync::LazyLock;

use regex::Regex;

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static RE_BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Minify a component template for storage in the design document.
///
/// Comments are dropped, whitespace between tags is removed and any remaining
/// whitespace run collapses to a single space.
pub fn minify_html(html: &str) -> String {
    let without_comments = RE_COMMENT.replace_all(html, "");
    let tight = RE_BETWEEN_TAGS.replace_all(&without_comments, "><");
    RE_WHITESPACE
        .replace_all(&tight, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_html() {
        let html = r#"
<!-- paragraph template -->
<div class="paragraph">
    <p doc-editable="text">
        Lorem    ipsum
    </p>
</div>
"#;
        assert_eq!(
            minify_html(html),
            r#"<div class="paragraph"><p doc-editable="text"> Lorem ipsum </p></div>"#
        );
    }

    #[test]
    fn test_minify_is_stable() {
        let once = minify_html("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>\n");
        assert_eq!(once, "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(minify_html(&once), once);
    }
}
