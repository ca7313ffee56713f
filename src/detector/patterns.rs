use regex::Regex;
use std::sync::LazyLock;

static SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(article|news|story|post)/").unwrap());

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d{4}/\d{2}/\d{2}/").unwrap());

/// Whether a URL path looks like it points at a single article.
pub fn has_article_path(path: &str) -> bool {
    if SECTION_REGEX.is_match(path) || DATE_REGEX.is_match(path) {
        return true;
    }

    if path.ends_with(".html") || path.ends_with(".php") {
        return true;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    // numeric id or a nested path
    segments
        .iter()
        .any(|s| s.chars().all(|c| c.is_ascii_digit()))
        || segments.len() >= 2
}
