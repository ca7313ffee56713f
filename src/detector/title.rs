use url::Url;

use crate::detector::{
    dom::{DomElement, DomQuery},
    model::ArticleInfo,
};

pub const UNTITLED_ARTICLE: &str = "Untitled Article";

/// Candidates must be longer than this many characters.
const MIN_TITLE_CHARS: usize = 10;

/// Title sources, highest priority first.
const TITLE_SOURCES: &[&str] = &[
    "h1",
    ".article-title",
    ".news-title",
    ".post-title",
    "[data-testid=\"headline\"]",
    "meta[property=\"og:title\"]",
    "title",
];

pub fn extract_article_info<D: DomQuery + ?Sized>(url: &Url, dom: &D) -> ArticleInfo {
    let title = TITLE_SOURCES
        .iter()
        .filter_map(|selector| dom.query_selector(selector).map(|el| candidate_text(&el)))
        .find(|text| text.chars().count() > MIN_TITLE_CHARS)
        .or_else(|| {
            let document_title = collapse_whitespace(&dom.document_title());
            (!document_title.is_empty()).then_some(document_title)
        })
        .unwrap_or_else(|| UNTITLED_ARTICLE.to_string());

    ArticleInfo {
        url: url.to_string(),
        title,
        hostname: url.host_str().unwrap_or_default().to_string(),
    }
}

// meta tags carry their text in `content`
fn candidate_text<E: DomElement>(element: &E) -> String {
    let text = collapse_whitespace(&element.text_content());
    if !text.is_empty() {
        return text;
    }
    element
        .attribute("content")
        .map(|content| collapse_whitespace(&content))
        .unwrap_or_default()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
