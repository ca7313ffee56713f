//! Decides whether a page is an analyzable news article and extracts the
//! metadata shown next to it.
//!
//! A page qualifies when its host is on the news allow-list and either its
//! path looks like an article or its DOM carries an article container.

pub mod dom;
pub mod domains;
pub mod model;
pub mod patterns;
pub mod title;

#[cfg(test)]
mod tests;

pub use dom::{DomElement, DomQuery, HtmlPage};
pub use model::{ArticleInfo, PageClassification};
pub use title::{UNTITLED_ARTICLE, extract_article_info};

use tracing::debug;
use url::Url;

enum Marker {
    Tag(&'static str),
    Class(&'static str),
    Role(&'static str),
}

const ARTICLE_MARKERS: &[Marker] = &[
    Marker::Tag("article"),
    Marker::Class("article"),
    Marker::Class("news-content"),
    Marker::Class("post-content"),
    Marker::Role("article"),
];

impl Marker {
    fn selector(&self) -> String {
        match self {
            Self::Tag(tag) => tag.to_string(),
            Self::Class(class) => format!(".{class}"),
            Self::Role(role) => format!("[role=\"{role}\"]"),
        }
    }

    fn matches<E: DomElement>(&self, element: &E) -> bool {
        match self {
            Self::Tag(_) => true,
            Self::Class(class) => element.has_class(class),
            Self::Role(role) => element.attribute("role").as_deref() == Some(*role),
        }
    }
}

/// `hostname` may be given raw; it is case-folded and `www.`-stripped here.
pub fn is_news_article<D: DomQuery + ?Sized>(url: &Url, hostname: &str, dom: &D) -> bool {
    if !domains::is_news_domain(hostname) {
        return false;
    }

    patterns::has_article_path(url.path()) || has_article_markers(dom)
}

pub fn has_article_markers<D: DomQuery + ?Sized>(dom: &D) -> bool {
    ARTICLE_MARKERS.iter().any(|marker| {
        dom.query_selector(&marker.selector())
            .is_some_and(|element| marker.matches(&element))
    })
}

/// Parses `html` and runs both detector operations against it.
pub fn classify_page(url: &Url, html: &str) -> PageClassification {
    let page = HtmlPage::parse(html);
    let hostname = url.host_str().unwrap_or_default();
    let is_news_article = is_news_article(url, hostname, &page);
    let article_info = extract_article_info(url, &page);

    debug!(
        url = %url,
        is_news_article,
        title = %article_info.title,
        "classified page"
    );

    PageClassification {
        is_news_article,
        article_info,
    }
}
