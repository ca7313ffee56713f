use std::collections::HashMap;
use std::fs;
use url::Url;

use crate::detector::{
    DomElement, DomQuery, HtmlPage, UNTITLED_ARTICLE, classify_page, extract_article_info,
    is_news_article,
};

#[derive(Debug, Clone, Default)]
struct FakeElement {
    text: String,
    attributes: HashMap<String, String>,
    classes: Vec<String>,
}

impl FakeElement {
    fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }
}

impl DomElement for FakeElement {
    fn text_content(&self) -> String {
        self.text.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }
}

/// Maps selector strings straight to elements.
#[derive(Debug, Default)]
struct FakeDom {
    elements: HashMap<String, FakeElement>,
    title: String,
}

impl FakeDom {
    fn with(mut self, selector: &str, element: FakeElement) -> Self {
        self.elements.insert(selector.to_string(), element);
        self
    }

    fn titled(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

impl DomQuery for FakeDom {
    type Element<'a>
        = FakeElement
    where
        Self: 'a;

    fn query_selector(&self, selector: &str) -> Option<FakeElement> {
        self.elements.get(selector).cloned()
    }

    fn document_title(&self) -> String {
        self.title.clone()
    }
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn classify(s: &str, dom: &FakeDom) -> bool {
    let parsed = url(s);
    let host = parsed.host_str().unwrap().to_string();
    is_news_article(&parsed, &host, dom)
}

#[test]
fn test_unknown_domain_is_never_an_article() {
    let dom = FakeDom::default()
        .with("article", FakeElement::text("body"))
        .with(".news-content", FakeElement::text("body").with_class("news-content"));

    assert!(!classify("https://example.com/article/123", &dom));
    assert!(!classify("https://example.com/news/2024/05/01/12345", &dom));
    assert!(!classify("https://blog.example.org/story/x.html", &dom));
}

#[test]
fn test_article_path_without_markers() {
    assert!(classify("https://oxu.az/article/123", &FakeDom::default()));
    assert!(classify("https://www.bbc.com/article/123", &FakeDom::default()));
}

#[test]
fn test_date_path_scenario() {
    assert!(classify(
        "https://oxu.az/news/2024/05/01/12345",
        &FakeDom::default()
    ));
    assert!(!classify(
        "https://example.com/news/2024/05/01/12345",
        &FakeDom::default()
    ));
}

#[test]
fn test_allowed_domain_without_signals() {
    assert!(!classify("https://oxu.az/", &FakeDom::default()));
    assert!(!classify("https://oxu.az/about", &FakeDom::default()));
    assert!(!classify("https://publika.az/contact?ref=nav", &FakeDom::default()));
}

#[test]
fn test_markers_alone_qualify_allowed_domain() {
    let tag = FakeDom::default().with("article", FakeElement::default());
    assert!(classify("https://oxu.az/about", &tag));

    let class = FakeDom::default().with(".post-content", FakeElement::default().with_class("post-content"));
    assert!(classify("https://oxu.az/about", &class));

    let role = FakeDom::default().with(
        "[role=\"article\"]",
        FakeElement::default().with_attr("role", "article"),
    );
    assert!(classify("https://oxu.az/about", &role));
}

#[test]
fn test_marker_element_must_carry_the_hint() {
    // selector matched but the element does not actually have the class
    let dom = FakeDom::default().with(".article", FakeElement::default());
    assert!(!classify("https://oxu.az/about", &dom));
}

#[test]
fn test_hostname_is_normalized() {
    let parsed = url("https://oxu.az/about");
    let dom = FakeDom::default().with("article", FakeElement::default());
    assert!(is_news_article(&parsed, "WWW.OXU.AZ", &dom));
}

#[test]
fn test_untitled_when_nothing_qualifies() {
    let info = extract_article_info(&url("https://oxu.az/x"), &FakeDom::default());
    assert_eq!(info.title, UNTITLED_ARTICLE);
    assert_eq!(info.hostname, "oxu.az");
    assert_eq!(info.url, "https://oxu.az/x");
}

#[test]
fn test_short_candidates_are_skipped() {
    let dom = FakeDom::default()
        .with("h1", FakeElement::text("Oxu.az"))
        .with(".news-title", FakeElement::text("  Prezident yeni fərman imzaladı  "))
        .titled("Oxu.az - Xəbərlər");

    let info = extract_article_info(&url("https://oxu.az/news/1"), &dom);
    assert_eq!(info.title, "Prezident yeni fərman imzaladı");
}

#[test]
fn test_meta_title_uses_content_attribute() {
    let dom = FakeDom::default()
        .with("h1", FakeElement::text("Menu"))
        .with(
            "meta[property=\"og:title\"]",
            FakeElement::default().with_attr("content", "Open Graph headline for story"),
        );

    let info = extract_article_info(&url("https://cnn.com/2024/01/01/x"), &dom);
    assert_eq!(info.title, "Open Graph headline for story");
}

#[test]
fn test_falls_back_to_raw_document_title() {
    let dom = FakeDom::default()
        .with("h1", FakeElement::text("Short"))
        .titled("Home");

    let info = extract_article_info(&url("https://oxu.az/"), &dom);
    assert_eq!(info.title, "Home");
}

#[test]
fn test_classify_article_fixture() {
    let html = fs::read_to_string("src/detector/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let result = classify_page(&url("https://oxu.az/politics"), &html);

    assert!(result.is_news_article);
    assert_eq!(
        result.article_info.title,
        "Parlament yeni qanun layihəsini qəbul etdi"
    );
    assert_eq!(result.article_info.hostname, "oxu.az");
}

#[test]
fn test_classify_landing_fixture() {
    let html = fs::read_to_string("src/detector/tests/fixtures/landing.html")
        .expect("Failed to read test fixture");

    let result = classify_page(&url("https://www.bbc.com/"), &html);

    assert!(!result.is_news_article);
    assert_eq!(result.article_info.title, "Home");
    assert_eq!(result.article_info.hostname, "www.bbc.com");
}

#[test]
fn test_html_page_without_title() {
    let page = HtmlPage::parse("<html><body><p>nothing here</p></body></html>");
    let info = extract_article_info(&url("https://oxu.az/"), &page);
    assert_eq!(info.title, UNTITLED_ARTICLE);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_unlisted_hosts_never_qualify(
            host in "[a-z]{3,12}\\.(com|net|io)",
            path in "(/[a-z0-9]{1,8}){0,5}(\\.html)?",
        ) {
            prop_assume!(!crate::detector::domains::is_news_domain(&host));
            let parsed = url(&format!("https://{host}{path}"));
            let dom = FakeDom::default().with("article", FakeElement::default());
            prop_assert!(!is_news_article(&parsed, &host, &dom));
        }

        #[test]
        fn test_classify_never_panics(html in ".*") {
            let _ = classify_page(&url("https://oxu.az/news/1"), &html);
        }
    }
}
