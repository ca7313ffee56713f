use scraper::{ElementRef, Html, Selector};

/// Read-only view of a single element.
pub trait DomElement {
    fn text_content(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn has_class(&self, name: &str) -> bool;
}

/// Minimal DOM capability the detector needs from a page.
pub trait DomQuery {
    type Element<'a>: DomElement
    where
        Self: 'a;

    /// First element matching `selector`. Invalid selectors match nothing.
    fn query_selector(&self, selector: &str) -> Option<Self::Element<'_>>;

    /// Contents of the document's `<title>`, empty when there is none.
    fn document_title(&self) -> String;
}

/// A parsed HTML document.
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

impl DomQuery for HtmlPage {
    type Element<'a>
        = ElementRef<'a>
    where
        Self: 'a;

    fn query_selector(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selector).ok()?;
        self.document.select(&selector).next()
    }

    fn document_title(&self) -> String {
        self.query_selector("title")
            .map(|title| title.text_content())
            .unwrap_or_default()
    }
}

impl DomElement for ElementRef<'_> {
    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn has_class(&self, name: &str) -> bool {
        self.value().classes().any(|class| class == name)
    }
}
