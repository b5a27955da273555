//! A small jQuery-flavoured view over `scraper`, shaped after what the
//! extractors need: select, read text, read attributes, probe classes.

use scraper::{ElementRef, Html, Selector};

/// One step of a fallback cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Concatenated text of every match.
    Text(&'static str),
    /// Text of the first match only.
    FirstText(&'static str),
    /// Attribute of the first match.
    Attr(&'static str, &'static str),
}

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn select(&self, css: &str) -> Vec<Node<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).map(Node::from).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn first(&self, css: &str) -> Option<Node<'_>> {
        let selector = Selector::parse(css).ok()?;
        self.html.select(&selector).next().map(Node::from)
    }

    pub fn exists(&self, css: &str) -> bool {
        self.first(css).is_some()
    }

    pub fn text(&self, css: &str) -> Option<String> {
        let text: String = self.select(css).iter().map(|node| node.raw_text()).collect();
        non_empty(text.trim())
    }

    pub fn first_text(&self, css: &str) -> Option<String> {
        self.first(css).and_then(|node| non_empty(&node.text()))
    }

    pub fn attr(&self, css: &str, name: &str) -> Option<String> {
        self.first(css)
            .and_then(|node| node.attr(name))
            .and_then(non_empty)
    }

    pub fn lookup(&self, lookup: Lookup) -> Option<String> {
        match lookup {
            Lookup::Text(css) => self.text(css),
            Lookup::FirstText(css) => self.first_text(css),
            Lookup::Attr(css, name) => self.attr(css, name),
        }
    }

    /// Walks the cascade in order and stops at the first non-empty value.
    pub fn first_of(&self, lookups: &[Lookup]) -> Option<String> {
        lookups.iter().find_map(|&lookup| self.lookup(lookup))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Node<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl<'a> Node<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Form-field value.
    pub fn value(&self) -> Option<&'a str> {
        self.attr("value")
    }

    pub fn text(&self) -> String {
        self.raw_text().trim().to_string()
    }

    fn raw_text(&self) -> String {
        self.element.text().collect()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.element.value().classes().any(|class| class == name)
    }

    pub fn find(&self, css: &str) -> Vec<Node<'a>> {
        match Selector::parse(css) {
            Ok(selector) => self.element.select(&selector).map(Node::from).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn find_first(&self, css: &str) -> Option<Node<'a>> {
        let selector = Selector::parse(css).ok()?;
        self.element.select(&selector).next().map(Node::from)
    }

    /// Text of every descendant matching `css`, concatenated and trimmed.
    pub fn find_text(&self, css: &str) -> String {
        let text: String = self.find(css).iter().map(|node| node.raw_text()).collect();
        text.trim().to_string()
    }

    /// Attribute of the first descendant matching `css`.
    pub fn find_attr(&self, css: &str, name: &str) -> Option<&'a str> {
        self.find_first(css).and_then(|node| node.attr(name))
    }
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title> Page title </title>
        <meta property="og:title" content="OG title"></head>
        <body>
          <p class="desc"> first </p><p class="desc">second</p>
          <img src=""><img src="https://cdn/b.jpg">
          <input name="token" value="abc123">
          <a class="download-file btn" href="/dl">Download</a>
        </body></html>
    "#;

    #[test]
    fn text_concatenates_all_matches() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.text(".desc"), Some("first second".to_string()));
        assert_eq!(doc.first_text("p"), Some("first".to_string()));
        assert_eq!(doc.text(".missing"), None);
    }

    #[test]
    fn attr_reads_only_the_first_match() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.attr("img", "src"), None);
        assert_eq!(
            doc.attr("meta[property='og:title']", "content"),
            Some("OG title".to_string())
        );
    }

    #[test]
    fn cascade_stops_at_first_value() {
        let doc = Document::parse(PAGE);
        let cascade = [
            Lookup::Text(".video-title"),
            Lookup::Attr("img", "src"),
            Lookup::Text("title"),
            Lookup::Text(".desc"),
        ];
        assert_eq!(doc.first_of(&cascade), Some("Page title".to_string()));
    }

    #[test]
    fn nodes_expose_value_and_classes() {
        let doc = Document::parse(PAGE);
        let input = doc.first("input[name='token']").unwrap();
        assert_eq!(input.value(), Some("abc123"));
        let link = doc.first("a").unwrap();
        assert!(link.has_class("download-file"));
        assert!(!link.has_class("download"));
    }

    #[test]
    fn invalid_selectors_match_nothing() {
        let doc = Document::parse(PAGE);
        assert!(doc.select("a[").is_empty());
        assert!(!doc.exists("a["));
    }
}
