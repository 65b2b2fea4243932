//! `MarkupDocument` backed by the `scraper` HTML parser

use scraper::{ElementRef, Html, Selector};

use super::{normalize_ws, MarkupDocument, MarkupNode};

/// Parsed HTML document
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse a full HTML document. Malformed markup is recovered, never rejected.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }
}

/// Compile a CSS selector, logging and discarding invalid ones
fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            log::warn!("invalid selector {:?}: {:?}", selector, e);
            None
        }
    }
}

impl MarkupDocument for HtmlDocument {
    type Node<'a> = HtmlNode<'a>;

    fn select_all(&self, selector: &str) -> Vec<HtmlNode<'_>> {
        compile(selector)
            .map(|sel| self.html.select(&sel).map(HtmlNode).collect())
            .unwrap_or_default()
    }
}

/// Element handle inside an `HtmlDocument`
#[derive(Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl<'a> MarkupNode<'a> for HtmlNode<'a> {
    fn select_all(&self, selector: &str) -> Vec<Self> {
        compile(selector)
            .map(|sel| self.0.select(&sel).map(HtmlNode).collect())
            .unwrap_or_default()
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    fn text(&self) -> String {
        normalize_ws(&self.0.text().collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_read() {
        let doc = HtmlDocument::parse(
            r#"<div><p class="a" data-x="1"> hello
                 <b>world</b> </p><p>other</p></div>"#,
        );
        let nodes = doc.select_all("p.a");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].attr("data-x"), Some("1"));
        assert_eq!(nodes[0].attr("missing"), None);
        assert_eq!(nodes[0].text(), "hello world");
        assert_eq!(nodes[0].select_all("b").len(), 1);
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = HtmlDocument::parse("<p>x</p>");
        assert!(doc.select_all("p[").is_empty());
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        let doc = HtmlDocument::parse("<table><td data-date='2024-01-01'>unclosed");
        assert_eq!(doc.select_all("td[data-date]").len(), 1);
    }
}
