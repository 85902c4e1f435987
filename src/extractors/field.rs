//! Label/value lookups over a parsed listing page.
//!
//! Detail pages lay fields out as a label node followed by a value node,
//! e.g. `<dt>個数</dt><dd class="ProductDetail__description">：1</dd>`.
//! A lookup finds the label first, then the nearest following sibling that
//! matches the value selector. A missing label or value yields `None`; it is
//! up to the caller to pick the zero value.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::error::{Error, Result};

/// Parse a CSS selector, reporting the offending text on failure.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| Error::Selector(css.to_string()))
}

/// Parse a selector that is a compile-time literal.
pub(crate) fn static_selector(css: &'static str) -> Selector {
    selector(css).unwrap_or_else(|e| panic!("{e}"))
}

/// How the first node of a field is found.
#[derive(Debug, Clone, Copy)]
pub enum Label<'a> {
    /// First node matching `selector` whose text is exactly `text`.
    Text { selector: &'a Selector, text: &'a str },
    /// First node matching `selector`.
    Node(&'a Selector),
}

/// How the value node's text is turned into the raw field string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRead {
    /// Drop the leading separator glyph.
    Detail,
    /// Keep the first line, then drop `trailing` characters from its end.
    Counter { trailing: usize },
    /// The text as-is.
    Whole,
}

impl TextRead {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextRead::Detail => text.chars().skip(1).collect(),
            TextRead::Counter { trailing } => {
                let line = text.lines().next().unwrap_or("");
                let keep = line.chars().count().saturating_sub(trailing);
                line.chars().take(keep).collect()
            }
            TextRead::Whole => text.to_string(),
        }
    }
}

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parsing never fails; invalid UTF-8 is replaced lossily.
    pub fn parse(bytes: &[u8]) -> Self {
        let source = String::from_utf8_lossy(bytes);
        Self::parse_str(&source)
    }

    pub fn parse_str(source: &str) -> Self {
        Self { html: Html::parse_document(source) }
    }

    pub fn find_by_label(&self, label: &Label<'_>) -> Option<ElementRef<'_>> {
        match *label {
            Label::Text { selector, text } => self
                .html
                .select(selector)
                .find(|node| Self::read_text(*node) == text),
            Label::Node(selector) => self.html.select(selector).next(),
        }
    }

    pub fn find_sibling<'a>(&'a self, node: ElementRef<'a>, sibling: &Selector) -> Option<ElementRef<'a>> {
        node.next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|candidate| sibling.matches(candidate))
    }

    pub fn read_text(node: ElementRef<'_>) -> String {
        node.text().collect()
    }

    /// All nodes matching `selector`, in document order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }
}

/// Value of a detail field, without its leading separator glyph.
pub fn extract(doc: &Document, label: &Label<'_>, sibling: &Selector) -> Option<String> {
    extract_with(doc, label, sibling, TextRead::Detail)
}

/// Value of a counter field: its first line, minus `trailing` characters.
pub fn extract_counter(doc: &Document, label: &Label<'_>, sibling: &Selector, trailing: usize) -> Option<String> {
    extract_with(doc, label, sibling, TextRead::Counter { trailing })
}

pub fn extract_with(doc: &Document, label: &Label<'_>, sibling: &Selector, read: TextRead) -> Option<String> {
    let Some(label_node) = doc.find_by_label(label) else {
        trace!(?label, "Label not found");
        return None;
    };
    let Some(value_node) = doc.find_sibling(label_node, sibling) else {
        trace!(?label, "Value node not found");
        return None;
    };
    Some(read.apply(&Document::read_text(value_node)))
}

/// Text of the first node matching `selector`.
pub fn extract_text(doc: &Document, selector: &Selector) -> Option<String> {
    doc.select(selector).next().map(Document::read_text)
}
