//! Read-only page handle the extractor works against.

use scraper::{ElementRef, Html, Node, Selector};

/// What the extractor needs from a job-posting page.
pub trait Page {
    fn url(&self) -> &str;

    fn title(&self) -> String;

    /// Rendered-ish text of the whole body, one block per line.
    fn body_text(&self) -> String;

    /// Text of the first element matching `selector`, trimmed.
    /// `None` when nothing matches or the selector does not parse.
    fn query_text(&self, selector: &str) -> Option<String>;

    /// Text of every element matching `selector`, in document order.
    fn query_all_text(&self, selector: &str) -> Vec<String>;

    /// `content` attribute of the first matching `<meta>` tag.
    fn meta_content(&self, selector: &str) -> Option<String>;
}

/// A parsed HTML document.
pub struct HtmlPage {
    url: String,
    document: Html,
}

impl HtmlPage {
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }

    fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selector).ok()?;
        self.document.select(&selector).next()
    }
}

impl Page for HtmlPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn title(&self) -> String {
        self.select_first("title")
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    fn body_text(&self) -> String {
        match self.select_first("body") {
            Some(body) => inner_text(body),
            None => inner_text(self.document.root_element()),
        }
    }

    fn query_text(&self, selector: &str) -> Option<String> {
        self.select_first(selector).map(inner_text)
    }

    fn query_all_text(&self, selector: &str) -> Vec<String> {
        match Selector::parse(selector) {
            Ok(selector) => self.document.select(&selector).map(inner_text).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn meta_content(&self, selector: &str) -> Option<String> {
        self.select_first(selector)
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string())
    }
}

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Approximates a browser's `innerText`: whitespace collapsed inside a line,
/// block elements on their own lines, hidden content skipped.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            let name = el.value().name();
            if SKIPPED.contains(&name) {
                continue;
            }
            let block = BLOCKS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(el, out);
            if block {
                out.push('\n');
            }
        } else if let Node::Text(text) = child.value() {
            // Newlines inside a text node are layout whitespace, not line breaks.
            out.push_str(&text.replace('\n', " "));
        }
    }
}
