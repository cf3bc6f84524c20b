//! Default HTML selector backed by `scraper`.
//!
//! Queries are CSS selectors with two optional suffixes:
//!
//! - `::text` selects the text nodes directly under each matched element,
//! - `::attr(name)` selects the value of an attribute of each matched element.
//!
//! A query made of only a suffix (`"::text"`) applies to the current node.
//! Matched elements keep the document markup and their position in it, so
//! selectors stay `Send` and `Sync` and nested queries see the element in its
//! original context.

use std::sync::Arc;

use scraper::{ElementRef, Html};

use crate::error::{Result, SelectError};
use crate::selector::{Response, Selector, SelectorList, SelectorRef};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Document,
    /// Element at a preorder position of the parsed document.
    Element {
        position: usize,
        markup: Arc<str>,
    },
    Text(Arc<str>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pseudo {
    None,
    Text,
    Attr(String),
}

/// Selector over an HTML document, element, or text fragment.
#[derive(Debug, Clone)]
pub struct HtmlSelector {
    document: Arc<str>,
    node: Node,
}

impl HtmlSelector {
    /// Selector over a whole document given as raw markup.
    pub fn from_text(markup: impl AsRef<str>) -> Self {
        Self {
            document: Arc::from(markup.as_ref()),
            node: Node::Document,
        }
    }

    /// Selector over the body of a response.
    pub fn from_response(response: &Response) -> Self {
        Self::from_text(&response.body)
    }

    fn derive(&self, node: Node) -> SelectorRef {
        Arc::new(Self {
            document: Arc::clone(&self.document),
            node,
        })
    }

    fn collect(
        &self,
        element: ElementRef<'_>,
        position: usize,
        pseudo: &Pseudo,
        out: &mut Vec<SelectorRef>,
    ) {
        match pseudo {
            Pseudo::None => out.push(self.derive(Node::Element {
                position,
                markup: Arc::from(element.html()),
            })),
            Pseudo::Text => out.extend(
                element
                    .children()
                    .filter_map(|node| node.value().as_text())
                    .map(|text| self.derive(Node::Text(Arc::from(&**text)))),
            ),
            Pseudo::Attr(name) => {
                if let Some(value) = element.value().attr(name) {
                    out.push(self.derive(Node::Text(Arc::from(value))));
                }
            }
        }
    }
}

impl Selector for HtmlSelector {
    fn select(&self, query: &str) -> Result<SelectorList> {
        let base = match &self.node {
            Node::Text(_) => return Ok(SelectorList::default()),
            Node::Document => 0,
            Node::Element { position, .. } => *position,
        };

        let (css, pseudo) = split_pseudo(query)?;
        let selector = if css.is_empty() {
            None
        } else {
            let parsed =
                scraper::Selector::parse(css).map_err(|err| SelectError::InvalidQuery {
                    query: query.to_string(),
                    message: err.to_string(),
                })?;
            Some(parsed)
        };

        let html = Html::parse_document(&self.document);
        let mut items = Vec::new();
        let Some(scope) = html.tree.root().descendants().nth(base) else {
            return Ok(SelectorList::default());
        };

        match &selector {
            // An empty query addresses the node itself; the document stands
            // for its root element.
            None => match ElementRef::wrap(scope) {
                Some(element) => self.collect(element, base, &pseudo, &mut items),
                None => {
                    let root = html.root_element();
                    let offset = scope
                        .descendants()
                        .position(|node| node.id() == root.id())
                        .unwrap_or_default();
                    self.collect(root, base + offset, &pseudo, &mut items);
                }
            },
            Some(selector) => {
                for (offset, node) in scope.descendants().enumerate() {
                    if let Some(element) = ElementRef::wrap(node)
                        && selector.matches(&element)
                    {
                        self.collect(element, base + offset, &pseudo, &mut items);
                    }
                }
            }
        }

        tracing::trace!(query, matches = items.len(), "evaluated selector query");
        Ok(SelectorList::new(items))
    }

    fn extract(&self) -> String {
        match &self.node {
            Node::Document => self.document.to_string(),
            Node::Element { markup, .. } | Node::Text(markup) => markup.to_string(),
        }
    }
}

/// Split a trailing `::text` / `::attr(name)` from a CSS query.
fn split_pseudo(query: &str) -> Result<(&str, Pseudo)> {
    let query = query.trim();
    if let Some(css) = query.strip_suffix("::text") {
        return Ok((css.trim(), Pseudo::Text));
    }
    if let Some(start) = query.rfind("::attr(") {
        let rest = &query[start + "::attr(".len()..];
        let Some(name) = rest.strip_suffix(')') else {
            return Err(SelectError::InvalidQuery {
                query: query.to_string(),
                message: "unterminated ::attr(".to_string(),
            });
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(SelectError::InvalidQuery {
                query: query.to_string(),
                message: "empty attribute name".to_string(),
            });
        }
        return Ok((query[..start].trim(), Pseudo::Attr(name.to_string())));
    }
    Ok((query, Pseudo::None))
}
