//! The selector capability consumed by selector-driven loaders.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::Result;
use crate::extract::extract_regex;

/// A node (or text fragment) of a navigable document.
///
/// `select` evaluates a path query relative to this node and returns the
/// matches in document order.
pub trait Selector: Send + Sync + fmt::Debug {
    /// Evaluate `query` relative to this node.
    fn select(&self, query: &str) -> Result<SelectorList>;

    /// Serialized content of this node.
    fn extract(&self) -> String;

    /// Apply `pattern` to the extracted content.
    fn re(&self, pattern: &Regex) -> Vec<String> {
        extract_regex(pattern, &self.extract())
    }
}

/// Shared handle to a selector.
pub type SelectorRef = Arc<dyn Selector>;

/// An ordered batch of selectors.
#[derive(Debug, Clone, Default)]
pub struct SelectorList {
    items: Vec<SelectorRef>,
}

impl SelectorList {
    pub fn new(items: Vec<SelectorRef>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectorRef> {
        self.items.iter()
    }

    /// Evaluate `query` on every member and flatten the results.
    pub fn select(&self, query: &str) -> Result<SelectorList> {
        let mut items = Vec::new();
        for selector in &self.items {
            items.extend(selector.select(query)?.items);
        }
        Ok(Self { items })
    }

    /// Apply `pattern` to every member and flatten the matches.
    pub fn re(&self, pattern: &Regex) -> Vec<String> {
        self.items.iter().flat_map(|s| s.re(pattern)).collect()
    }

    /// First regex match across the batch.
    pub fn re_first(&self, pattern: &Regex) -> Option<String> {
        self.re_at(pattern, 0)
    }

    /// Regex match at `index` across the batch.
    pub fn re_at(&self, pattern: &Regex, index: usize) -> Option<String> {
        self.re(pattern).into_iter().nth(index)
    }

    /// Extracted content of every member.
    pub fn extract(&self) -> Vec<String> {
        self.items.iter().map(|s| s.extract()).collect()
    }

    /// Extracted content of the first member.
    pub fn extract_first(&self) -> Option<String> {
        self.extract_at(0)
    }

    /// Extracted content of the member at `index`.
    pub fn extract_at(&self, index: usize) -> Option<String> {
        self.items.get(index).map(|s| s.extract())
    }
}

impl IntoIterator for SelectorList {
    type Item = SelectorRef;
    type IntoIter = std::vec::IntoIter<SelectorRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// A fetched document handed to a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub body: String,
}

impl Response {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }
}
