//! Selector capability for gleaner loaders.
//!
//! - **selector**: the [`Selector`] trait, [`SelectorList`] batches and [`Response`]
//! - **html**: [`HtmlSelector`], the default selector built from raw markup
//! - **extract**: regex extraction shared by selectors and loaders

pub mod error;
pub mod extract;
pub mod html;
pub mod selector;

pub use error::{Result, SelectError};
pub use extract::{compile, extract_regex};
pub use html::HtmlSelector;
pub use selector::{Response, Selector, SelectorList, SelectorRef};
