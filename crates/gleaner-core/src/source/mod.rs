//! Value sources an [`ItemLoader`](crate::ItemLoader) can be composed with.
//!
//! A source contributes its entries to the loader context when the loader is
//! built and provides the raw values behind the loader's source-specific
//! operations (`add_path`, `add_regex`, ...).

mod selector;
mod text;

pub use selector::SelectorSource;
pub use text::{KvSplit, RegexSource};

use gleaner_model::ContextLayer;

/// Strategy supplying raw values and context entries to a loader.
pub trait ValueSource {
    /// Entries added to the loader-instance context layer.
    fn context_entries(&self) -> ContextLayer {
        ContextLayer::new()
    }
}

/// Source of a plain loader fed only through `add_value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl ValueSource for NoSource {}
