//! Item loaders and processor pipelines.
//!
//! - **loader**: [`ItemLoader`], the per-field value accumulator
//! - **definition**: default processors and per-field overrides
//! - **compose**: [`Compose`] and [`MapCompose`] pipelines
//! - **processors**: the reusable processor library
//! - **source**: selector- and regex-driven value sources
//! - **config**: declarative, serde-backed loader configuration

pub mod compose;
pub mod config;
pub mod definition;
pub mod loader;
pub mod processors;
pub mod source;

pub use compose::{Compose, MapCompose};
pub use config::{FieldConfig, LoaderConfig, ProcessorSpec};
pub use definition::{FieldProcessors, LoaderDefinition, ProcessorOrigin};
pub use loader::{ItemLoader, ValueTarget};
pub use source::{KvSplit, NoSource, RegexSource, SelectorSource, ValueSource};

pub use gleaner_model::{
    Context, ContextLayer, ContextValue, FieldSchema, FnProcessor, Item, ItemSchema, LoaderError,
    Processor, ProcessorExt, ProcessorRef, Record, Result, Value, from_fn, from_fn_with_context,
};
pub use gleaner_select::{HtmlSelector, Response, Selector, SelectorList, SelectorRef};
