//! Core data model for gleaner loaders.
//!
//! This crate provides the capabilities shared by every other gleaner crate:
//!
//! - **value**: the dynamic [`Value`] type and its truthiness/batch rules
//! - **context**: the layered, read-only [`Context`] passed to processors
//! - **processor**: the [`Processor`] trait and the closure adapter
//! - **record**: the [`Record`] capability, [`Item`] and field schemas
//! - **error**: the [`LoaderError`] taxonomy

pub mod context;
pub mod error;
pub mod processor;
pub mod record;
pub mod value;

pub use context::{Context, ContextLayer, ContextValue};
pub use error::{LoaderError, Result};
pub use processor::{
    FnProcessor, Processor, ProcessorExt, ProcessorRef, from_fn, from_fn_with_context,
};
pub use record::{FieldSchema, Item, ItemSchema, Record};
pub use value::Value;
