//! Loader context threaded through every processor call.
//!
//! A [`Context`] is made of three layers, looked up in this order:
//!
//! 1. **call-time**: keys supplied when a pipeline is invoked directly,
//! 2. **pipeline-default**: keys declared on a `Compose`/`MapCompose`,
//! 3. **loader-instance**: keys set when the loader was constructed
//!    (`item`, `selector`, `response`, `texts`, plus user keys).
//!
//! Layers are shared behind `Arc`, so cloning a context is cheap. Processors
//! only ever see `&Context` and cannot change it.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// A single layer of context entries.
pub type ContextLayer = BTreeMap<String, ContextValue>;

/// A context entry: a plain value or a shared opaque handle.
#[derive(Clone)]
pub enum ContextValue {
    Value(Value),
    Shared(Arc<dyn Any + Send + Sync>),
}

impl ContextValue {
    /// Wrap anything convertible into a [`Value`].
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Wrap any shareable object (a selector, a response, ...).
    pub fn shared<T: Any + Send + Sync>(value: T) -> Self {
        Self::Shared(Arc::new(value))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Shared(_) => None,
        }
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Shared(_) => f.write_str("Shared(..)"),
        }
    }
}

impl From<Value> for ContextValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Layered, read-only processor context.
#[derive(Debug, Clone, Default)]
pub struct Context {
    call: Arc<ContextLayer>,
    pipeline: Arc<ContextLayer>,
    loader: Arc<ContextLayer>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose only layer is the loader-instance layer.
    pub fn from_loader(layer: ContextLayer) -> Self {
        Self {
            loader: Arc::new(layer),
            ..Self::default()
        }
    }

    /// A context whose only layer is the call-time layer.
    pub fn from_call(layer: ContextLayer) -> Self {
        Self {
            call: Arc::new(layer),
            ..Self::default()
        }
    }

    /// Overlay call-time keys. Keys in `layer` replace existing call-time keys.
    pub fn with_call(&self, layer: &ContextLayer) -> Self {
        if layer.is_empty() {
            return self.clone();
        }
        let mut call = (*self.call).clone();
        call.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            call: Arc::new(call),
            ..self.clone()
        }
    }

    /// Merge a pipeline's default keys.
    ///
    /// Keys already present in the pipeline layer win, so the defaults of an
    /// outer pipeline take precedence over those of a nested one.
    pub fn with_pipeline_defaults(&self, defaults: &ContextLayer) -> Self {
        if defaults.is_empty() {
            return self.clone();
        }
        let mut pipeline = (*self.pipeline).clone();
        for (key, value) in defaults {
            pipeline
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        Self {
            pipeline: Arc::new(pipeline),
            ..self.clone()
        }
    }

    /// Look up a key: call-time, then pipeline-default, then loader-instance.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.call
            .get(key)
            .or_else(|| self.pipeline.get(key))
            .or_else(|| self.loader.get(key))
    }

    /// Look up a plain value.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(ContextValue::as_value)
    }

    /// Look up a shared handle and downcast it.
    pub fn shared<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        match self.get(key)? {
            ContextValue::Shared(handle) => Arc::clone(handle).downcast::<T>().ok(),
            ContextValue::Value(_) => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.call.is_empty() && self.pipeline.is_empty() && self.loader.is_empty()
    }
}
