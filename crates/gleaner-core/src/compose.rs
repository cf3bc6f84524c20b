//! Composition primitives for building pipelines out of processors.
//!
//! # Scalar vs batch pipelines
//!
//! - [`Compose`] threads a single value through its functions, stopping as
//!   soon as the value becomes `Null` (unless disabled).
//! - [`MapCompose`] threads a batch: each function is applied to every
//!   element and all outputs are flattened into the next batch before the
//!   following function runs. A `Null` output drops the element at that stage.
//!
//! Both merge their default context keys below the call-time keys of the
//! context they are invoked with.
//!
//! # Example
//!
//! ```ignore
//! use gleaner_core::compose::MapCompose;
//! use gleaner_core::processors::{RemoveTag, Strip};
//!
//! let clean = MapCompose::new([RemoveTag::all().shared(), Strip::new().shared()]);
//! let out = clean.process(Value::list(["<b>Hi</b>", " there "]), &Context::new())?;
//! ```

use gleaner_model::{Context, ContextLayer, ContextValue, Processor, ProcessorRef, Result, Value};

/// Sequential pipeline over a single value.
#[derive(Debug, Clone)]
pub struct Compose {
    functions: Vec<ProcessorRef>,
    stop_on_null: bool,
    defaults: ContextLayer,
}

impl Compose {
    /// Create a pipeline; stop-on-null is enabled.
    pub fn new(functions: impl IntoIterator<Item = ProcessorRef>) -> Self {
        Self {
            functions: functions.into_iter().collect(),
            stop_on_null: true,
            defaults: ContextLayer::new(),
        }
    }

    /// Enable or disable the early exit on `Null`.
    pub fn stop_on_null(mut self, enabled: bool) -> Self {
        self.stop_on_null = enabled;
        self
    }

    /// Add a pipeline-default context key.
    pub fn with_default(mut self, key: impl Into<String>, value: ContextValue) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Processor for Compose {
    fn process(&self, mut value: Value, context: &Context) -> Result<Value> {
        let context = context.with_pipeline_defaults(&self.defaults);
        for function in &self.functions {
            if self.stop_on_null && value.is_null() {
                break;
            }
            value = function.process(value, &context)?;
        }
        Ok(value)
    }
}

/// Element-wise pipeline over a batch, flattening after every stage.
#[derive(Debug, Clone)]
pub struct MapCompose {
    functions: Vec<ProcessorRef>,
    defaults: ContextLayer,
}

impl MapCompose {
    pub fn new(functions: impl IntoIterator<Item = ProcessorRef>) -> Self {
        Self {
            functions: functions.into_iter().collect(),
            defaults: ContextLayer::new(),
        }
    }

    /// Add a pipeline-default context key.
    pub fn with_default(mut self, key: impl Into<String>, value: ContextValue) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Processor for MapCompose {
    fn process(&self, value: Value, context: &Context) -> Result<Value> {
        let context = context.with_pipeline_defaults(&self.defaults);
        let mut batch = value.into_batch();
        for function in &self.functions {
            let mut next = Vec::with_capacity(batch.len());
            for element in batch {
                next.extend(function.process(element, &context)?.into_batch());
            }
            batch = next;
        }
        Ok(Value::List(batch))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use gleaner_model::from_fn;

    use super::*;

    #[test]
    fn compose_runs_functions_in_order() {
        let pipeline = Compose::new([
            from_fn("append_a", |v| Ok(format!("{}a", v.as_str().unwrap_or("")).into())),
            from_fn("append_b", |v| Ok(format!("{}b", v.as_str().unwrap_or("")).into())),
        ]);
        let out = pipeline.process(Value::from(">"), &Context::new()).unwrap();
        assert_eq!(out, Value::from(">ab"));
    }

    #[test]
    fn compose_stops_on_null() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let pipeline = Compose::new([
            from_fn("to_null", |_| Ok(Value::Null)),
            from_fn("count", move |v| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(v)
            }),
        ]);
        let out = pipeline.process(Value::from("x"), &Context::new()).unwrap();
        assert_eq!(out, Value::Null);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn compose_without_stop_passes_null_along() {
        let pipeline = Compose::new([
            from_fn("to_null", |_| Ok(Value::Null)),
            from_fn("default", |v| Ok(if v.is_null() { "default".into() } else { v })),
        ])
        .stop_on_null(false);
        let out = pipeline.process(Value::from("x"), &Context::new()).unwrap();
        assert_eq!(out, Value::from("default"));
    }

    #[test]
    fn map_compose_flattens_every_stage() {
        let double = || from_fn("double", |v| Ok(Value::List(vec![v.clone(), v])));
        let pipeline = MapCompose::new([double(), double()]);
        let out = pipeline.process(Value::list([1, 2]), &Context::new()).unwrap();
        assert_eq!(out, Value::list([1, 1, 1, 1, 2, 2, 2, 2]));
    }

    #[test]
    fn map_compose_drops_null_outputs_per_stage() {
        let pipeline = MapCompose::new([
            from_fn("keep_even", |v| {
                Ok(match v {
                    Value::Int(i) if i % 2 == 0 => Value::Int(i),
                    _ => Value::Null,
                })
            }),
            from_fn("tenfold", |v| match v {
                Value::Int(i) => Ok(Value::Int(i * 10)),
                other => Ok(other),
            }),
        ]);
        let out = pipeline
            .process(Value::list([1, 2, 3, 4]), &Context::new())
            .unwrap();
        assert_eq!(out, Value::list([20, 40]));
    }

    #[test]
    fn map_compose_on_scalar_and_null() {
        let pipeline = MapCompose::new([from_fn("identity", Ok)]);
        assert_eq!(
            pipeline.process(Value::from("x"), &Context::new()).unwrap(),
            Value::list(["x"])
        );
        assert_eq!(
            pipeline.process(Value::Null, &Context::new()).unwrap(),
            Value::List(vec![])
        );
    }

    #[test]
    fn call_time_context_wins_over_pipeline_defaults() {
        let read_sep = from_fn_with_context_sep();
        let pipeline =
            Compose::new([read_sep]).with_default("sep", ContextValue::value("default"));

        let out = pipeline.process(Value::Null, &Context::new());
        // stop-on-null short-circuits before the function sees the context
        assert_eq!(out.unwrap(), Value::Null);

        let out = pipeline.process(Value::from("x"), &Context::new()).unwrap();
        assert_eq!(out, Value::from("default"));

        let mut call = ContextLayer::new();
        call.insert("sep".to_string(), ContextValue::value("call"));
        let out = pipeline
            .process(Value::from("x"), &Context::from_call(call))
            .unwrap();
        assert_eq!(out, Value::from("call"));
    }

    fn from_fn_with_context_sep() -> ProcessorRef {
        gleaner_model::from_fn_with_context("sep", |_, ctx| {
            Ok(ctx.value("sep").cloned().unwrap_or_default())
        })
    }
}
