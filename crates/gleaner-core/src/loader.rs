//! The item loader: a per-field value accumulator.
//!
//! Values added to a field run through the field's input processor and the
//! truthy results accumulate as pending values. Materializing runs every
//! field's pending values through its output processor and writes the result
//! on the record.
//!
//! # Example
//!
//! ```ignore
//! use gleaner_core::{ItemLoader, LoaderDefinition};
//! use gleaner_core::processors::{Strip, TakeFirst};
//!
//! let definition = LoaderDefinition::new()
//!     .with_field_input("name", Strip::new().shared())
//!     .with_field_output("name", TakeFirst.shared());
//! let mut loader = ItemLoader::new(Item::new()).with_definition(definition);
//! loader.add_value("name", "  Alice ", &[])?;
//! let item = loader.load_item()?;
//! ```

use std::collections::BTreeMap;

use gleaner_model::{
    Context, ContextLayer, ContextValue, Item, LoaderError, ProcessorRef, Record, Result, Value,
};
use gleaner_select::{compile, extract_regex};

use crate::definition::LoaderDefinition;
use crate::source::{NoSource, RegexSource, SelectorSource, ValueSource};

/// Where a processed value is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTarget {
    /// A single field.
    Field(String),
    /// Several fields: the processed value must be a mapping of field name
    /// to value.
    Mapping,
}

impl From<&str> for ValueTarget {
    fn from(field: &str) -> Self {
        Self::Field(field.to_string())
    }
}

impl From<String> for ValueTarget {
    fn from(field: String) -> Self {
        Self::Field(field)
    }
}

/// Accumulates field values for a record.
#[derive(Debug)]
pub struct ItemLoader<R = Item, S = NoSource> {
    record: R,
    source: S,
    definition: LoaderDefinition,
    user_context: ContextLayer,
    context: Context,
    values: BTreeMap<String, Vec<Value>>,
}

impl<R: Record> ItemLoader<R, NoSource> {
    /// A loader fed only through `add_value`.
    pub fn new(record: R) -> Self {
        Self::with_source(record, NoSource)
    }
}

impl<R: Record, S: ValueSource> ItemLoader<R, S> {
    /// A loader backed by `source`, with the default definition.
    pub fn with_source(record: R, source: S) -> Self {
        let mut loader = Self {
            record,
            source,
            definition: LoaderDefinition::default(),
            user_context: ContextLayer::new(),
            context: Context::new(),
            values: BTreeMap::new(),
        };
        loader.rebuild_context();
        tracing::debug!(context_keys = loader.user_context.len(), "created item loader");
        loader
    }

    pub fn with_definition(mut self, definition: LoaderDefinition) -> Self {
        self.definition = definition;
        self
    }

    /// Add a loader-instance context entry.
    ///
    /// `item` and the source's own entries cannot be overridden.
    pub fn with_context(mut self, key: impl Into<String>, value: ContextValue) -> Self {
        self.user_context.insert(key.into(), value);
        self.rebuild_context();
        self
    }

    fn rebuild_context(&mut self) {
        let mut layer = self.user_context.clone();
        layer.extend(self.source.context_entries());
        layer.insert("item".to_string(), ContextValue::Value(self.record.snapshot()));
        self.context = Context::from_loader(layer);
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn definition(&self) -> &LoaderDefinition {
        &self.definition
    }

    /// Mutable access to the processor overrides of this loader instance.
    pub fn definition_mut(&mut self) -> &mut LoaderDefinition {
        &mut self.definition
    }

    /// Process `value` with `processors` and add it to `target`.
    ///
    /// A falsy processed value is ignored.
    pub fn add_value(
        &mut self,
        target: impl Into<ValueTarget>,
        value: impl Into<Value>,
        processors: &[ProcessorRef],
    ) -> Result<()> {
        let value = self.get_value(value, processors, None)?;
        if !value.is_truthy() {
            return Ok(());
        }
        match target.into() {
            ValueTarget::Field(field) => self.add_field_value(&field, value),
            ValueTarget::Mapping => {
                for (field, value) in expect_mapping(value)? {
                    self.add_field_value(&field, value)?;
                }
                Ok(())
            }
        }
    }

    /// Like [`add_value`](Self::add_value), replacing the pending values of
    /// the target field(s).
    ///
    /// A single field is cleared even when the processed value is falsy.
    pub fn replace_value(
        &mut self,
        target: impl Into<ValueTarget>,
        value: impl Into<Value>,
        processors: &[ProcessorRef],
    ) -> Result<()> {
        let value = self.get_value(value, processors, None)?;
        match target.into() {
            ValueTarget::Field(field) => {
                self.values.remove(&field);
                if value.is_truthy() {
                    self.add_field_value(&field, value)?;
                }
                Ok(())
            }
            ValueTarget::Mapping => {
                if !value.is_truthy() {
                    return Ok(());
                }
                for (field, value) in expect_mapping(value)? {
                    self.values.remove(&field);
                    self.add_field_value(&field, value)?;
                }
                Ok(())
            }
        }
    }

    /// Run `value` through `processors` without storing it.
    ///
    /// With `re`, every element of the value first goes through regex
    /// extraction. Processing stops as soon as the value becomes `Null`.
    pub fn get_value(
        &self,
        value: impl Into<Value>,
        processors: &[ProcessorRef],
        re: Option<&str>,
    ) -> Result<Value> {
        let mut value = value.into();
        if let Some(pattern) = re {
            value = self.extract(value, pattern)?;
        }
        for processor in processors {
            if value.is_null() {
                break;
            }
            value = processor.process(value, &self.context)?;
        }
        Ok(value)
    }

    fn extract(&self, value: Value, pattern: &str) -> Result<Value> {
        let re = compile(pattern)?;
        let mut extracted = Vec::new();
        for element in value.into_batch() {
            let Some(text) = element.as_str() else {
                return Err(LoaderError::TypeMismatch {
                    processor: "extract_regex",
                    expected: "text",
                    found: element.kind(),
                });
            };
            extracted.extend(extract_regex(&re, text).into_iter().map(Value::from));
        }
        Ok(Value::List(extracted))
    }

    fn add_field_value(&mut self, field: &str, value: Value) -> Result<()> {
        let input = self.definition.resolve_input(&self.record, field);
        let processed = input.process(Value::List(value.into_batch()), &self.context)?;
        if processed.is_truthy() {
            let batch = processed.into_batch();
            tracing::trace!(field, added = batch.len(), "collected values");
            self.values.entry(field.to_string()).or_default().extend(batch);
        }
        Ok(())
    }

    /// Pending values of `field`.
    pub fn get_collected_values(&self, field: &str) -> &[Value] {
        self.values.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Names of the fields with pending values.
    pub fn collected_fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Run the pending values of `field` through its output processor.
    pub fn get_output_value(&self, field: &str) -> Result<Value> {
        let output = self.definition.resolve_output(&self.record, field);
        let pending = Value::List(self.get_collected_values(field).to_vec());
        output.process(pending, &self.context)
    }

    /// Write the output value of every collected field on the record.
    ///
    /// With `skip_empty`, falsy output values are left out. Pending values
    /// are kept, so materializing again yields the same record.
    pub fn materialize(&mut self, skip_empty: bool) -> Result<&R> {
        let mut outputs = Vec::with_capacity(self.values.len());
        for field in self.values.keys() {
            let output = self.get_output_value(field)?;
            if skip_empty && !output.is_truthy() {
                tracing::debug!(field = field.as_str(), "skipping empty output value");
                continue;
            }
            outputs.push((field.clone(), output));
        }
        tracing::debug!(fields = outputs.len(), "materializing record");
        for (field, output) in outputs {
            self.record.set_field(&field, output)?;
        }
        Ok(&self.record)
    }

    /// Materialize, skipping empty output values.
    pub fn load_item(&mut self) -> Result<&R> {
        self.materialize(true)
    }

    /// Hand over the record in its current state.
    pub fn into_item(self) -> R {
        self.record
    }
}

fn expect_mapping(value: Value) -> Result<BTreeMap<String, Value>> {
    match value {
        Value::Map(map) => Ok(map),
        other => Err(LoaderError::ExpectedMapping {
            found: other.kind(),
        }),
    }
}

impl<R: Record> ItemLoader<R, SelectorSource> {
    /// Add the values selected by `queries`.
    pub fn add_path<Q>(
        &mut self,
        target: impl Into<ValueTarget>,
        queries: Q,
        processors: &[ProcessorRef],
        re: Option<&str>,
    ) -> Result<()>
    where
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        let values = self.source.get_values(queries, re)?;
        self.add_value(target, values, processors)
    }

    /// Replace the pending values of `target` with the values selected by
    /// `queries`.
    pub fn replace_path<Q>(
        &mut self,
        target: impl Into<ValueTarget>,
        queries: Q,
        processors: &[ProcessorRef],
        re: Option<&str>,
    ) -> Result<()>
    where
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        let values = self.source.get_values(queries, re)?;
        self.replace_value(target, values, processors)
    }

    /// Process the values selected by `queries` without storing them.
    pub fn get_path<Q>(
        &self,
        queries: Q,
        processors: &[ProcessorRef],
        re: Option<&str>,
    ) -> Result<Value>
    where
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        let values = self.source.get_values(queries, re)?;
        self.get_value(values, processors, None)
    }
}

impl<R: Record> ItemLoader<R, RegexSource> {
    /// Add the values matched by `re`.
    pub fn add_regex(
        &mut self,
        target: impl Into<ValueTarget>,
        re: &str,
        processors: &[ProcessorRef],
    ) -> Result<()> {
        let values = self.source.get_values(re)?;
        self.add_value(target, values, processors)
    }

    /// Replace the pending values of `target` with the values matched by `re`.
    pub fn replace_regex(
        &mut self,
        target: impl Into<ValueTarget>,
        re: &str,
        processors: &[ProcessorRef],
    ) -> Result<()> {
        let values = self.source.get_values(re)?;
        self.replace_value(target, values, processors)
    }

    /// Process the values matched by `re` without storing them.
    pub fn get_regex(&self, re: &str, processors: &[ProcessorRef]) -> Result<Value> {
        let values = self.source.get_values(re)?;
        self.get_value(values, processors, None)
    }
}
