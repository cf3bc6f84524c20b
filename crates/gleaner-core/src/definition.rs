//! Loader definitions: default processors and per-field overrides.
//!
//! A field's input and output processors are resolved independently, first
//! match wins:
//!
//! 1. the override registered on the [`LoaderDefinition`] for that field,
//! 2. the [`FieldSchema`](gleaner_model::FieldSchema) declared by the record,
//! 3. the definition's default processor ([`Identity`] unless configured).

use std::collections::BTreeMap;

use gleaner_model::{ProcessorExt, ProcessorRef, Record};

use crate::processors::Identity;

/// Processor overrides for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldProcessors {
    pub input: Option<ProcessorRef>,
    pub output: Option<ProcessorRef>,
}

impl FieldProcessors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, processor: ProcessorRef) -> Self {
        self.input = Some(processor);
        self
    }

    pub fn with_output(mut self, processor: ProcessorRef) -> Self {
        self.output = Some(processor);
        self
    }
}

/// Where a resolved processor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorOrigin {
    Override,
    Schema,
    Default,
}

/// Default processors and field overrides of a loader.
#[derive(Debug, Clone)]
pub struct LoaderDefinition {
    default_input: ProcessorRef,
    default_output: ProcessorRef,
    fields: BTreeMap<String, FieldProcessors>,
}

impl Default for LoaderDefinition {
    fn default() -> Self {
        Self {
            default_input: Identity.shared(),
            default_output: Identity.shared(),
            fields: BTreeMap::new(),
        }
    }
}

impl LoaderDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_input(mut self, processor: ProcessorRef) -> Self {
        self.default_input = processor;
        self
    }

    pub fn with_default_output(mut self, processor: ProcessorRef) -> Self {
        self.default_output = processor;
        self
    }

    pub fn with_field_input(mut self, field: impl Into<String>, processor: ProcessorRef) -> Self {
        self.set_field_input(field, processor);
        self
    }

    pub fn with_field_output(mut self, field: impl Into<String>, processor: ProcessorRef) -> Self {
        self.set_field_output(field, processor);
        self
    }

    pub fn set_field_input(&mut self, field: impl Into<String>, processor: ProcessorRef) {
        self.fields.entry(field.into()).or_default().input = Some(processor);
    }

    pub fn set_field_output(&mut self, field: impl Into<String>, processor: ProcessorRef) {
        self.fields.entry(field.into()).or_default().output = Some(processor);
    }

    /// Drop the input override of a field, returning it.
    pub fn clear_field_input(&mut self, field: &str) -> Option<ProcessorRef> {
        self.fields.get_mut(field)?.input.take()
    }

    /// Drop the output override of a field, returning it.
    pub fn clear_field_output(&mut self, field: &str) -> Option<ProcessorRef> {
        self.fields.get_mut(field)?.output.take()
    }

    pub fn field(&self, field: &str) -> Option<&FieldProcessors> {
        self.fields.get(field)
    }

    /// Names of the fields carrying overrides.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Input processor for `field`.
    pub fn resolve_input<R: Record + ?Sized>(&self, record: &R, field: &str) -> ProcessorRef {
        let (processor, origin) = self.resolve_input_with_origin(record, field);
        if origin == ProcessorOrigin::Default {
            tracing::debug!(field, "no input processor declared, using default");
        }
        processor
    }

    /// Output processor for `field`.
    pub fn resolve_output<R: Record + ?Sized>(&self, record: &R, field: &str) -> ProcessorRef {
        let (processor, origin) = self.resolve_output_with_origin(record, field);
        if origin == ProcessorOrigin::Default {
            tracing::debug!(field, "no output processor declared, using default");
        }
        processor
    }

    pub fn resolve_input_with_origin<R: Record + ?Sized>(
        &self,
        record: &R,
        field: &str,
    ) -> (ProcessorRef, ProcessorOrigin) {
        if let Some(processor) = self.fields.get(field).and_then(|f| f.input.clone()) {
            return (processor, ProcessorOrigin::Override);
        }
        if let Some(processor) = record
            .field_schema(field)
            .and_then(|s| s.input_processor.clone())
        {
            return (processor, ProcessorOrigin::Schema);
        }
        (self.default_input.clone(), ProcessorOrigin::Default)
    }

    pub fn resolve_output_with_origin<R: Record + ?Sized>(
        &self,
        record: &R,
        field: &str,
    ) -> (ProcessorRef, ProcessorOrigin) {
        if let Some(processor) = self.fields.get(field).and_then(|f| f.output.clone()) {
            return (processor, ProcessorOrigin::Override);
        }
        if let Some(processor) = record
            .field_schema(field)
            .and_then(|s| s.output_processor.clone())
        {
            return (processor, ProcessorOrigin::Schema);
        }
        (self.default_output.clone(), ProcessorOrigin::Default)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gleaner_model::{FieldSchema, Item, ItemSchema};

    use super::*;
    use crate::processors::{Join, TakeFirst};

    fn item() -> Item {
        let schema = ItemSchema::new()
            .field("title", FieldSchema::new().with_output(Join::default().shared()))
            .plain_field("price");
        Item::with_schema(Arc::new(schema))
    }

    #[test]
    fn resolution_falls_back_level_by_level() {
        let item = item();
        let mut definition = LoaderDefinition::new()
            .with_default_output(TakeFirst.shared())
            .with_field_output("title", Identity.shared());

        assert_eq!(
            definition.resolve_output_with_origin(&item, "title").1,
            ProcessorOrigin::Override
        );
        definition.clear_field_output("title");
        assert_eq!(
            definition.resolve_output_with_origin(&item, "title").1,
            ProcessorOrigin::Schema
        );
        assert_eq!(
            definition.resolve_output_with_origin(&item, "price").1,
            ProcessorOrigin::Default
        );
    }

    #[test]
    fn input_and_output_resolve_independently() {
        let item = item();
        let definition = LoaderDefinition::new().with_field_input("title", TakeFirst.shared());
        assert_eq!(
            definition.resolve_input_with_origin(&item, "title").1,
            ProcessorOrigin::Override
        );
        assert_eq!(
            definition.resolve_output_with_origin(&item, "title").1,
            ProcessorOrigin::Schema
        );
    }
}
