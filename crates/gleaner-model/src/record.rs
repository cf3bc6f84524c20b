#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{LoaderError, Result};
use crate::processor::ProcessorRef;
use crate::value::Value;

/// Per-field processor overrides declared by a record type.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    pub input_processor: Option<ProcessorRef>,
    pub output_processor: Option<ProcessorRef>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, processor: ProcessorRef) -> Self {
        self.input_processor = Some(processor);
        self
    }

    pub fn with_output(mut self, processor: ProcessorRef) -> Self {
        self.output_processor = Some(processor);
        self
    }
}

/// A record under construction.
///
/// Records are settable by field name and may expose a [`FieldSchema`] per
/// field. `snapshot` renders the current contents, which the loader places
/// in its context under `item`.
pub trait Record {
    fn set_field(&mut self, field: &str, value: Value) -> Result<()>;

    fn get_field(&self, field: &str) -> Option<&Value>;

    fn field_schema(&self, _field: &str) -> Option<&FieldSchema> {
        None
    }

    fn snapshot(&self) -> Value;
}

/// Declared fields of an [`Item`] type.
#[derive(Debug, Clone, Default)]
pub struct ItemSchema {
    fields: BTreeMap<String, FieldSchema>,
}

impl ItemSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field with its processor overrides.
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Declare a field without overrides.
    pub fn plain_field(self, name: impl Into<String>) -> Self {
        self.field(name, FieldSchema::default())
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Default record type.
///
/// Without a schema any field may be set. With a schema only declared fields
/// are accepted and their processor overrides are exposed to loaders.
#[derive(Debug, Clone, Default)]
pub struct Item {
    schema: Option<Arc<ItemSchema>>,
    values: BTreeMap<String, Value>,
}

impl Item {
    /// A free-form item.
    pub fn new() -> Self {
        Self::default()
    }

    /// An item restricted to the fields of `schema`.
    pub fn with_schema(schema: Arc<ItemSchema>) -> Self {
        Self {
            schema: Some(schema),
            values: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> Option<&ItemSchema> {
        self.schema.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> BTreeMap<String, Value> {
        self.values
    }
}

impl Record for Item {
    fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
        if let Some(schema) = &self.schema
            && !schema.contains(field)
        {
            return Err(LoaderError::UnknownField(field.to_string()));
        }
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    fn get_field(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    fn field_schema(&self, field: &str) -> Option<&FieldSchema> {
        self.schema.as_ref()?.get(field)
    }

    fn snapshot(&self) -> Value {
        Value::Map(self.values.clone())
    }
}

impl Record for BTreeMap<String, Value> {
    fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
        self.insert(field.to_string(), value);
        Ok(())
    }

    fn get_field(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }

    fn snapshot(&self) -> Value {
        Value::Map(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::from_fn;

    #[test]
    fn free_form_item_accepts_any_field() {
        let mut item = Item::new();
        item.set_field("title", Value::from("x")).unwrap();
        assert_eq!(item.get("title"), Some(&Value::from("x")));
        assert!(item.field_schema("title").is_none());
    }

    #[test]
    fn schema_item_rejects_undeclared_field() {
        let schema = ItemSchema::new().plain_field("title");
        let mut item = Item::with_schema(Arc::new(schema));
        item.set_field("title", Value::from("x")).unwrap();
        let err = item.set_field("price", Value::from("1")).unwrap_err();
        assert!(matches!(err, LoaderError::UnknownField(name) if name == "price"));
    }

    #[test]
    fn schema_exposes_field_overrides() {
        let schema = ItemSchema::new().field(
            "title",
            FieldSchema::new().with_output(from_fn("noop", Ok)),
        );
        let item = Item::with_schema(Arc::new(schema));
        let field = item.field_schema("title").unwrap();
        assert!(field.input_processor.is_none());
        assert!(field.output_processor.is_some());
    }
}
