//! Builders for store responses.

#![allow(dead_code)]

use serde_json::{json, Map, Value};

/// Builder for one document entry as the store returns it.
pub struct DocumentJsonBuilder {
    fields: Map<String, Value>,
}

impl DocumentJsonBuilder {
    pub fn new(id: impl Into<Value>, title: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), id.into());
        fields.insert("title".to_string(), Value::String(title.to_string()));
        Self { fields }
    }

    pub fn doc_type(mut self, value: &str) -> Self {
        self.fields.insert("type".to_string(), json!(value));
        self
    }

    pub fn category(mut self, value: &str) -> Self {
        self.fields.insert("category".to_string(), json!(value));
        self
    }

    pub fn status(mut self, value: &str) -> Self {
        self.fields.insert("status".to_string(), json!(value));
        self
    }

    pub fn chunk_count(mut self, value: u64) -> Self {
        self.fields.insert("chunk_count".to_string(), json!(value));
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// A list response with one minimal entry per title, ids `"1"`, `"2"`, ...
pub fn document_list(titles: &[&str]) -> Value {
    Value::Array(
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| DocumentJsonBuilder::new((i + 1).to_string(), t).build())
            .collect(),
    )
}
