// ABOUTME: Content validator for the deck-slides application
// ABOUTME: Checks slide content mappings against the schema registry before rendering

use serde_json::{Map, Value};

use crate::errors::{DeckError, Result};
use crate::schema::{schema_for, FieldKind, ItemKind};
use crate::types::SlideType;

/// Validate a content mapping against the schema for `slide_type`.
///
/// On success returns a new mapping normalized to the schema's field order.
/// Fields not named by the schema are dropped silently; over-generating
/// collaborators are tolerated as long as the required shape is present.
/// Length limits are counted in characters, not bytes.
///
/// Validation is pure: no I/O, no mutation of the input.
pub fn validate(slide_type: SlideType, content: &Value) -> Result<Map<String, Value>> {
    let object = content.as_object().ok_or(DeckError::TypeMismatch {
        slide_type,
        field: "content".to_string(),
        expected: "a JSON object",
    })?;

    let schema = schema_for(slide_type);
    let mut normalized = Map::new();

    for field in schema.fields {
        let value = object.get(field.name).ok_or_else(|| DeckError::MissingField {
            slide_type,
            field: field.name.to_string(),
        })?;

        match field.kind {
            FieldKind::Text { max_len } => {
                let text = require_text(slide_type, field.name, value, max_len)?;
                normalized.insert(field.name.to_string(), Value::String(text.to_string()));
            }
            FieldKind::List { item, min_items, max_items } => {
                let entries = value.as_array().ok_or(DeckError::TypeMismatch {
                    slide_type,
                    field: field.name.to_string(),
                    expected: "a list",
                })?;

                if entries.len() < min_items || entries.len() > max_items {
                    return Err(DeckError::CardinalityError {
                        slide_type,
                        field: field.name.to_string(),
                        min: min_items,
                        max: max_items,
                        actual: entries.len(),
                    });
                }

                let mut validated_entries = Vec::with_capacity(entries.len());
                for (index, entry) in entries.iter().enumerate() {
                    validated_entries.push(Value::Object(validate_item(
                        slide_type, field.name, index, item, entry,
                    )?));
                }
                normalized.insert(field.name.to_string(), Value::Array(validated_entries));
            }
        }
    }

    Ok(normalized)
}

/// Tag-string entry point: parses the tag, then validates.
pub fn validate_tagged(tag: &str, content: &Value) -> Result<Map<String, Value>> {
    let slide_type = SlideType::parse_tag(tag)?;
    validate(slide_type, content)
}

fn validate_item(
    slide_type: SlideType,
    field: &str,
    index: usize,
    kind: ItemKind,
    entry: &Value,
) -> Result<Map<String, Value>> {
    let path = format!("{}[{}]", field, index);
    let object = entry.as_object().ok_or_else(|| DeckError::TypeMismatch {
        slide_type,
        field: path.clone(),
        expected: "an object",
    })?;

    let mut normalized = Map::new();
    for item_field in kind.fields() {
        let item_path = format!("{}.{}", path, item_field.name);
        let value = object.get(item_field.name).ok_or_else(|| DeckError::MissingField {
            slide_type,
            field: item_path.clone(),
        })?;
        let text = require_text(slide_type, &item_path, value, item_field.max_len)?;
        normalized.insert(item_field.name.to_string(), Value::String(text.to_string()));
    }
    Ok(normalized)
}

fn require_text<'a>(
    slide_type: SlideType,
    field: &str,
    value: &'a Value,
    max_len: usize,
) -> Result<&'a str> {
    let text = value.as_str().ok_or_else(|| DeckError::TypeMismatch {
        slide_type,
        field: field.to_string(),
        expected: "a string",
    })?;
    let length = text.chars().count();
    if length > max_len {
        return Err(DeckError::FieldTooLong {
            slide_type,
            field: field.to_string(),
            limit: max_len,
            actual: length,
        });
    }
    Ok(text)
}
