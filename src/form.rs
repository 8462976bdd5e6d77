//! Form codec: conversion between wire values and editable form values.
//!
//! Three directions, all driven by the field schema:
//! - `empty_form_for` builds a blank form with type-appropriate zero values,
//! - `format_field_value` turns a stored wire value into its editable form,
//! - `build_payload` turns edited values back into outbound wire values.
//!
//! Coercion never fails: malformed numeric input encodes as JSON null and the
//! collaborator's validation error comes back through the submit path.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::api::MultipartField;
use crate::schema::{FieldDescriptor, FieldKind};

/// The edited value of one field. Shape follows the field kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Flag(bool),
    /// Local file selected for upload. Never pre-populated from server data.
    FileRef(Option<PathBuf>),
    /// Foreign ids for multi-select fields.
    IdList(Vec<i64>),
}

impl FormValue {
    /// Editable text representation, used when rendering the form.
    pub fn display(&self) -> String {
        match self {
            FormValue::Text(s) => s.clone(),
            FormValue::Flag(b) => if *b { "true".into() } else { "false".into() },
            FormValue::FileRef(Some(path)) => path.display().to_string(),
            FormValue::FileRef(None) => String::new(),
            FormValue::IdList(ids) => ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Field name → current edited value. Always holds exactly the active
/// resource's field names; switching resource rebuilds it from scratch.
pub type FormState = HashMap<&'static str, FormValue>;

/// An outbound value for one field: plain JSON, or a file destined for a
/// multipart part.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Json(Value),
    File(PathBuf),
}

/// Ordered outbound payload, read-only fields already dropped.
pub type Payload = Vec<(&'static str, PayloadValue)>;

/// Blank form for a field list: `false` for checkboxes, no file for file
/// fields, an empty id list for multi-selects, empty text otherwise.
pub fn empty_form_for(fields: &'static [FieldDescriptor]) -> FormState {
    fields
        .iter()
        .map(|field| {
            let zero = match field.kind {
                FieldKind::Checkbox => FormValue::Flag(false),
                FieldKind::File => FormValue::FileRef(None),
                FieldKind::MultiSelect => FormValue::IdList(Vec::new()),
                FieldKind::Text
                | FieldKind::Number
                | FieldKind::Textarea
                | FieldKind::Select
                | FieldKind::Array
                | FieldKind::Relation => FormValue::Text(String::new()),
            };
            (field.name, zero)
        })
        .collect()
}

/// Wire value → editable value for one field.
///
/// Arrays join with `", "` for editing, checkboxes coerce to bool, file
/// fields always reset (uploads are one-way), relations stringify the
/// foreign id, multi-selects keep the id list. Wire null maps to the kind's
/// zero value.
pub fn format_field_value(field: &FieldDescriptor, value: &Value) -> FormValue {
    match field.kind {
        FieldKind::Array => match value {
            Value::Array(items) => FormValue::Text(
                items
                    .iter()
                    .map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => FormValue::Text(String::new()),
        },
        FieldKind::Checkbox => FormValue::Flag(value.as_bool().unwrap_or(false)),
        FieldKind::File => FormValue::FileRef(None),
        FieldKind::Relation => match value {
            Value::Null => FormValue::Text(String::new()),
            other => FormValue::Text(scalar_text(other)),
        },
        FieldKind::MultiSelect => match value {
            Value::Array(items) => {
                FormValue::IdList(items.iter().filter_map(Value::as_i64).collect())
            }
            _ => FormValue::IdList(Vec::new()),
        },
        FieldKind::Text | FieldKind::Number | FieldKind::Textarea | FieldKind::Select => {
            match value {
                Value::Null => FormValue::Text(String::new()),
                other => FormValue::Text(scalar_text(other)),
            }
        }
    }
}

/// Parse a comma-separated id list, dropping unparseable tokens and keeping
/// order: `"1, 2, x, 3"` → `[1, 2, 3]`.
pub fn parse_array_input(input: &str) -> Vec<i64> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<i64>().ok())
        .collect()
}

/// Form → outbound payload, skipping read-only fields.
pub fn build_payload(fields: &'static [FieldDescriptor], form: &FormState) -> Payload {
    fields
        .iter()
        .filter(|field| !field.read_only)
        .map(|field| {
            let value = form.get(field.name);
            (field.name, encode_field(field, value))
        })
        .collect()
}

fn encode_field(field: &FieldDescriptor, value: Option<&FormValue>) -> PayloadValue {
    match field.kind {
        FieldKind::Number | FieldKind::Relation => PayloadValue::Json(match value {
            Some(FormValue::Text(s)) => parse_number(s),
            _ => Value::Null,
        }),
        FieldKind::Checkbox => PayloadValue::Json(Value::Bool(match value {
            Some(FormValue::Flag(b)) => *b,
            Some(FormValue::Text(s)) => !s.is_empty(),
            _ => false,
        })),
        FieldKind::File => match value {
            Some(FormValue::FileRef(Some(path))) => PayloadValue::File(path.clone()),
            _ => PayloadValue::Json(Value::Null),
        },
        FieldKind::Array => PayloadValue::Json(match value {
            Some(FormValue::Text(s)) => id_array(&parse_array_input(s)),
            Some(FormValue::IdList(ids)) => id_array(ids),
            _ => id_array(&[]),
        }),
        FieldKind::MultiSelect => PayloadValue::Json(match value {
            Some(FormValue::IdList(ids)) => id_array(ids),
            Some(FormValue::Text(s)) => id_array(&parse_array_input(s)),
            _ => id_array(&[]),
        }),
        FieldKind::Text | FieldKind::Textarea | FieldKind::Select => {
            PayloadValue::Json(match value {
                Some(FormValue::Text(s)) => Value::String(s.clone()),
                Some(other) => Value::String(other.display()),
                None => Value::String(String::new()),
            })
        }
    }
}

/// True when any field carries a file, which forces the multipart path.
pub fn payload_has_file(payload: &Payload) -> bool {
    payload
        .iter()
        .any(|(_, value)| matches!(value, PayloadValue::File(_)))
}

/// Payload → JSON object body. Only valid on payloads without files.
pub fn to_json_object(payload: &Payload) -> Value {
    let map = payload
        .iter()
        .map(|(name, value)| {
            let json = match value {
                PayloadValue::Json(v) => v.clone(),
                // Files never reach the JSON path; encode defensively as null.
                PayloadValue::File(_) => Value::Null,
            };
            (name.to_string(), json)
        })
        .collect();
    Value::Object(map)
}

/// Payload → multipart parts. Null and empty-string values are omitted so a
/// partial update leaves untouched columns alone; list values expand into
/// one repeated part per item.
pub fn to_multipart(payload: &Payload) -> Vec<MultipartField> {
    let mut parts = Vec::new();
    for (name, value) in payload {
        match value {
            PayloadValue::File(path) => parts.push(MultipartField::File {
                name: name.to_string(),
                path: path.clone(),
            }),
            PayloadValue::Json(Value::Null) => {}
            PayloadValue::Json(Value::String(s)) if s.is_empty() => {}
            PayloadValue::Json(Value::Array(items)) => {
                for item in items {
                    parts.push(MultipartField::Text {
                        name: name.to_string(),
                        value: scalar_text(item),
                    });
                }
            }
            PayloadValue::Json(other) => parts.push(MultipartField::Text {
                name: name.to_string(),
                value: scalar_text(other),
            }),
        }
    }
    parts
}

fn id_array(ids: &[i64]) -> Value {
    Value::Array(ids.iter().map(|id| Value::from(*id)).collect())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn parse_number(input: &str) -> Value {
    let trimmed = input.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    match trimmed.parse::<f64>() {
        Ok(float) => serde_json::Number::from_f64(float)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{resource_by_key, FieldDescriptor, FieldKind};
    use serde_json::json;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::new("id", "ID", FieldKind::Number).read_only(),
        FieldDescriptor::new("title", "Title", FieldKind::Text),
        FieldDescriptor::new("count", "Count", FieldKind::Number),
        FieldDescriptor::new("owner", "Owner", FieldKind::Relation),
        FieldDescriptor::new("active", "Active", FieldKind::Checkbox),
        FieldDescriptor::new("image", "Image", FieldKind::File),
        FieldDescriptor::new("tags", "Tags", FieldKind::Array),
        FieldDescriptor::new("links", "Links", FieldKind::MultiSelect),
    ];

    #[test]
    fn test_empty_form_key_set_matches_fields() {
        let form = empty_form_for(FIELDS);
        assert_eq!(form.len(), FIELDS.len());
        for field in FIELDS {
            assert!(form.contains_key(field.name), "{}", field.name);
        }
    }

    #[test]
    fn test_empty_form_zero_values() {
        let form = empty_form_for(FIELDS);
        assert_eq!(form["active"], FormValue::Flag(false));
        assert_eq!(form["image"], FormValue::FileRef(None));
        assert_eq!(form["links"], FormValue::IdList(Vec::new()));
        assert_eq!(form["title"], FormValue::Text(String::new()));
        assert_eq!(form["count"], FormValue::Text(String::new()));
        assert_eq!(form["tags"], FormValue::Text(String::new()));
    }

    #[test]
    fn test_payload_from_empty_form_skips_read_only() {
        let form = empty_form_for(FIELDS);
        let payload = build_payload(FIELDS, &form);
        assert!(payload.iter().all(|(name, _)| *name != "id"));
        assert_eq!(payload.len(), FIELDS.len() - 1);
    }

    #[test]
    fn test_parse_array_input_drops_bad_tokens_keeps_order() {
        assert_eq!(parse_array_input("1, 2, x, 3"), vec![1, 2, 3]);
        assert_eq!(parse_array_input(""), Vec::<i64>::new());
        assert_eq!(parse_array_input("7,,3"), vec![7, 3]);
    }

    #[test]
    fn test_relation_round_trip() {
        let owner = &FIELDS[3];
        let formatted = format_field_value(owner, &json!(7));
        assert_eq!(formatted, FormValue::Text("7".into()));

        let mut form = empty_form_for(FIELDS);
        form.insert("owner", formatted);
        let payload = build_payload(FIELDS, &form);
        let (_, value) = payload.iter().find(|(n, _)| *n == "owner").unwrap();
        assert_eq!(*value, PayloadValue::Json(json!(7)));
    }

    #[test]
    fn test_malformed_number_becomes_null() {
        let mut form = empty_form_for(FIELDS);
        form.insert("count", FormValue::Text("not-a-number".into()));
        let payload = build_payload(FIELDS, &form);
        let (_, value) = payload.iter().find(|(n, _)| *n == "count").unwrap();
        assert_eq!(*value, PayloadValue::Json(Value::Null));
    }

    #[test]
    fn test_format_array_joins_for_display() {
        let tags = &FIELDS[6];
        assert_eq!(
            format_field_value(tags, &json!([1, 2, 3])),
            FormValue::Text("1, 2, 3".into())
        );
        assert_eq!(format_field_value(tags, &Value::Null), FormValue::Text(String::new()));
    }

    #[test]
    fn test_format_multi_select_keeps_id_list() {
        let links = &FIELDS[7];
        assert_eq!(
            format_field_value(links, &json!([4, "x", 9])),
            FormValue::IdList(vec![4, 9])
        );
    }

    #[test]
    fn test_format_file_always_resets() {
        let image = &FIELDS[5];
        assert_eq!(
            format_field_value(image, &json!("uploads/shot.png")),
            FormValue::FileRef(None)
        );
    }

    #[test]
    fn test_file_passes_through_only_when_held() {
        let mut form = empty_form_for(FIELDS);
        form.insert("image", FormValue::FileRef(Some(PathBuf::from("/tmp/a.png"))));
        let payload = build_payload(FIELDS, &form);
        assert!(payload_has_file(&payload));
        let (_, value) = payload.iter().find(|(n, _)| *n == "image").unwrap();
        assert_eq!(*value, PayloadValue::File(PathBuf::from("/tmp/a.png")));

        form.insert("image", FormValue::FileRef(None));
        let payload = build_payload(FIELDS, &form);
        assert!(!payload_has_file(&payload));
    }

    #[test]
    fn test_multi_select_text_input_parses_ids() {
        let mut form = empty_form_for(FIELDS);
        form.insert("links", FormValue::Text("2, 5, zz".into()));
        let payload = build_payload(FIELDS, &form);
        let (_, value) = payload.iter().find(|(n, _)| *n == "links").unwrap();
        assert_eq!(*value, PayloadValue::Json(json!([2, 5])));
    }

    #[test]
    fn test_json_object_includes_nulls() {
        let mut form = empty_form_for(FIELDS);
        form.insert("title", FormValue::Text("Folio".into()));
        let body = to_json_object(&build_payload(FIELDS, &form));
        assert_eq!(body["title"], json!("Folio"));
        assert_eq!(body["count"], Value::Null);
        assert_eq!(body["image"], Value::Null);
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_multipart_expands_lists_and_omits_empties() {
        let mut form = empty_form_for(FIELDS);
        form.insert("title", FormValue::Text("Folio".into()));
        form.insert("tags", FormValue::Text("1,2".into()));
        form.insert("image", FormValue::FileRef(Some(PathBuf::from("/tmp/a.png"))));
        let parts = to_multipart(&build_payload(FIELDS, &form));

        let tag_parts: Vec<_> = parts
            .iter()
            .filter(|p| matches!(p, MultipartField::Text { name, .. } if name == "tags"))
            .collect();
        assert_eq!(tag_parts.len(), 2);
        assert!(parts
            .iter()
            .any(|p| matches!(p, MultipartField::File { name, .. } if name == "image")));
        // Empty text and null numbers stay out of a partial update.
        assert!(!parts
            .iter()
            .any(|p| matches!(p, MultipartField::Text { name, .. } if name == "owner" || name == "count")));
        // Unchecked flags still post explicitly as false.
        assert!(parts.iter().any(
            |p| matches!(p, MultipartField::Text { name, value } if name == "active" && value == "false")
        ));
    }

    #[test]
    fn test_real_config_round_trip() {
        let projects = resource_by_key("projects").unwrap();
        let form = empty_form_for(projects.fields);
        let payload = build_payload(projects.fields, &form);
        assert!(payload.iter().all(|(name, _)| *name != "id" && *name != "created_at"));
    }
}
