//! Named form schemas

use serde::Deserialize;
use serde_json::Value;

use super::error::FormResult;
use super::field::{Field, Functor};

/// A named descriptor list, as stored in schema files
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// When to offer the whole-model editor
    #[serde(default)]
    pub show_custom: Option<Functor>,
}

impl FormSchema {
    /// Read a schema document: either a full schema object or a bare
    /// field list, which takes `fallback_name`.
    pub fn from_document(document: Value, fallback_name: &str) -> FormResult<Self> {
        match document {
            Value::Array(_) => Ok(Self {
                name: fallback_name.to_string(),
                fields: serde_json::from_value(document)?,
                show_custom: None,
            }),
            other => Ok(serde_json::from_value(other)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldKind, FormError};
    use serde_json::json;

    #[test]
    fn test_bare_field_list() {
        let schema = FormSchema::from_document(
            json!([{"name": "count", "type": "number"}]),
            "counts",
        )
        .unwrap();
        assert_eq!(schema.name, "counts");
        assert_eq!(schema.fields[0].kind, FieldKind::Number);
        assert!(schema.show_custom.is_none());
    }

    #[test]
    fn test_full_schema() {
        let schema = FormSchema::from_document(
            json!({
                "name": "ingest",
                "showCustom": {"path": "type", "equals": "custom"},
                "fields": [{"name": "type", "type": "string"}]
            }),
            "ignored",
        )
        .unwrap();
        assert_eq!(schema.name, "ingest");
        assert!(matches!(schema.show_custom, Some(Functor::Predicate(_))));
    }

    #[test]
    fn test_errors_surface() {
        let err = FormSchema::from_document(json!([{"name": "x", "type": "blob"}]), "f")
            .unwrap_err();
        assert!(matches!(err, FormError::Parse(ref msg) if msg.contains("unknown field type 'blob'")));

        let err = FormSchema::from_document(
            json!([{"name": "x", "type": "string", "disabled": "sometimes"}]),
            "f",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid functor"));
    }
}
