//! Field descriptors
//!
//! A [`Field`] describes how one path of the model is edited. Descriptors are
//! either built in code or loaded from JSON/YAML/TOML schema files, in which
//! case `disabled`/`defined`/`required` predicates are written as declarative
//! [`Condition`]s.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::error::{FormError, FormResult};
use super::path::{deep_get, PropertyPath};

// ============================================================================
// Field Kind
// ============================================================================

/// The closed set of editor kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKind {
    Number,
    SizeBytes,
    String,
    Duration,
    Boolean,
    StringArray,
    Json,
    File,
    Date,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::SizeBytes => "size-bytes",
            FieldKind::String => "string",
            FieldKind::Duration => "duration",
            FieldKind::Boolean => "boolean",
            FieldKind::StringArray => "string-array",
            FieldKind::Json => "json",
            FieldKind::File => "file",
            FieldKind::Date => "date",
        }
    }

    /// Kinds edited through a numeric input
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::SizeBytes)
    }
}

impl FromStr for FieldKind {
    type Err = FormError;

    fn from_str(s: &str) -> FormResult<Self> {
        Ok(match s {
            "number" => FieldKind::Number,
            "size-bytes" => FieldKind::SizeBytes,
            "string" => FieldKind::String,
            "duration" => FieldKind::Duration,
            "boolean" => FieldKind::Boolean,
            "string-array" => FieldKind::StringArray,
            "json" => FieldKind::Json,
            "file" => FieldKind::File,
            "date" => FieldKind::Date,
            other => return Err(FormError::UnknownFieldKind(other.to_string())),
        })
    }
}

impl TryFrom<String> for FieldKind {
    type Error = FormError;

    fn try_from(value: String) -> FormResult<Self> {
        value.parse()
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Suggestions
// ============================================================================

/// Autocomplete entry offered by string inputs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suggestion {
    Value(String),
    Group {
        group: String,
        suggestions: Vec<String>,
    },
}

// ============================================================================
// Functors
// ============================================================================

/// Predicate over the current model
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A field attribute that is either a constant or a predicate over the model
#[derive(Clone)]
pub enum Functor {
    Literal(bool),
    Predicate(Predicate),
}

impl Functor {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Functor::Predicate(Arc::new(f))
    }

    /// Build a functor from a raw schema value.
    ///
    /// Booleans become literals and objects are read as a [`Condition`];
    /// every other shape is rejected.
    pub fn from_value(value: Value) -> FormResult<Self> {
        match value {
            Value::Bool(b) => Ok(Functor::Literal(b)),
            Value::Object(_) => {
                let shown = value.to_string();
                let condition: Condition = serde_json::from_value(value)
                    .map_err(|_| FormError::InvalidFunctorType(shown))?;
                Ok(Functor::from(condition))
            }
            other => Err(FormError::InvalidFunctorType(other.to_string())),
        }
    }
}

impl From<bool> for Functor {
    fn from(b: bool) -> Self {
        Functor::Literal(b)
    }
}

impl From<Condition> for Functor {
    fn from(condition: Condition) -> Self {
        Functor::Predicate(Arc::new(move |model: &Value| condition.matches(model)))
    }
}

impl fmt::Debug for Functor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Functor::Literal(b) => write!(f, "Literal({})", b),
            Functor::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for Functor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Functor::from_value(raw).map_err(serde::de::Error::custom)
    }
}

/// Declarative predicate used by schema files.
///
/// Variant order matters for untagged matching: combinators first, `equals`
/// last since a missing `equals` would otherwise read as `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    All {
        all: Vec<Condition>,
    },
    Any {
        any: Vec<Condition>,
    },
    Not {
        not: Box<Condition>,
    },
    OneOf {
        path: String,
        #[serde(rename = "oneOf")]
        one_of: Vec<Value>,
    },
    IsSet {
        path: String,
        #[serde(rename = "isSet")]
        is_set: bool,
    },
    Equals {
        path: String,
        equals: Value,
    },
}

impl Condition {
    pub fn matches(&self, model: &Value) -> bool {
        let lookup = |path: &str| deep_get(model, &PropertyPath::parse(path));
        match self {
            Condition::All { all } => all.iter().all(|c| c.matches(model)),
            Condition::Any { any } => any.iter().any(|c| c.matches(model)),
            Condition::Not { not } => !not.matches(model),
            Condition::OneOf { path, one_of } => {
                lookup(path).is_some_and(|v| one_of.contains(v))
            }
            Condition::IsSet { path, is_set } => {
                lookup(path).is_some_and(|v| !v.is_null()) == *is_set
            }
            Condition::Equals { path, equals } => {
                lookup(path).unwrap_or(&Value::Null) == equals
            }
        }
    }
}

// ============================================================================
// Field
// ============================================================================

/// Describes one editable property of the model
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub disabled: Option<Functor>,
    #[serde(default)]
    pub defined: Option<Functor>,
    #[serde(default)]
    pub required: Option<Functor>,
    #[serde(skip)]
    path: Option<PropertyPath>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            info: None,
            kind,
            default_value: None,
            suggestions: Vec::new(),
            placeholder: None,
            min: None,
            disabled: None,
            defined: None,
            required: None,
            path: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn disabled(mut self, functor: impl Into<Functor>) -> Self {
        self.disabled = Some(functor.into());
        self
    }

    pub fn defined(mut self, functor: impl Into<Functor>) -> Self {
        self.defined = Some(functor.into());
        self
    }

    pub fn required(mut self, functor: impl Into<Functor>) -> Self {
        self.required = Some(functor.into());
        self
    }

    /// Parsed form of `name`
    pub fn path(&self) -> PropertyPath {
        self.path
            .clone()
            .unwrap_or_else(|| PropertyPath::parse(&self.name))
    }

    /// Display label, derived from the name when none is set
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| super::label::make_label_name(&self.name))
    }

    /// Cache the parsed path; called once the descriptor list is handed to a form
    pub(crate) fn prepare(mut self) -> Self {
        self.path = Some(PropertyPath::parse(&self.name));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip_names() {
        for name in [
            "number",
            "size-bytes",
            "string",
            "duration",
            "boolean",
            "string-array",
            "json",
            "file",
            "date",
        ] {
            let kind: FieldKind = name.parse().unwrap();
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "color".parse::<FieldKind>().unwrap_err();
        assert!(matches!(err, FormError::UnknownFieldKind(ref k) if k == "color"));

        let err = serde_json::from_value::<Field>(json!({"name": "x", "type": "color"}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown field type 'color'"));
    }

    #[test]
    fn test_deserialize_field() {
        let field: Field = serde_json::from_value(json!({
            "name": "tuningConfig.maxRowsInMemory",
            "type": "number",
            "defaultValue": 75000,
            "min": 1,
            "defined": {"path": "type", "equals": "index"},
            "required": true,
            "suggestions": ["a", {"group": "g", "suggestions": ["b", "c"]}]
        }))
        .unwrap();

        assert_eq!(field.kind, FieldKind::Number);
        assert_eq!(field.default_value, Some(json!(75000)));
        assert_eq!(field.min, Some(1.0));
        assert!(matches!(field.required, Some(Functor::Literal(true))));
        assert!(matches!(field.defined, Some(Functor::Predicate(_))));
        assert_eq!(field.suggestions.len(), 2);
        assert_eq!(
            field.suggestions[1],
            Suggestion::Group {
                group: "g".into(),
                suggestions: vec!["b".into(), "c".into()]
            }
        );
    }

    #[test]
    fn test_invalid_functor_shapes() {
        for raw in [json!("yes"), json!(1), json!([true]), json!(null), json!({"foo": 1})] {
            let err = Functor::from_value(raw).unwrap_err();
            assert!(matches!(err, FormError::InvalidFunctorType(_)));
        }
    }

    #[test]
    fn test_conditions() {
        let model = json!({"type": "kafka", "spec": {"rollup": true}});

        let equals = Condition::Equals { path: "type".into(), equals: json!("kafka") };
        assert!(equals.matches(&model));

        let one_of: Condition =
            serde_json::from_value(json!({"path": "type", "oneOf": ["index", "kafka"]})).unwrap();
        assert!(one_of.matches(&model));

        let is_set: Condition =
            serde_json::from_value(json!({"path": "spec.rollup", "isSet": true})).unwrap();
        assert!(is_set.matches(&model));

        let missing: Condition =
            serde_json::from_value(json!({"path": "spec.granularity", "isSet": false})).unwrap();
        assert!(missing.matches(&model));

        let combined: Condition = serde_json::from_value(json!({
            "all": [
                {"path": "type", "equals": "kafka"},
                {"not": {"path": "spec.rollup", "equals": false}}
            ]
        }))
        .unwrap();
        assert!(combined.matches(&model));
        assert!(!combined.matches(&json!({"type": "index"})));
    }

    #[test]
    fn test_builder_and_path() {
        let field = Field::new("spec.{a.b}", FieldKind::String).label("Thing").min(2.0);
        assert_eq!(field.display_label(), "Thing");
        assert_eq!(field.path().to_string(), "spec.{a.b}");
    }
}
