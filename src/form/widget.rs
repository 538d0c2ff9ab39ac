//! Headless widgets
//!
//! What each field kind needs from a toolkit: the value to show (with the
//! default applied), constraints and presentation hints. The toolkit layer
//! draws these and reports edits back as [`FieldEvent`]s.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::Value;

/// Visual emphasis for a field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Required but not yet filled in
    Primary,
}

/// Input transformation applied before committing text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sanitizer {
    /// Uppercase, keep digits and `PYMDTHS.,`
    Duration,
}

impl Sanitizer {
    pub fn apply(&self, input: &str) -> String {
        match self {
            Sanitizer::Duration => input
                .to_uppercase()
                .chars()
                .filter(|c| c.is_ascii_digit() || "PYMDTHS.,".contains(*c))
                .collect(),
        }
    }
}

/// Flattened suggestion list entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SuggestionItem {
    pub group: Option<String>,
    pub value: String,
}

/// Per-kind rendering instructions
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldWidget {
    Number {
        value: Option<Value>,
        min: f64,
        placeholder: Option<String>,
    },
    SizeBytes {
        value: Option<Value>,
        min: f64,
        step_size: u64,
        major_step_size: u64,
    },
    String {
        value: String,
        placeholder: Option<String>,
        suggestions: Vec<SuggestionItem>,
        sanitizer: Option<Sanitizer>,
    },
    Boolean {
        value: bool,
    },
    StringArray {
        values: Vec<String>,
        placeholder: Option<String>,
    },
    Json {
        value: Option<Value>,
        placeholder: Option<String>,
    },
    File {
        button_text: &'static str,
        accept: &'static str,
        text: Option<String>,
    },
    Date {
        value: Option<DateTime<FixedOffset>>,
        text: Option<String>,
        placeholder: &'static str,
    },
}

/// One visible field, ready to draw
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedField {
    pub name: String,
    pub label: String,
    pub info: Option<String>,
    pub disabled: bool,
    pub intent: Option<Intent>,
    pub widget: FieldWidget,
}

/// Free-form editor bound to the entire model
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomEditor {
    pub label: &'static str,
    pub value: Value,
}

/// Output of a full form render
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Rendered {
    pub fields: Vec<RenderedField>,
    pub custom: Option<CustomEditor>,
}

impl Rendered {
    pub fn field(&self, name: &str) -> Option<&RenderedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// User edits reported by the toolkit layer
#[derive(Clone, Debug, PartialEq)]
pub enum FieldEvent {
    /// Raw text typed into a number, size, string, duration or array input
    Input(String),
    /// Focus left a text input
    Blur,
    /// One of the False/True buttons was clicked
    Toggle(bool),
    /// A string array was replaced
    Values(Vec<String>),
    /// Raw text of a JSON editor
    Json(String),
    /// Text content of a selected file
    FileContents(String),
    /// A date was picked, or the picker cleared
    DatePicked(Option<DateTime<FixedOffset>>),
}

impl FieldEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FieldEvent::Input(_) => "input",
            FieldEvent::Blur => "blur",
            FieldEvent::Toggle(_) => "toggle",
            FieldEvent::Values(_) => "values",
            FieldEvent::Json(_) => "json",
            FieldEvent::FileContents(_) => "file",
            FieldEvent::DatePicked(_) => "date",
        }
    }
}

/// Split string-array text on commas and whitespace, dropping blanks
pub fn split_array_input(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
