//! Schema-driven form session
//!
//! [`AutoForm`] maps a descriptor list onto headless widgets and turns user
//! edits into new models. The host owns the model: every accepted edit is
//! reported through `on_change` with the fully pruned model, and the host
//! hands the model back with [`AutoForm::set_model`] on its next render.

use chrono::{FixedOffset, Offset, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::date::{format_date, parse_date, to_utc_iso, DATE_PLACEHOLDER};
use super::error::{FormError, FormResult};
use super::field::{Field, FieldKind, Functor, Suggestion};
use super::functor::evaluate_functor;
use super::path::{deep_delete, deep_get, deep_set};
use super::widget::{
    split_array_input, CustomEditor, FieldEvent, FieldWidget, Intent, Rendered, RenderedField,
    Sanitizer, SuggestionItem,
};

type ChangeCallback = Box<dyn FnMut(Value)>;
type ValidityCallback = Box<dyn FnMut(bool)>;

const SIZE_STEP: u64 = 1_000;
const SIZE_MAJOR_STEP: u64 = 1_000_000;

/// Parse text the way the file input expects: structured JSON
pub fn parse_string_to_json(text: &str) -> FormResult<Value> {
    Ok(serde_json::from_str(text)?)
}

pub struct AutoForm {
    fields: Vec<Field>,
    model: Option<Value>,
    show_custom: Option<Functor>,
    local_offset: FixedOffset,
    json_inputs_validity: HashMap<String, bool>,
    on_change: ChangeCallback,
    update_json_validity: Option<ValidityCallback>,
}

impl AutoForm {
    pub fn new<F>(fields: Vec<Field>, model: Option<Value>, on_change: F) -> Self
    where
        F: FnMut(Value) + 'static,
    {
        Self {
            fields: fields.into_iter().map(Field::prepare).collect(),
            model,
            show_custom: None,
            local_offset: Utc.fix(),
            json_inputs_validity: HashMap::new(),
            on_change: Box::new(on_change),
            update_json_validity: None,
        }
    }

    /// Show a whole-model editor whenever `functor` holds
    pub fn with_show_custom(mut self, functor: impl Into<Functor>) -> Self {
        self.show_custom = Some(functor.into());
        self
    }

    /// Receive the AND of all JSON fields' validity whenever one changes
    pub fn with_json_validity<F>(mut self, callback: F) -> Self
    where
        F: FnMut(bool) + 'static,
    {
        self.update_json_validity = Some(Box::new(callback));
        self
    }

    /// Offset date pickers display in
    pub fn with_local_offset(mut self, offset: FixedOffset) -> Self {
        self.local_offset = offset;
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn model(&self) -> Option<&Value> {
        self.model.as_ref()
    }

    /// Replace the model; called by the host after it accepts a change
    pub fn set_model(&mut self, model: Option<Value>) {
        self.model = model;
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    // ------------------------------------------------------------------------
    // Model access and change protocol
    // ------------------------------------------------------------------------

    /// Value at the field's path; no default substitution
    pub fn field_value(&self, field: &Field) -> Option<&Value> {
        self.model
            .as_ref()
            .and_then(|model| deep_get(model, &field.path()))
    }

    /// Commit one field's new value (`None` removes it), then sweep
    pub fn field_change(&mut self, field: &Field, new_value: Option<Value>) {
        let Some(model) = self.model.as_ref() else {
            return;
        };

        let path = field.path();
        let new_model = match new_value {
            None => deep_delete(model, &path),
            Some(value) => deep_set(model, &path, value),
        };

        self.model_change(new_model);
    }

    /// Prune every field that is no longer defined and report the result
    pub fn model_change(&mut self, mut new_model: Value) {
        for field in &self.fields {
            if !evaluate_functor(field.defined.as_ref(), Some(&new_model), true) {
                if deep_get(&new_model, &field.path()).is_some() {
                    debug!(field = %field.name, "pruning value of undefined field");
                }
                new_model = deep_delete(&new_model, &field.path());
            }
        }

        (self.on_change)(new_model);
    }

    /// Replace the whole model from the custom editor
    pub fn custom_change(&mut self, new_model: Value) {
        self.model_change(new_model);
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Render every defined field in schema order, plus the custom editor
    pub fn render(&self) -> Rendered {
        let Some(model) = self.model.as_ref() else {
            return Rendered::default();
        };

        let mut rendered = Rendered::default();
        for field in &self.fields {
            if let Some(field) = self.render_field(field) {
                rendered.fields.push(field);
            }
        }

        if evaluate_functor(self.show_custom.as_ref(), Some(model), false) {
            rendered.custom = Some(CustomEditor {
                label: "Custom",
                value: model.clone(),
            });
        }

        rendered
    }

    /// Render one field, `None` when it is hidden
    pub fn render_field(&self, field: &Field) -> Option<RenderedField> {
        let model = self.model.as_ref()?;
        if !evaluate_functor(field.defined.as_ref(), Some(model), true) {
            return None;
        }

        let value = self.field_value(field);
        let required = evaluate_functor(field.required.as_ref(), Some(model), false);
        let missing = value.map_or(true, Value::is_null);

        Some(RenderedField {
            name: field.name.clone(),
            label: field.display_label(),
            info: field.info.clone(),
            disabled: evaluate_functor(field.disabled.as_ref(), Some(model), false),
            intent: (required && missing).then_some(Intent::Primary),
            widget: self.render_field_input(field),
        })
    }

    /// Build the widget for a field's kind.
    ///
    /// Infallible: unknown kinds are rejected when the schema is loaded.
    pub fn render_field_input(&self, field: &Field) -> FieldWidget {
        let value = self.field_value(field).filter(|v| !v.is_null());
        let with_default = || value.or(field.default_value.as_ref()).cloned();

        match field.kind {
            FieldKind::Number => FieldWidget::Number {
                value: with_default(),
                min: field.min.unwrap_or(0.0),
                placeholder: field.placeholder.clone(),
            },
            FieldKind::SizeBytes => FieldWidget::SizeBytes {
                value: with_default(),
                min: 0.0,
                step_size: SIZE_STEP,
                major_step_size: SIZE_MAJOR_STEP,
            },
            FieldKind::String => self.string_widget(field, value, None),
            FieldKind::Duration => self.string_widget(field, value, Some(Sanitizer::Duration)),
            FieldKind::Boolean => FieldWidget::Boolean {
                value: with_default().is_some_and(|v| is_truthy(&v)),
            },
            FieldKind::StringArray => FieldWidget::StringArray {
                values: value
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(display_text).collect())
                    .unwrap_or_default(),
                placeholder: field.placeholder.clone(),
            },
            FieldKind::Json => FieldWidget::Json {
                value: value.cloned(),
                placeholder: field.placeholder.clone(),
            },
            FieldKind::File => FieldWidget::File {
                button_text: "Browse",
                accept: ".json",
                text: value
                    .filter(|v| is_truthy(v))
                    .map(Value::to_string)
                    .or_else(|| field.placeholder.clone()),
            },
            FieldKind::Date => {
                let date = value.and_then(Value::as_str).and_then(|stored| {
                    parse_date(stored, self.local_offset)
                        .map_err(|e| warn!(field = %field.name, error = %e, "unreadable date"))
                        .ok()
                });
                FieldWidget::Date {
                    text: date.as_ref().map(format_date),
                    value: date,
                    placeholder: DATE_PLACEHOLDER,
                }
            }
        }
    }

    fn string_widget(
        &self,
        field: &Field,
        value: Option<&Value>,
        sanitizer: Option<Sanitizer>,
    ) -> FieldWidget {
        let shown = value
            .map(display_text)
            .or_else(|| field.default_value.as_ref().map(display_text))
            .unwrap_or_default();

        FieldWidget::String {
            value: shown,
            placeholder: field.placeholder.clone(),
            suggestions: flatten_suggestions(&field.suggestions),
            sanitizer,
        }
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Apply a user edit to the named field
    pub fn handle(&mut self, name: &str, event: FieldEvent) -> FormResult<()> {
        let field = self
            .field(name)
            .cloned()
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        match (field.kind, event) {
            (FieldKind::Number | FieldKind::SizeBytes, FieldEvent::Input(text)) => {
                if text.trim().is_empty() {
                    self.field_change(&field, None);
                } else if let Some(number) = parse_number(&text) {
                    self.field_change(&field, Some(number));
                } else {
                    debug!(field = %field.name, input = %text, "ignoring non-numeric input");
                }
            }
            (FieldKind::String, FieldEvent::Input(text)) => {
                self.field_change(&field, Some(Value::String(text)));
            }
            (FieldKind::Duration, FieldEvent::Input(text)) => {
                let sanitized = Sanitizer::Duration.apply(&text);
                self.field_change(&field, Some(Value::String(sanitized)));
            }
            (FieldKind::String | FieldKind::Duration, FieldEvent::Blur) => {
                if self.field_value(&field) == Some(&json!("")) {
                    self.field_change(&field, None);
                }
            }
            (FieldKind::Boolean, FieldEvent::Toggle(b)) => {
                self.field_change(&field, Some(Value::Bool(b)));
            }
            (FieldKind::StringArray, FieldEvent::Input(text)) => {
                let values = split_array_input(&text);
                let values = (!values.is_empty()).then(|| json!(values));
                self.field_change(&field, values);
            }
            (FieldKind::StringArray, FieldEvent::Values(values)) => {
                self.field_change(&field, Some(json!(values)));
            }
            (FieldKind::Json, FieldEvent::Json(text)) => self.json_input(&field, &text),
            (FieldKind::File, FieldEvent::FileContents(contents)) => {
                let parsed = parse_string_to_json(&contents).map_err(|e| {
                    warn!(field = %field.name, error = %e, "file is not valid JSON");
                    e
                })?;
                self.field_change(&field, Some(parsed));
            }
            (FieldKind::Date, FieldEvent::DatePicked(picked)) => {
                let stored = picked.as_ref().map(|d| Value::String(to_utc_iso(d)));
                self.field_change(&field, stored);
            }
            (kind, event) => {
                return Err(FormError::UnsupportedEvent {
                    field: field.name.clone(),
                    kind: kind.as_str(),
                    event: event.name(),
                });
            }
        }

        Ok(())
    }

    /// Read a file's text and commit it to a `file` field
    #[cfg(feature = "native")]
    pub async fn load_file(
        &mut self,
        name: &str,
        path: impl AsRef<std::path::Path>,
    ) -> FormResult<()> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        self.handle(name, FieldEvent::FileContents(contents))
    }

    fn json_input(&mut self, field: &Field, text: &str) {
        if text.trim().is_empty() {
            self.field_change(field, None);
            self.update_input_validity(&field.name, true);
            return;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                self.field_change(field, Some(value));
                self.update_input_validity(&field.name, true);
            }
            Err(e) => {
                debug!(field = %field.name, error = %e, "json input is not valid yet");
                self.update_input_validity(&field.name, false);
            }
        }
    }

    fn update_input_validity(&mut self, name: &str, valid: bool) {
        let previous = self.json_inputs_validity.insert(name.to_string(), valid);
        if previous == Some(valid) {
            return;
        }

        let all_valid = self.json_inputs_validity.values().all(|v| *v);
        if let Some(callback) = self.update_json_validity.as_mut() {
            callback(all_valid);
        }
    }

    /// Whether every tracked JSON field currently parses
    pub fn json_valid(&self) -> bool {
        self.json_inputs_validity.values().all(|v| *v)
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(json!(int));
    }
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn flatten_suggestions(suggestions: &[Suggestion]) -> Vec<SuggestionItem> {
    suggestions
        .iter()
        .flat_map(|s| match s {
            Suggestion::Value(value) => vec![SuggestionItem {
                group: None,
                value: value.clone(),
            }],
            Suggestion::Group { group, suggestions } => suggestions
                .iter()
                .map(|value| SuggestionItem {
                    group: Some(group.clone()),
                    value: value.clone(),
                })
                .collect(),
        })
        .collect()
}
