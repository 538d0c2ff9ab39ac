use reqwest::header::{HeaderName, HeaderValue};
use std::collections::HashMap;
use thiserror::Error;

use crate::config::Settings;
use crate::domain::console::ConsoleConfig;
use crate::form::{Field, FormSchema};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_console(&settings.console) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_forms(&settings.forms) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_console(console: &ConsoleConfig) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(base_url) = &console.base_url {
            if !base_url.starts_with('/') && reqwest::Url::parse(base_url).is_err() {
                errors.push(ValidationError::InvalidValue {
                    field: "console.base_url".to_string(),
                    reason: format!("'{}' is neither an absolute URL nor a path", base_url),
                });
            }
        }

        if console.custom_header_name.is_some() != console.custom_header_value.is_some() {
            errors.push(ValidationError::InvalidValue {
                field: "console.custom_header_name".to_string(),
                reason: "custom_header_name and custom_header_value must be set together"
                    .to_string(),
            });
        }

        for (name, value) in console.default_headers() {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                errors.push(ValidationError::InvalidValue {
                    field: format!("console header '{}'", name),
                    reason: "not a valid HTTP header name".to_string(),
                });
            }
            if HeaderValue::from_str(&value).is_err() {
                errors.push(ValidationError::InvalidValue {
                    field: format!("console header '{}'", name),
                    reason: "not a valid HTTP header value".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_forms(forms: &[FormSchema]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_names = HashMap::new();

        for (idx, form) in forms.iter().enumerate() {
            if let Some(prev_idx) = seen_names.insert(&form.name, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Form name '{}' appears at indices {} and {}",
                    form.name, prev_idx, idx
                )));
            }

            if form.name.is_empty() {
                errors.push(ValidationError::MissingField(format!("forms[{}].name", idx)));
            }

            if let Err(e) = Self::validate_fields(&form.name, &form.fields) {
                errors.extend(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Check one descriptor list: names present and unique, `min` only on numbers
    pub fn validate_fields(form: &str, fields: &[Field]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_names = HashMap::new();

        for (idx, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "{}.fields[{}].name",
                    form, idx
                )));
                continue;
            }

            if let Some(prev_idx) = seen_names.insert(&field.name, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Field '{}' in form '{}' appears at indices {} and {}",
                    field.name, form, prev_idx, idx
                )));
            }

            if field.min.is_some() && !field.kind.is_numeric() {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.{}", form, field.name),
                    reason: format!("'min' does not apply to {} fields", field.kind),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldKind;

    fn form(name: &str, fields: Vec<Field>) -> FormSchema {
        FormSchema {
            name: name.to_string(),
            fields,
            show_custom: None,
        }
    }

    #[test]
    fn test_valid_config() {
        let settings = Settings {
            console: ConsoleConfig {
                base_url: Some("https://druid.example.com".to_string()),
                custom_header_name: Some("X-Tenant".to_string()),
                custom_header_value: Some("acme".to_string()),
                ..Default::default()
            },
            auth: None,
            forms: vec![form("ingest", vec![Field::new("rows", FieldKind::Number).min(1.0)])],
        };

        assert!(ConfigValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_invalid_console() {
        let settings = Settings {
            console: ConsoleConfig {
                base_url: Some("not a url".to_string()),
                custom_header_name: Some("Bad Header".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn test_bad_header_name() {
        let mut custom_headers = HashMap::new();
        custom_headers.insert("bad header".to_string(), "v".to_string());
        let settings = Settings {
            console: ConsoleConfig { custom_headers, ..Default::default() },
            ..Default::default()
        };

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_duplicate_forms_and_fields() {
        let settings = Settings {
            forms: vec![
                form("a", vec![]),
                form(
                    "a",
                    vec![
                        Field::new("x", FieldKind::String),
                        Field::new("x", FieldKind::String).min(3.0),
                        Field::new("", FieldKind::Json),
                    ],
                ),
            ],
            ..Default::default()
        };

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.iter().filter(|e| matches!(e, ValidationError::Duplicate(_))).count(), 2);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingField(_))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidValue { .. })));
    }
}
