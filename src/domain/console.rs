use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime configuration of the console shell.
///
/// Read from `autoform.toml` natively and from `window.consoleConfig` in the
/// browser, hence the camelCase aliases.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Document title
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "hideLegacy")]
    pub hide_legacy: bool,
    /// Base URL every absolute-path request is resolved against
    #[serde(default, alias = "baseURL")]
    pub base_url: Option<String>,
    #[serde(default, alias = "customHeaderName")]
    pub custom_header_name: Option<String>,
    #[serde(default, alias = "customHeaderValue")]
    pub custom_header_value: Option<String>,
    /// Extra default headers, applied after the single custom header
    #[serde(default, alias = "customHeaders")]
    pub custom_headers: HashMap<String, String>,
    #[serde(default, alias = "exampleManifestsUrl")]
    pub example_manifests_url: Option<String>,
}

impl ConsoleConfig {
    /// Default headers in application order
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let (Some(name), Some(value)) = (&self.custom_header_name, &self.custom_header_value) {
            headers.push((name.clone(), value.clone()));
        }
        let mut extra: Vec<_> = self.custom_headers.iter().collect();
        extra.sort();
        headers.extend(extra.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        headers
    }

    /// Resolve an absolute path against the base URL; other URLs pass through
    pub fn base(&self, url: &str) -> String {
        match self.base_url.as_deref() {
            Some(base) if url.starts_with('/') => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_browser_config_aliases() {
        let config: ConsoleConfig = serde_json::from_value(json!({
            "title": "My console",
            "hideLegacy": true,
            "baseURL": "https://proxy.example.com/druid/",
            "customHeaderName": "X-Tenant",
            "customHeaderValue": "acme",
            "customHeaders": {"X-Trace": "on"}
        }))
        .unwrap();

        assert_eq!(config.title.as_deref(), Some("My console"));
        assert!(config.hide_legacy);
        assert_eq!(
            config.default_headers(),
            vec![
                ("X-Tenant".to_string(), "acme".to_string()),
                ("X-Trace".to_string(), "on".to_string()),
            ]
        );
        assert_eq!(
            config.base("/status"),
            "https://proxy.example.com/druid/status"
        );
        assert_eq!(config.base("https://other/x"), "https://other/x");
    }

    #[test]
    fn test_header_name_without_value_is_ignored() {
        let config = ConsoleConfig {
            custom_header_name: Some("X-Only-Name".into()),
            ..Default::default()
        };
        assert!(config.default_headers().is_empty());
        assert_eq!(config.base("/status"), "/status");
    }
}
