//! Browser-side API calls
//!
//! Requests are resolved against the console base URL and carry the
//! configured default headers, mirroring the native client.

use autoform::domain::ConsoleConfig;
use autoform::form::FormSchema;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde_json::Value;

async fn fetch_json<T: DeserializeOwned>(config: &ConsoleConfig, url: &str) -> Result<T, String> {
    let mut request = Request::get(&config.base(url));
    for (name, value) in config.default_headers() {
        request = request.header(&name, &value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("{} returned {}", url, response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Schema name used when a document is a bare field list
fn schema_name(url: &str) -> &str {
    let file = url.rsplit('/').next().unwrap_or(url);
    let stem = file.split('.').next().unwrap_or(file);
    if stem.is_empty() {
        "form"
    } else {
        stem
    }
}

/// Fetch a form schema document (full schema or bare field list)
pub async fn fetch_form_schema(config: &ConsoleConfig, url: &str) -> Result<FormSchema, String> {
    let document: Value = fetch_json(config, url).await?;
    FormSchema::from_document(document, schema_name(url)).map_err(|e| e.to_string())
}
