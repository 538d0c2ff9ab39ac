use autoform::domain::ConsoleConfig;
use autoform::form::FormSchema;
use leptos::prelude::*;
use leptos::web_sys;
use serde_json::{json, Value};
use wasm_bindgen::{JsCast, JsValue};

mod api;
mod components;

pub use components::AutoFormView;

/// Form playground: a schema editor, the rendered form and the live model.
///
/// A schema can be preloaded with `?schema=<url>`.
#[component]
pub fn App(config: ConsoleConfig) -> impl IntoView {
    let schema = RwSignal::new(None::<FormSchema>);
    let schema_text = RwSignal::new(String::new());
    let schema_error = RwSignal::new(None::<String>);
    let model = RwSignal::new(json!({}));
    let json_valid = RwSignal::new(true);

    if let Some(url) = query_param("schema") {
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_form_schema(&config, &url).await {
                Ok(loaded) => {
                    log::info!("loaded form '{}' from {}", loaded.name, url);
                    schema.set(Some(loaded));
                }
                Err(e) => schema_error.set(Some(e)),
            }
        });
    }

    let on_schema_input = move |ev| {
        let text = event_target_value(&ev);
        schema_text.set(text.clone());
        if text.trim().is_empty() {
            return;
        }
        let parsed = serde_json::from_str::<Value>(&text)
            .map_err(|e| e.to_string())
            .and_then(|doc| FormSchema::from_document(doc, "form").map_err(|e| e.to_string()));
        match parsed {
            Ok(loaded) => {
                schema_error.set(None);
                schema.set(Some(loaded));
            }
            Err(e) => schema_error.set(Some(e)),
        }
    };

    view! {
        <div class="grid grid-cols-3 gap-6 p-6 h-screen bg-gray-100">
            <div class="flex flex-col">
                <h2 class="text-lg font-semibold mb-2">"Schema"</h2>
                <textarea
                    class="flex-1 px-3 py-2 text-sm font-mono border border-gray-300 rounded-md"
                    spellcheck="false"
                    placeholder=r#"[{"name": "spec.rows", "type": "number"}]"#
                    prop:value=move || schema_text.get()
                    on:input=on_schema_input
                />
                {move || schema_error.get().map(|e| view! {
                    <p class="mt-1 text-xs text-red-500">{e}</p>
                })}
            </div>
            <div class="overflow-y-auto bg-white rounded-md p-4">
                {move || schema.get().map(|s| view! {
                    <h2 class="text-lg font-semibold mb-4">{s.name.clone()}</h2>
                    <AutoFormView
                        fields=s.fields
                        model=model
                        show_custom=s.show_custom.unwrap_or(false.into())
                        json_valid=json_valid
                    />
                })}
            </div>
            <div class="flex flex-col">
                <h2 class="text-lg font-semibold mb-2">
                    "Model"
                    {move || (!json_valid.get()).then(|| view! {
                        <span class="ml-2 text-xs text-red-500">"invalid JSON field"</span>
                    })}
                </h2>
                <pre class="flex-1 px-3 py-2 text-xs bg-white rounded-md overflow-auto">
                    {move || serde_json::to_string_pretty(&model.get()).unwrap_or_default()}
                </pre>
            </div>
        </div>
    }
}

fn query_param(name: &str) -> Option<String> {
    let search = window().location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search).ok()?.get(name)
}

/// Console settings the hosting page put on `window.consoleConfig`
fn read_console_config() -> ConsoleConfig {
    let window: JsValue = window().into();
    let raw = js_sys::Reflect::get(&window, &JsValue::from_str("consoleConfig"))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null());

    let Some(text) = raw
        .and_then(|v| js_sys::JSON::stringify(&v).ok())
        .and_then(|s| s.as_string())
    else {
        return ConsoleConfig::default();
    };

    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed consoleConfig: {}", e);
        ConsoleConfig::default()
    })
}

/// Apply the console config and mount the app into `.app-container`
pub fn mount_console() -> Result<(), String> {
    let config = read_console_config();

    if let Some(title) = &config.title {
        document().set_title(title);
    }

    let container = document()
        .query_selector(".app-container")
        .ok()
        .flatten()
        .ok_or_else(|| "No .app-container element found".to_string())?
        .dyn_into::<web_sys::HtmlElement>()
        .map_err(|_| ".app-container is not an HTML element".to_string())?;

    leptos::mount::mount_to(container, move || view! { <App config=config /> }).forget();
    Ok(())
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    if let Err(e) = mount_console() {
        wasm_bindgen::throw_str(&e);
    }
}
