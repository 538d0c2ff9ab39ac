//! JSON text editor bound to a structured value

use leptos::prelude::*;
use serde_json::Value;

fn format_value(value: Option<&Value>) -> String {
    value
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .unwrap_or_default()
}

/// Parse error for the current text, blank text counts as valid
fn validate_json(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<Value>(text).err().map(|e| e.to_string())
}

/// Textarea holding JSON text.
///
/// Every keystroke is reported through `on_input`; the engine decides what
/// to commit. The text is re-seeded from `value` only while it parses, so an
/// edit in progress is never overwritten.
#[component]
pub fn JsonInput(
    value: Signal<Option<Value>>,
    placeholder: Option<String>,
    #[prop(default = 8)]
    rows: u32,
    disabled: Signal<bool>,
    on_input: Callback<String>,
) -> impl IntoView {
    let text = RwSignal::new(format_value(value.get_untracked().as_ref()));
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let current = value.get();
        let typed = text.get_untracked();
        if validate_json(&typed).is_some() {
            return;
        }
        let parsed = serde_json::from_str::<Value>(&typed).ok();
        if parsed != current {
            text.set(format_value(current.as_ref()));
        }
    });

    view! {
        <div>
            <textarea
                class="w-full px-3 py-2 text-sm font-mono border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
                rows=rows
                spellcheck="false"
                placeholder=placeholder.unwrap_or_default()
                disabled=move || disabled.get()
                prop:value=move || text.get()
                on:input=move |ev| {
                    let typed = event_target_value(&ev);
                    error.set(validate_json(&typed));
                    text.set(typed.clone());
                    on_input.run(typed);
                }
            />
            {move || error.get().map(|e| view! {
                <p class="mt-1 text-xs text-red-500">{e}</p>
            })}
        </div>
    }
}
