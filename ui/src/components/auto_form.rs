//! Auto Form View
//!
//! Draws the engine's headless widgets and feeds DOM events back as
//! [`FieldEvent`]s. The engine owns all commit logic; components only keep
//! the text a user is in the middle of typing.

use autoform::form::date::parse_date;
use autoform::form::widget::{CustomEditor, FieldWidget, Rendered};
use autoform::form::{AutoForm, Field, FieldEvent, Functor};
use chrono::{FixedOffset, Offset, Utc};
use leptos::prelude::*;
use leptos::web_sys;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::array_input::ArrayInput;
use super::json_input::JsonInput;
use super::suggestible_input::SuggestibleInput;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Current offset of the browser's time zone
pub fn browser_offset() -> FixedOffset {
    // minutes to add to local time to get UTC
    let minutes = js_sys::Date::new_0().get_timezone_offset();
    FixedOffset::west_opt((minutes * 60.0) as i32).unwrap_or_else(|| Utc.fix())
}

fn number_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// ============================================================================
// Auto Form
// ============================================================================

/// Renders `fields` over `model`; every committed edit replaces `model`
#[component]
pub fn AutoFormView(
    fields: Vec<Field>,
    model: RwSignal<Value>,
    /// When to offer the whole-model editor
    #[prop(optional)]
    show_custom: Option<Functor>,
    /// Receives whether every JSON field currently parses
    #[prop(optional)]
    json_valid: Option<RwSignal<bool>>,
) -> impl IntoView {
    let offset = browser_offset();

    let mut form = AutoForm::new(fields, Some(model.get_untracked()), move |m| model.set(m))
        .with_local_offset(offset);
    if let Some(functor) = show_custom {
        form = form.with_show_custom(functor);
    }
    if let Some(valid) = json_valid {
        form = form.with_json_validity(move |v| valid.set(v));
    }
    let form = StoredValue::new_local(form);

    let rendered = Memo::new(move |_| {
        let current = model.get();
        form.update_value(|f| f.set_model(Some(current)));
        form.with_value(|f| f.render())
    });

    let on_event = Callback::new(move |(name, event): (String, FieldEvent)| {
        let result = form.try_update_value(|f| {
            f.set_model(Some(model.get_untracked()));
            f.handle(&name, event)
        });
        if let Some(Err(e)) = result {
            log::warn!("{}", e);
        }
    });

    let on_custom = Callback::new(move |text: String| {
        if text.trim().is_empty() {
            return;
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => form.update_value(|f| {
                f.set_model(Some(model.get_untracked()));
                f.custom_change(value);
            }),
            Err(e) => log::debug!("custom editor is not valid JSON yet: {}", e),
        }
    });

    let names = move || {
        rendered
            .get()
            .fields
            .into_iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
    };
    let custom = Memo::new(move |_| rendered.get().custom);

    view! {
        <div class="space-y-4">
            <For
                each=names
                key=|name| name.clone()
                children=move |name| {
                    view! {
                        <FieldRow name=name rendered=rendered offset=offset on_event=on_event />
                    }
                }
            />
            <Show when=move || custom.with(|c| c.is_some())>
                <CustomRow custom=custom on_input=on_custom />
            </Show>
        </div>
    }
}

// ============================================================================
// Field Row
// ============================================================================

#[component]
fn FieldRow(
    name: String,
    rendered: Memo<Rendered>,
    offset: FixedOffset,
    on_event: Callback<(String, FieldEvent)>,
) -> impl IntoView {
    let key = name.clone();
    let field = Memo::new(move |_| rendered.with(|r| r.field(&key).cloned()));

    // the kind never changes, so the first render decides the widget
    let Some(initial) = field.get_untracked() else {
        return ().into_any();
    };

    let widget = Signal::derive(move || field.get().map(|f| f.widget));
    let disabled = Signal::derive(move || field.get().is_some_and(|f| f.disabled));
    let primary = Signal::derive(move || field.get().is_some_and(|f| f.intent.is_some()));
    let label = move || field.get().map(|f| f.label).unwrap_or_default();

    let event_name = name.clone();
    let emit = Callback::new(move |event: FieldEvent| on_event.run((event_name.clone(), event)));
    let on_text = Callback::new(move |text: String| emit.run(FieldEvent::Input(text)));

    let input = match initial.widget {
        FieldWidget::Number { min, placeholder, .. } => view! {
            <NumericInput
                value=Signal::derive(move || match widget.get() {
                    Some(FieldWidget::Number { value, .. }) => number_text(value),
                    _ => String::new(),
                })
                min=min
                placeholder=placeholder.unwrap_or_default()
                disabled=disabled
                primary=primary
                emit=emit
            />
        }
        .into_any(),
        FieldWidget::SizeBytes { min, step_size, major_step_size, .. } => view! {
            <NumericInput
                value=Signal::derive(move || match widget.get() {
                    Some(FieldWidget::SizeBytes { value, .. }) => number_text(value),
                    _ => String::new(),
                })
                min=min
                step=step_size
                major_step=major_step_size
                disabled=disabled
                primary=primary
                emit=emit
            />
        }
        .into_any(),
        FieldWidget::String { placeholder, suggestions, .. } => view! {
            <SuggestibleInput
                list_id=format!("autoform-{}-suggestions", name)
                value=Signal::derive(move || match widget.get() {
                    Some(FieldWidget::String { value, .. }) => value,
                    _ => String::new(),
                })
                placeholder=placeholder
                suggestions=suggestions
                disabled=disabled
                primary=primary
                on_input=on_text
                on_blur=Callback::new(move |_| emit.run(FieldEvent::Blur))
            />
        }
        .into_any(),
        FieldWidget::Boolean { .. } => view! {
            <BooleanButtons
                value=Signal::derive(move || matches!(widget.get(), Some(FieldWidget::Boolean { value: true })))
                disabled=disabled
                emit=emit
            />
        }
        .into_any(),
        FieldWidget::StringArray { placeholder, .. } => view! {
            <ArrayInput
                values=Signal::derive(move || match widget.get() {
                    Some(FieldWidget::StringArray { values, .. }) => values,
                    _ => Vec::new(),
                })
                placeholder=placeholder
                disabled=disabled
                on_input=on_text
            />
        }
        .into_any(),
        FieldWidget::Json { placeholder, .. } => view! {
            <JsonInput
                value=Signal::derive(move || match widget.get() {
                    Some(FieldWidget::Json { value, .. }) => value,
                    _ => None,
                })
                placeholder=placeholder
                disabled=disabled
                on_input=Callback::new(move |text| emit.run(FieldEvent::Json(text)))
            />
        }
        .into_any(),
        FieldWidget::File { button_text, accept, .. } => view! {
            <FileInput
                button_text=button_text
                accept=accept
                text=Signal::derive(move || match widget.get() {
                    Some(FieldWidget::File { text, .. }) => text,
                    _ => None,
                })
                disabled=disabled
                emit=emit
            />
        }
        .into_any(),
        FieldWidget::Date { placeholder, .. } => view! {
            <DateInput
                value=Signal::derive(move || match widget.get() {
                    Some(FieldWidget::Date { value, .. }) => {
                        value.map(|d| d.format(DATE_INPUT_FORMAT).to_string())
                    }
                    _ => None,
                })
                placeholder=placeholder
                offset=offset
                disabled=disabled
                emit=emit
            />
        }
        .into_any(),
    };

    view! {
        <div class="mb-4">
            <label class="block text-sm font-medium text-gray-700 mb-1" title=initial.info>
                {label}
            </label>
            {input}
        </div>
    }
    .into_any()
}

#[component]
fn CustomRow(custom: Memo<Option<CustomEditor>>, on_input: Callback<String>) -> impl IntoView {
    view! {
        <div class="mb-4">
            <label class="block text-sm font-medium text-gray-700 mb-1">
                {move || custom.get().map(|c| c.label).unwrap_or_default()}
            </label>
            <JsonInput
                value=Signal::derive(move || custom.get().map(|c| c.value))
                placeholder=None
                rows=12
                disabled=Signal::stored(false)
                on_input=on_input
            />
        </div>
    }
}

// ============================================================================
// Numeric Input
// ============================================================================

/// Number input; shift+arrow moves by `major_step` when one is given
#[component]
fn NumericInput(
    value: Signal<String>,
    min: f64,
    #[prop(optional)]
    step: Option<u64>,
    #[prop(optional)]
    major_step: Option<u64>,
    #[prop(optional)]
    placeholder: String,
    disabled: Signal<bool>,
    primary: Signal<bool>,
    emit: Callback<FieldEvent>,
) -> impl IntoView {
    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let Some(major) = major_step else {
            return;
        };
        if !ev.shift_key() {
            return;
        }
        let delta = match ev.key().as_str() {
            "ArrowUp" => major as f64,
            "ArrowDown" => -(major as f64),
            _ => return,
        };
        ev.prevent_default();
        let current = value.get_untracked().parse::<f64>().unwrap_or(0.0);
        emit.run(FieldEvent::Input((current + delta).max(min).to_string()));
    };

    view! {
        <input
            type="number"
            min=min.to_string()
            step=step.map(|s| s.to_string()).unwrap_or_else(|| "any".to_string())
            class=move || {
                let ring = if primary.get() { "border-blue-500" } else { "border-gray-300" };
                format!("w-full px-3 py-2 text-sm border rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500 {}", ring)
            }
            placeholder=placeholder
            disabled=move || disabled.get()
            prop:value=move || value.get()
            on:input=move |ev| emit.run(FieldEvent::Input(event_target_value(&ev)))
            on:keydown=on_keydown
        />
    }
}

// ============================================================================
// Boolean Buttons
// ============================================================================

#[component]
fn BooleanButtons(value: Signal<bool>, disabled: Signal<bool>, emit: Callback<FieldEvent>) -> impl IntoView {
    let class = |active: bool| {
        if active {
            "px-4 py-1 text-sm bg-blue-600 text-white first:rounded-l-md last:rounded-r-md"
        } else {
            "px-4 py-1 text-sm bg-gray-100 text-gray-700 hover:bg-gray-200 first:rounded-l-md last:rounded-r-md"
        }
    };

    view! {
        <div class="inline-flex shadow-sm">
            <button
                type="button"
                class=move || class(!value.get())
                disabled=move || disabled.get()
                on:click=move |_| emit.run(FieldEvent::Toggle(false))
            >
                "False"
            </button>
            <button
                type="button"
                class=move || class(value.get())
                disabled=move || disabled.get()
                on:click=move |_| emit.run(FieldEvent::Toggle(true))
            >
                "True"
            </button>
        </div>
    }
}

// ============================================================================
// File Input
// ============================================================================

#[component]
fn FileInput(
    button_text: &'static str,
    accept: &'static str,
    text: Signal<Option<String>>,
    disabled: Signal<bool>,
    emit: Callback<FieldEvent>,
) -> impl IntoView {
    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(file.text()).await {
                Ok(contents) => {
                    emit.run(FieldEvent::FileContents(contents.as_string().unwrap_or_default()))
                }
                Err(e) => log::warn!("Failed to read {}: {:?}", file.name(), e),
            }
        });
    };

    view! {
        <div class="space-y-2">
            <label class="inline-flex items-center px-3 py-2 text-sm bg-gray-100 hover:bg-gray-200 rounded-md cursor-pointer">
                {button_text}
                <input
                    type="file"
                    class="hidden"
                    accept=accept
                    disabled=move || disabled.get()
                    on:change=on_change
                />
            </label>
            {move || text.get().map(|t| view! {
                <pre class="px-3 py-2 text-xs bg-gray-50 rounded-md overflow-x-auto">{t}</pre>
            })}
        </div>
    }
}

// ============================================================================
// Date Input
// ============================================================================

#[component]
fn DateInput(
    value: Signal<Option<String>>,
    placeholder: &'static str,
    offset: FixedOffset,
    disabled: Signal<bool>,
    emit: Callback<FieldEvent>,
) -> impl IntoView {
    let on_change = move |ev: web_sys::Event| {
        let raw = event_target_value(&ev);
        if raw.is_empty() {
            emit.run(FieldEvent::DatePicked(None));
            return;
        }
        match parse_date(&raw, offset) {
            Ok(picked) => emit.run(FieldEvent::DatePicked(Some(picked))),
            Err(e) => log::warn!("{}", e),
        }
    };

    view! {
        <input
            type="datetime-local"
            class="w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
            placeholder=placeholder
            title=placeholder
            disabled=move || disabled.get()
            prop:value=move || value.get().unwrap_or_default()
            on:change=on_change
        />
    }
}
