//! Comma separated string array input

use leptos::prelude::*;

/// Textarea for string arrays.
///
/// The text is kept locally so separators typed at the end survive the
/// round trip through the model; it is re-seeded only when the model changes
/// to something the current text does not describe.
#[component]
pub fn ArrayInput(
    values: Signal<Vec<String>>,
    placeholder: Option<String>,
    disabled: Signal<bool>,
    on_input: Callback<String>,
) -> impl IntoView {
    let text = RwSignal::new(values.get_untracked().join(", "));

    Effect::new(move |_| {
        let current = values.get();
        let typed = autoform::form::widget::split_array_input(&text.get_untracked());
        if typed != current {
            text.set(current.join(", "));
        }
    });

    view! {
        <textarea
            class="w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
            rows=3
            placeholder=placeholder.unwrap_or_default()
            disabled=move || disabled.get()
            prop:value=move || text.get()
            on:input=move |ev| {
                let value = event_target_value(&ev);
                text.set(value.clone());
                on_input.run(value);
            }
        />
    }
}
