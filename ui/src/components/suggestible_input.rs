//! Text input with an optional suggestion list

use autoform::form::widget::SuggestionItem;
use leptos::prelude::*;

/// Free text input; suggestions are offered through a `<datalist>`, labelled
/// with their group when they came from one
#[component]
pub fn SuggestibleInput(
    /// Id used to link the input to its datalist
    list_id: String,
    value: Signal<String>,
    placeholder: Option<String>,
    suggestions: Vec<SuggestionItem>,
    disabled: Signal<bool>,
    primary: Signal<bool>,
    on_input: Callback<String>,
    on_blur: Callback<()>,
) -> impl IntoView {
    let has_suggestions = !suggestions.is_empty();
    let list_attr = has_suggestions.then(|| list_id.clone());

    view! {
        <input
            type="text"
            class=move || {
                let ring = if primary.get() { "border-blue-500" } else { "border-gray-300" };
                format!("w-full px-3 py-2 text-sm border rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500 {}", ring)
            }
            list=list_attr
            placeholder=placeholder.unwrap_or_default()
            disabled=move || disabled.get()
            prop:value=move || value.get()
            on:input=move |ev| on_input.run(event_target_value(&ev))
            on:blur=move |_| on_blur.run(())
        />
        {has_suggestions.then(|| view! {
            <datalist id=list_id>
                {suggestions.into_iter().map(|item| {
                    let label = item.group.clone().unwrap_or_default();
                    view! { <option value=item.value label=label></option> }
                }).collect_view()}
            </datalist>
        })}
    }
}
