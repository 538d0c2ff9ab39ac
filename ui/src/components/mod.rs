//! Leptos renderings of the headless form widgets

pub mod array_input;
pub mod auto_form;
pub mod json_input;
pub mod suggestible_input;

pub use auto_form::AutoFormView;
