//! Functor evaluation

use serde_json::Value;

use super::field::Functor;

/// Evaluate a functor attribute against the model.
///
/// Returns `default` when the attribute is unset or there is no model
/// (`None` or JSON `null`). Predicates run fresh on every call.
pub fn evaluate_functor(functor: Option<&Functor>, model: Option<&Value>, default: bool) -> bool {
    let (Some(functor), Some(model)) = (functor, model.filter(|m| !m.is_null())) else {
        return default;
    };

    match functor {
        Functor::Literal(b) => *b,
        Functor::Predicate(predicate) => predicate(model),
    }
}
