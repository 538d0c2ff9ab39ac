//! Schema-Driven Form Engine
//!
//! Maps an ordered list of field descriptors onto headless widgets and turns
//! user edits into new models:
//! - `path`: copy-on-write get/set/delete over structured values
//! - `field`: descriptors, kinds, functors and declarative conditions
//! - `auto_form`: rendering, the edit protocol and the definedness sweep

pub mod auto_form;
pub mod date;
pub mod error;
pub mod field;
pub mod functor;
pub mod label;
pub mod path;
pub mod schema;
pub mod widget;

pub use auto_form::{parse_string_to_json, AutoForm};
pub use error::{FormError, FormResult};
pub use field::{Condition, Field, FieldKind, Functor, Suggestion};
pub use functor::evaluate_functor;
pub use label::make_label_name;
pub use path::{deep_delete, deep_get, deep_set, PathSegment, PropertyPath};
pub use schema::FormSchema;
pub use widget::{FieldEvent, FieldWidget, Intent, Rendered, RenderedField};
