//! # Autoform - Schema-Driven Form Engine
//!
//! Turns an ordered list of field descriptors into an editing surface over a
//! JSON model, with the console plumbing (configuration, HTTP client and
//! identity session) needed to host it.
//!
//! ## Features
//!
//! - **Path access**: copy-on-write get/set/delete on nested values
//! - **Functors**: constants, closures or declarative conditions for
//!   `disabled`, `defined` and `required`
//! - **Nine field kinds**: number, size-bytes, string, boolean,
//!   string-array, json, duration, file and date
//! - **Definedness sweep**: values of hidden fields are pruned on every change
//! - **Headless widgets**: rendering produces serializable widget
//!   descriptions that the `autoform-ui` crate draws with Leptos
//!
//! ## Quick Start
//!
//! ```rust
//! use autoform::form::{AutoForm, Field, FieldEvent, FieldKind};
//! use serde_json::json;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let latest = Rc::new(RefCell::new(None));
//! let sink = latest.clone();
//!
//! let fields = vec![Field::new("spec.rows", FieldKind::Number)];
//! let mut form = AutoForm::new(fields, Some(json!({})), move |m| {
//!     *sink.borrow_mut() = Some(m);
//! });
//!
//! form.handle("spec.rows", FieldEvent::Input("5".into())).unwrap();
//! assert_eq!(latest.borrow().clone(), Some(json!({"spec": {"rows": 5}})));
//! ```
//!
//! ## Architecture
//!
//! - **Form**: the engine, free of I/O and usable from WebAssembly
//! - **Domain**: console configuration and the identity provider port
//! - **Adapters**: the HTTP client (native only)
//! - **Config**: settings and form schema loading (native only)

pub mod domain;
pub mod form;

#[cfg(feature = "native")]
pub mod adapters;
#[cfg(feature = "native")]
pub mod bootstrap;
#[cfg(feature = "native")]
pub mod cli;
#[cfg(feature = "native")]
pub mod config;
