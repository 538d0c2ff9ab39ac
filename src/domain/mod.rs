pub mod auth;
pub mod console;

pub use auth::{redirect_path, AuthConfig, AuthSession, AuthUser, IdentityProvider, RedirectState};
pub use console::ConsoleConfig;
