#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the kolokoi application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod handlers;
pub mod models;
pub mod oauth;
pub mod session;
pub mod settings;
pub mod utils;

// Test utilities for unit tests and the feature-gated integration tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use handlers::{configure_services, health, tiktok_callback, tiktok_login, tiktok_status};
pub use oauth::{OAuthError, TikTokAuthService};
pub use session::{OAuthStateStore, SessionHandoff};
pub use settings::KolokoiSettings;
