//! Session handoff module
//!
//! There is no server-held login session. The resolved TikTok identity is
//! handed to the front end once through redirect query parameters, and the
//! only server-side record is the short-lived set of issued OAuth `state`
//! values.
//!
//! # Modules
//!
//! - [`handoff`] - Encoding and decoding of the redirect parameters
//! - [`state_store`] - Issued anti-forgery `state` values awaiting the callback

pub mod handoff;
pub mod state_store;

pub use handoff::{ConnectedIdentity, HandoffError, SessionHandoff};
pub use state_store::OAuthStateStore;
