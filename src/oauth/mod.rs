//! TikTok OAuth module
//!
//! This module provides the authorization-code flow against TikTok Login Kit:
//! building the authorization request, exchanging the code, resolving the
//! profile and orchestrating the callback into a session handoff.

pub mod client;
pub mod error;
pub mod profile;
pub mod provider;
pub mod service;
pub mod token_exchange;

pub use client::{TikTokApi, TikTokClient};
pub use error::OAuthError;
pub use profile::{ProviderProfile, TikTokUser};
pub use provider::AuthorizationRequest;
pub use service::TikTokAuthService;
pub use token_exchange::TokenGrant;

/// Query parameters TikTok appends when redirecting back to the callback route
#[derive(Debug, Default, Clone)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// What kind of redirect the provider sent
#[derive(Debug, PartialEq, Eq)]
pub enum CallbackKind<'a> {
    ProviderError {
        error: &'a str,
        description: Option<&'a str>,
    },
    MissingCode,
    Authorized {
        code: &'a str,
        state: Option<&'a str>,
    },
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl OAuthCallback {
    /// Read the callback parameters from a raw query string
    ///
    /// Never fails: unknown keys are ignored and the first occurrence of a
    /// repeated key wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut callback = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "code" => &mut callback.code,
                "state" => &mut callback.state,
                "error" => &mut callback.error,
                "error_description" => &mut callback.error_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        callback
    }

    /// An `error` always wins, even when a code is also present
    #[must_use]
    pub fn classify(&self) -> CallbackKind<'_> {
        if let Some(error) = non_empty(self.error.as_ref()) {
            return CallbackKind::ProviderError {
                error,
                description: non_empty(self.error_description.as_ref()),
            };
        }

        match non_empty(self.code.as_ref()) {
            Some(code) => CallbackKind::Authorized {
                code,
                state: non_empty(self.state.as_ref()),
            },
            None => CallbackKind::MissingCode,
        }
    }
}
