//! Redirect-parameter channel between the callback route and the dashboard
//!
//! The front end reads these parameters once on page load and then clears
//! them from the address bar. `tt_connected=true` is the only success signal;
//! anything else is either a carried `tt_error` or not a handoff at all.

use crate::oauth::{OAuthError, ProviderProfile};
use std::collections::HashMap;
use thiserror::Error;

pub const CONNECTED_KEY: &str = "tt_connected";
pub const ERROR_KEY: &str = "tt_error";
pub const DISPLAY_NAME_KEY: &str = "display_name";
pub const USERNAME_KEY: &str = "username";
pub const AVATAR_URL_KEY: &str = "avatar_url";
pub const OPEN_ID_KEY: &str = "open_id";
pub const EXPIRES_IN_KEY: &str = "expires_in";

/// Lifetime reported when TikTok omits `expires_in`
pub const DEFAULT_EXPIRES_IN: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedIdentity {
    pub display_name: String,
    pub username: String,
    pub avatar_url: String,
    pub open_id: String,
    pub expires_in: u64,
}

impl ConnectedIdentity {
    #[must_use]
    pub fn from_profile(profile: &ProviderProfile, expires_in: Option<u64>) -> Self {
        Self {
            display_name: profile.display_name.clone(),
            username: profile.username_or_fallback(),
            avatar_url: profile.avatar_url.clone().unwrap_or_default(),
            open_id: profile.provider_user_id.clone(),
            expires_in: expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        }
    }
}

/// Outcome of one callback, success or failure but never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionHandoff {
    Connected(ConnectedIdentity),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandoffError {
    #[error("missing handoff parameter: {0}")]
    MissingParameter(&'static str),
    #[error("invalid expires_in value: {0}")]
    InvalidExpiresIn(String),
    #[error("query string carries no TikTok handoff")]
    NoHandoff,
}

impl SessionHandoff {
    #[must_use]
    pub fn connected(profile: &ProviderProfile, expires_in: Option<u64>) -> Self {
        Self::Connected(ConnectedIdentity::from_profile(profile, expires_in))
    }

    #[must_use]
    pub fn failed(error: &OAuthError) -> Self {
        Self::Failed {
            error: error.user_message(),
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// Parameters in the fixed order the dashboard expects
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Connected(identity) => vec![
                (CONNECTED_KEY, "true".to_string()),
                (DISPLAY_NAME_KEY, identity.display_name.clone()),
                (USERNAME_KEY, identity.username.clone()),
                (AVATAR_URL_KEY, identity.avatar_url.clone()),
                (OPEN_ID_KEY, identity.open_id.clone()),
                (EXPIRES_IN_KEY, identity.expires_in.to_string()),
            ],
            Self::Failed { error } => vec![(ERROR_KEY, error.clone())],
        }
    }

    /// Percent-encoded query string; spaces become `%20`
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Redirect target on the front end carrying this handoff
    #[must_use]
    pub fn redirect_location(&self, frontend_path: &str) -> String {
        let separator = if frontend_path.contains('?') { '&' } else { '?' };
        format!("{frontend_path}{separator}{}", self.to_query_string())
    }

    /// Decode a handoff from an untrusted query string
    ///
    /// # Errors
    ///
    /// Returns an error when a success handoff lacks a required field, when
    /// `expires_in` is not a number, or when neither outcome is present
    pub fn from_query(query: &str) -> Result<Self, HandoffError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }

        if params.get(CONNECTED_KEY).map(String::as_str) == Some("true") {
            let mut take = |key: &'static str| {
                params
                    .remove(key)
                    .ok_or(HandoffError::MissingParameter(key))
            };
            let display_name = take(DISPLAY_NAME_KEY)?;
            let username = take(USERNAME_KEY)?;
            let open_id = take(OPEN_ID_KEY)?;
            let expires_raw = take(EXPIRES_IN_KEY)?;
            let avatar_url = take(AVATAR_URL_KEY).unwrap_or_default();
            let expires_in = expires_raw
                .parse::<u64>()
                .map_err(|_| HandoffError::InvalidExpiresIn(expires_raw.clone()))?;

            return Ok(Self::Connected(ConnectedIdentity {
                display_name,
                username,
                avatar_url,
                open_id,
                expires_in,
            }));
        }

        params
            .remove(ERROR_KEY)
            .map(|error| Self::Failed { error })
            .ok_or(HandoffError::NoHandoff)
    }
}
