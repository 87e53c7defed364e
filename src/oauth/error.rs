//! Failure taxonomy for the TikTok login flow
//!
//! Every variant ends up as the `tt_error` value of a failure handoff, so each
//! one carries a message that is safe to show in the dashboard.

use thiserror::Error;

pub const MISSING_CODE_MESSAGE: &str = "No authorization code received";
pub const STATE_REJECTED_MESSAGE: &str = "Invalid or expired OAuth state";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OAuthError {
    /// The user or TikTok declined the authorization request
    #[error("{description}")]
    ProviderDenied { error: String, description: String },

    /// Redirect arrived with neither `code` nor `error`
    #[error("{}", MISSING_CODE_MESSAGE)]
    MissingCode,

    /// `state` missing, never issued, expired or already redeemed
    #[error("{}", STATE_REJECTED_MESSAGE)]
    StateRejected,

    /// Connection, DNS or timeout failure talking to TikTok
    #[error("{0}")]
    Transport(String),

    /// Body was not JSON or lacked a required field
    #[error("{0}")]
    MalformedResponse(String),

    /// Well-formed error body returned by TikTok
    #[error("{description}")]
    Provider { code: String, description: String },

    #[error("{0}")]
    Configuration(String),
}

impl OAuthError {
    /// Build a denial from the callback's `error` / `error_description` pair
    #[must_use]
    pub fn denied(error: &str, description: Option<&str>) -> Self {
        let description = description
            .filter(|d| !d.is_empty())
            .unwrap_or(error)
            .to_string();
        Self::ProviderDenied {
            error: error.to_string(),
            description,
        }
    }

    /// Build a provider error, falling back to the code when no description was sent
    #[must_use]
    pub fn provider(code: &str, description: Option<&str>) -> Self {
        let description = description
            .filter(|d| !d.is_empty())
            .unwrap_or(code)
            .to_string();
        Self::Provider {
            code: code.to_string(),
            description,
        }
    }

    /// Map a reqwest failure onto the transport or parse bucket
    #[must_use]
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Transport(format!("Request to TikTok timed out: {e}"))
        } else if e.is_decode() {
            Self::MalformedResponse(format!("Invalid response from TikTok: {e}"))
        } else {
            Self::Transport(e.to_string())
        }
    }

    /// Text carried in the `tt_error` handoff parameter
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Short label for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProviderDenied { .. } => "provider_denied",
            Self::MissingCode => "missing_code",
            Self::StateRejected => "state_rejected",
            Self::Transport(_) => "transport",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Provider { .. } => "provider_error",
            Self::Configuration(_) => "configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_prefers_description() {
        let err = OAuthError::denied("access_denied", Some("User denied"));
        assert_eq!(err.user_message(), "User denied");
    }

    #[test]
    fn test_denied_falls_back_to_error_code() {
        assert_eq!(
            OAuthError::denied("access_denied", None).user_message(),
            "access_denied"
        );
        assert_eq!(
            OAuthError::denied("access_denied", Some("")).user_message(),
            "access_denied"
        );
    }

    #[test]
    fn test_provider_error_message() {
        let err = OAuthError::provider("invalid_grant", Some("Authorization code is expired."));
        assert_eq!(err.user_message(), "Authorization code is expired.");
        assert_eq!(err.kind(), "provider_error");

        let bare = OAuthError::provider("invalid_grant", None);
        assert_eq!(bare.user_message(), "invalid_grant");
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(OAuthError::MissingCode.user_message(), MISSING_CODE_MESSAGE);
        assert_eq!(
            OAuthError::StateRejected.user_message(),
            STATE_REJECTED_MESSAGE
        );
    }
}
