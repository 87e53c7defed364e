//! TikTok user-info parsing and the placeholder identity used when it is incomplete

use crate::oauth::OAuthError;
use reqwest::StatusCode;
use serde::Deserialize;

pub const SANDBOX_DISPLAY_NAME: &str = "Sandbox User";
pub const SANDBOX_USERNAME: &str = "sandbox_user";

/// The `data.user` object; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TikTokUser {
    pub open_id: Option<String>,
    pub union_id: Option<String>,
    pub avatar_url: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserInfoResponse {
    data: Option<UserInfoData>,
    error: Option<UserInfoError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserInfoData {
    user: Option<TikTokUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserInfoError {
    code: Option<String>,
    message: Option<String>,
}

/// Parse the user-info body. Absent objects yield an empty user.
///
/// # Errors
///
/// - `MalformedResponse` if the body is not JSON of the expected shape
/// - `Provider` if TikTok reports an error code other than `ok`
pub fn parse_user_info(status: StatusCode, body: &str) -> Result<TikTokUser, OAuthError> {
    let response: UserInfoResponse = serde_json::from_str(body).map_err(|e| {
        if status.is_success() {
            OAuthError::MalformedResponse(format!("Invalid JSON from TikTok user info: {e}"))
        } else {
            OAuthError::provider(
                status.as_str(),
                Some(&format!("TikTok user info returned status {status}")),
            )
        }
    })?;

    if let Some(error) = response.error {
        let code = error.code.unwrap_or_default();
        if !code.is_empty() && code != "ok" {
            return Err(OAuthError::provider(&code, error.message.as_deref()));
        }
    }

    Ok(response.data.and_then(|d| d.user).unwrap_or_default())
}

/// Identity resolved for one login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_user_id: String,
    pub display_name: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

fn filled(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

impl ProviderProfile {
    /// Merge the token's `open_id` with whatever the user-info call returned
    #[must_use]
    pub fn from_user(open_id: &str, user: &TikTokUser) -> Self {
        let provider_user_id = if open_id.is_empty() {
            user.open_id.clone().unwrap_or_default()
        } else {
            open_id.to_string()
        };

        Self {
            provider_user_id,
            display_name: filled(user.display_name.as_ref())
                .unwrap_or_else(|| SANDBOX_DISPLAY_NAME.to_string()),
            username: filled(user.username.as_ref()),
            avatar_url: filled(user.avatar_url.as_ref()),
        }
    }

    /// Used when the profile call failed after a successful exchange
    #[must_use]
    pub fn placeholder(open_id: &str) -> Self {
        Self::from_user(open_id, &TikTokUser::default())
    }

    /// Username shown in the dashboard, never empty
    #[must_use]
    pub fn username_or_fallback(&self) -> String {
        self.username.clone().unwrap_or_else(|| {
            if self.provider_user_id.is_empty() {
                SANDBOX_USERNAME.to_string()
            } else {
                self.provider_user_id.clone()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_user() {
        let user = parse_user_info(
            StatusCode::OK,
            r#"{"data":{"user":{"open_id":"U1","union_id":"UN1","display_name":"Jane Doe","username":"janedoe","avatar_url":"https://x/a.png"}},"error":{"code":"ok","message":"","log_id":"l"}}"#,
        )
        .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Jane Doe"));
        assert_eq!(user.union_id.as_deref(), Some("UN1"));
    }

    #[test]
    fn test_empty_objects_default() {
        assert_eq!(
            parse_user_info(StatusCode::OK, "{}").unwrap(),
            TikTokUser::default()
        );
        assert_eq!(
            parse_user_info(StatusCode::OK, r#"{"data":null}"#).unwrap(),
            TikTokUser::default()
        );
        assert_eq!(
            parse_user_info(StatusCode::OK, r#"{"data":{"user":{"display_name":null}}}"#).unwrap(),
            TikTokUser::default()
        );
    }

    #[test]
    fn test_provider_error_code() {
        let err = parse_user_info(
            StatusCode::UNAUTHORIZED,
            r#"{"data":{},"error":{"code":"access_token_invalid","message":"The access token is invalid or not found in the request."}}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "provider_error");
    }

    #[test]
    fn test_non_json_body() {
        let err = parse_user_info(StatusCode::OK, "<html>").unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[test]
    fn test_profile_fallbacks() {
        let profile = ProviderProfile::placeholder("U1");
        assert_eq!(profile.display_name, SANDBOX_DISPLAY_NAME);
        assert_eq!(profile.username_or_fallback(), "U1");
        assert_eq!(profile.avatar_url, None);

        let anonymous = ProviderProfile::placeholder("");
        assert_eq!(anonymous.username_or_fallback(), SANDBOX_USERNAME);
    }

    #[test]
    fn test_blank_fields_fall_back() {
        let user = TikTokUser {
            display_name: Some("  ".to_string()),
            username: Some(String::new()),
            open_id: Some("U2".to_string()),
            ..Default::default()
        };
        let profile = ProviderProfile::from_user("", &user);
        assert_eq!(profile.provider_user_id, "U2");
        assert_eq!(profile.display_name, SANDBOX_DISPLAY_NAME);
        assert_eq!(profile.username_or_fallback(), "U2");
    }
}
