//! Parsing of the TikTok token endpoint response

use crate::oauth::OAuthError;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};

/// Successful authorization-code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub open_id: String,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    open_id: Option<String>,
    sub: Option<String>,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    expires_in: Option<u64>,
    error: Option<String>,
    error_description: Option<String>,
}

// Some sandbox responses send `expires_in` as a string
fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Seconds>::deserialize(deserializer)? {
        Some(Seconds::Number(n)) => Some(n),
        Some(Seconds::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Turn a raw token endpoint response into a grant or a classified error
///
/// # Errors
///
/// - `Provider` when the body carries an `error` field or the status is not 2xx
/// - `MalformedResponse` when the body is not JSON or has no `access_token`
pub fn parse_token_response(status: StatusCode, body: &str) -> Result<TokenGrant, OAuthError> {
    let response: TokenResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) if status.is_success() => {
            return Err(OAuthError::MalformedResponse(format!(
                "Invalid JSON from TikTok token endpoint: {e}"
            )));
        }
        Err(_) => {
            return Err(OAuthError::provider(
                status.as_str(),
                Some(&format!("TikTok token endpoint returned status {status}")),
            ));
        }
    };

    if let Some(error) = response.error.as_deref().filter(|e| !e.is_empty()) {
        return Err(OAuthError::provider(
            error,
            response.error_description.as_deref(),
        ));
    }

    if !status.is_success() {
        return Err(OAuthError::provider(
            status.as_str(),
            Some(&format!("TikTok token endpoint returned status {status}")),
        ));
    }

    let access_token = response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            OAuthError::MalformedResponse("Token response missing access_token".to_string())
        })?;

    Ok(TokenGrant {
        access_token,
        open_id: response
            .open_id
            .filter(|id| !id.is_empty())
            .or(response.sub)
            .unwrap_or_default(),
        expires_in: response.expires_in,
    })
}
