//! TikTok Login Kit constants and the authorization request sent to the browser

use crate::oauth::OAuthError;
use crate::settings::TikTokSettings;
use std::collections::BTreeSet;

pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

/// Profile fields requested from the user-info endpoint
pub const PROFILE_FIELDS: &str = "open_id,union_id,avatar_url,display_name,username";

/// A single login attempt, built fresh for every visit to the login route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub client_key: String,
    pub scopes: BTreeSet<String>,
    pub redirect_uri: String,
    pub state: String,
}

impl AuthorizationRequest {
    #[must_use]
    pub fn new(settings: &TikTokSettings, state: String) -> Self {
        Self {
            client_key: settings.client_key.clone(),
            scopes: settings.scopes.iter().cloned().collect(),
            redirect_uri: settings.redirect_uri.clone(),
            state,
        }
    }

    /// Build the provider URL the browser is sent to
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the authorization endpoint is not a valid URL
    pub fn authorization_url(&self, authorization_endpoint: &str) -> Result<String, OAuthError> {
        let mut url = url::Url::parse(authorization_endpoint).map_err(|e| {
            OAuthError::Configuration(format!("Invalid TikTok authorization endpoint: {e}"))
        })?;

        // TikTok expects a comma separated scope list
        let scope = self.scopes.iter().map(String::as_str).collect::<Vec<_>>().join(",");

        url.query_pairs_mut()
            .append_pair("client_key", &self.client_key)
            .append_pair("scope", &scope)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", &self.state);

        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TikTokSettings {
        TikTokSettings {
            client_key: "sbawkey".to_string(),
            client_secret: "secret".to_string(),
            scopes: vec![
                "video.list".to_string(),
                "user.info.basic".to_string(),
                "user.info.basic".to_string(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_authorization_url_parameters() {
        let request = AuthorizationRequest::new(&settings(), "st4te".to_string());
        let url = request
            .authorization_url("https://www.tiktok.com/v2/auth/authorize/")
            .unwrap();
        let parsed = url::Url::parse(&url).unwrap();

        assert_eq!(parsed.host_str(), Some("www.tiktok.com"));
        assert_eq!(parsed.path(), "/v2/auth/authorize/");

        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("client_key".to_string(), "sbawkey".to_string()),
                ("scope".to_string(), "user.info.basic,video.list".to_string()),
                ("response_type".to_string(), "code".to_string()),
                (
                    "redirect_uri".to_string(),
                    "http://localhost:3000/api/tiktok/callback".to_string()
                ),
                ("state".to_string(), "st4te".to_string()),
            ]
        );
    }

    #[test]
    fn test_scopes_are_deduplicated() {
        let request = AuthorizationRequest::new(&settings(), "s".to_string());
        assert_eq!(request.scopes.len(), 2);
    }

    #[test]
    fn test_invalid_endpoint_is_configuration_error() {
        let request = AuthorizationRequest::new(&settings(), "s".to_string());
        let err = request.authorization_url("not a url").unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }
}
