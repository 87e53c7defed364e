//! HTTP client for the two TikTok calls made during a callback

use crate::oauth::profile::parse_user_info;
use crate::oauth::provider::{GRANT_TYPE_AUTHORIZATION_CODE, PROFILE_FIELDS};
use crate::oauth::token_exchange::parse_token_response;
use crate::oauth::{OAuthError, TikTokUser, TokenGrant};
use crate::settings::TikTokSettings;
use crate::utils::logging::LoggingHelper;
use async_trait::async_trait;
use std::time::Duration;

/// The outbound side of the login flow
#[async_trait]
pub trait TikTokApi: Send + Sync {
    /// Exchange an authorization code for an access token
    ///
    /// # Errors
    ///
    /// Returns `Transport`, `MalformedResponse` or `Provider` as classified
    /// from the token endpoint's response
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError>;

    /// Fetch the authenticated user's public profile
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure and `MalformedResponse` or
    /// `Provider` for unusable bodies
    async fn fetch_profile(&self, access_token: &str) -> Result<TikTokUser, OAuthError>;
}

/// reqwest-backed implementation talking to `open.tiktokapis.com`
#[derive(Clone)]
pub struct TikTokClient {
    settings: TikTokSettings,
    http_client: reqwest::Client,
}

impl TikTokClient {
    /// Create a client with bounded request and connect timeouts
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn new(settings: &TikTokSettings) -> Result<Self, OAuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds.max(1)))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds.max(1)))
            .build()
            .map_err(|e| OAuthError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            settings: settings.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl TikTokApi for TikTokClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError> {
        let params = [
            ("client_key", self.settings.client_key.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("code", code),
            ("grant_type", GRANT_TYPE_AUTHORIZATION_CODE),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
        ];

        LoggingHelper::log_token_exchange_start(&self.settings.token_endpoint);
        let response = self
            .http_client
            .post(&self.settings.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| OAuthError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuthError::from_reqwest(&e))?;
        LoggingHelper::log_provider_response("token", status, body.len());

        parse_token_response(status, &body)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<TikTokUser, OAuthError> {
        let response = self
            .http_client
            .get(&self.settings.userinfo_endpoint)
            .query(&[("fields", PROFILE_FIELDS)])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuthError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuthError::from_reqwest(&e))?;
        LoggingHelper::log_provider_response("user info", status, body.len());

        parse_user_info(status, &body)
    }
}
