//! Mock objects and fake implementations for testing
//!
//! [`MockTikTokApi`] returns canned results and records every call, so tests
//! can assert which outbound requests a callback would have made.

use crate::oauth::{OAuthError, TikTokApi, TikTokUser, TokenGrant};
use async_trait::async_trait;
use std::sync::Mutex;

use super::TestFixtures;

pub struct MockTikTokApi {
    token_result: Result<TokenGrant, OAuthError>,
    profile_result: Result<TikTokUser, OAuthError>,
    exchanged_codes: Mutex<Vec<String>>,
    profile_tokens: Mutex<Vec<String>>,
}

impl MockTikTokApi {
    #[must_use]
    pub fn with_results(
        token_result: Result<TokenGrant, OAuthError>,
        profile_result: Result<TikTokUser, OAuthError>,
    ) -> Self {
        Self {
            token_result,
            profile_result,
            exchanged_codes: Mutex::new(Vec::new()),
            profile_tokens: Mutex::new(Vec::new()),
        }
    }

    /// Exchange and profile lookup both succeed for Jane Doe
    #[must_use]
    pub fn successful() -> Self {
        Self::with_results(Ok(Self::default_grant()), Ok(TestFixtures::jane_doe()))
    }

    #[must_use]
    pub fn default_grant() -> TokenGrant {
        TestFixtures::token_grant()
    }

    /// Codes passed to `exchange_code`, in call order
    ///
    /// # Panics
    ///
    /// Panics if the recording mutex was poisoned by another test thread
    #[must_use]
    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes.lock().unwrap().clone()
    }

    /// Access tokens passed to `fetch_profile`, in call order
    ///
    /// # Panics
    ///
    /// Panics if the recording mutex was poisoned by another test thread
    #[must_use]
    pub fn profile_tokens(&self) -> Vec<String> {
        self.profile_tokens.lock().unwrap().clone()
    }

    #[must_use]
    pub fn exchange_calls(&self) -> usize {
        self.exchanged_codes().len()
    }

    #[must_use]
    pub fn profile_calls(&self) -> usize {
        self.profile_tokens().len()
    }
}

#[async_trait]
impl TikTokApi for MockTikTokApi {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError> {
        self.exchanged_codes.lock().unwrap().push(code.to_string());
        self.token_result.clone()
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<TikTokUser, OAuthError> {
        self.profile_tokens
            .lock()
            .unwrap()
            .push(access_token.to_string());
        self.profile_result.clone()
    }
}
