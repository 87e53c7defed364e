//! Test fixtures providing pre-built settings and TikTok payloads

use crate::oauth::{TikTokUser, TokenGrant};
use crate::settings::{KolokoiSettings, TikTokSettings};
use std::net::TcpListener;

use super::constants::{
    TEST_ACCESS_TOKEN, TEST_CLIENT_KEY, TEST_CLIENT_SECRET, TEST_EXPIRES_IN, TEST_OPEN_ID,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Configured TikTok settings pointing at an unroutable host
    #[must_use]
    pub fn tiktok_settings() -> TikTokSettings {
        Self::tiktok_settings_for("http://127.0.0.1:9")
    }

    /// Configured TikTok settings whose API endpoints live under `base_url`
    #[must_use]
    pub fn tiktok_settings_for(base_url: &str) -> TikTokSettings {
        TikTokSettings {
            client_key: TEST_CLIENT_KEY.to_string(),
            client_secret: TEST_CLIENT_SECRET.to_string(),
            redirect_uri: "http://localhost:3000/api/tiktok/callback".to_string(),
            token_endpoint: format!("{base_url}/v2/oauth/token/"),
            userinfo_endpoint: format!("{base_url}/v2/user/info/"),
            request_timeout_seconds: 2,
            connect_timeout_seconds: 1,
            ..TikTokSettings::default()
        }
    }

    /// Full application settings for a mock TikTok server at `base_url`
    #[must_use]
    pub fn settings_for(base_url: &str) -> KolokoiSettings {
        KolokoiSettings {
            tiktok: Self::tiktok_settings_for(base_url),
            ..KolokoiSettings::default()
        }
    }

    /// A bound listener that completes the TCP handshake but never answers
    ///
    /// Returns the listener, which must stay alive for the test, and its base URL.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound
    #[must_use]
    pub fn silent_endpoint() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        (listener, base_url)
    }

    #[must_use]
    pub fn token_grant() -> TokenGrant {
        TokenGrant {
            access_token: TEST_ACCESS_TOKEN.to_string(),
            open_id: TEST_OPEN_ID.to_string(),
            expires_in: Some(TEST_EXPIRES_IN),
        }
    }

    #[must_use]
    pub fn jane_doe() -> TikTokUser {
        TikTokUser {
            open_id: Some(TEST_OPEN_ID.to_string()),
            union_id: None,
            avatar_url: Some("https://x/a.png".to_string()),
            display_name: Some("Jane Doe".to_string()),
            username: Some("janedoe".to_string()),
        }
    }

    /// Token endpoint success body
    #[must_use]
    pub fn token_body() -> String {
        format!(
            r#"{{"access_token":"{TEST_ACCESS_TOKEN}","open_id":"{TEST_OPEN_ID}","expires_in":{TEST_EXPIRES_IN},"token_type":"Bearer","scope":"user.info.basic"}}"#
        )
    }

    /// User-info success body for Jane Doe
    #[must_use]
    pub fn profile_body() -> &'static str {
        r#"{"data":{"user":{"display_name":"Jane Doe","username":"janedoe","avatar_url":"https://x/a.png"}},"error":{"code":"ok","message":""}}"#
    }
}
