//! TikTok login orchestration
//!
//! Ties the authorization request, the state store, the token exchange and
//! the profile lookup together. Every callback produces exactly one
//! [`SessionHandoff`]; no error escapes as a raw HTTP failure.

use crate::oauth::{
    AuthorizationRequest, CallbackKind, OAuthCallback, OAuthError, ProviderProfile, TikTokApi,
    TikTokClient, TokenGrant,
};
use crate::session::{OAuthStateStore, SessionHandoff};
use crate::settings::{KolokoiSettings, TikTokSettings};
use crate::utils::crypto::generate_csrf_token;
use crate::utils::logging::LoggingHelper;
use std::sync::Arc;

pub struct TikTokAuthService {
    api: Arc<dyn TikTokApi>,
    state_store: Arc<OAuthStateStore>,
    settings: TikTokSettings,
}

impl TikTokAuthService {
    #[must_use]
    pub fn new(
        api: Arc<dyn TikTokApi>,
        state_store: Arc<OAuthStateStore>,
        settings: TikTokSettings,
    ) -> Self {
        Self {
            api,
            state_store,
            settings,
        }
    }

    /// Wire the reqwest client and a fresh state store from application settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn from_settings(settings: &KolokoiSettings) -> Result<Self, OAuthError> {
        let client = TikTokClient::new(&settings.tiktok)?;
        Ok(Self::new(
            Arc::new(client),
            Arc::new(OAuthStateStore::from_settings(&settings.oauth_state)),
            settings.tiktok.clone(),
        ))
    }

    #[must_use]
    pub fn settings(&self) -> &TikTokSettings {
        &self.settings
    }

    fn ensure_configured(&self) -> Result<(), OAuthError> {
        if self.settings.is_configured() {
            Ok(())
        } else {
            Err(OAuthError::Configuration(
                "TikTok client credentials are not configured".to_string(),
            ))
        }
    }

    /// Start a login: build TikTok's authorize URL and register its state value
    ///
    /// The state is only stored once the URL has been built.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if credentials are missing or the
    /// authorization endpoint is not a valid URL
    pub fn begin_login(&self) -> Result<String, OAuthError> {
        self.ensure_configured()?;

        let request = AuthorizationRequest::new(&self.settings, generate_csrf_token());
        let url = request.authorization_url(&self.settings.authorization_endpoint)?;
        self.state_store.register(&request.state);
        LoggingHelper::log_authorization_redirect(&self.settings.authorization_endpoint);
        Ok(url)
    }

    /// Run one callback to its terminal handoff
    pub async fn handle_callback(&self, callback: &OAuthCallback) -> SessionHandoff {
        LoggingHelper::log_callback_received(callback);

        match self.complete_callback(callback).await {
            Ok(handoff) => handoff,
            Err(e) => {
                LoggingHelper::log_callback_failed(&e);
                SessionHandoff::failed(&e)
            }
        }
    }

    async fn complete_callback(
        &self,
        callback: &OAuthCallback,
    ) -> Result<SessionHandoff, OAuthError> {
        let (code, state) = match callback.classify() {
            CallbackKind::ProviderError { error, description } => {
                return Err(OAuthError::denied(error, description));
            }
            CallbackKind::MissingCode => return Err(OAuthError::MissingCode),
            CallbackKind::Authorized { code, state } => (code, state),
        };

        self.state_store
            .consume(state.ok_or(OAuthError::StateRejected)?)?;
        self.ensure_configured()?;

        let grant = self.api.exchange_code(code).await?;
        let profile = self.resolve_profile(&grant).await;

        LoggingHelper::log_connected(&profile.provider_user_id, &profile.username_or_fallback());
        Ok(SessionHandoff::connected(&profile, grant.expires_in))
    }

    /// The exchange already succeeded, so a failed lookup only costs profile detail
    async fn resolve_profile(&self, grant: &TokenGrant) -> ProviderProfile {
        match self.api.fetch_profile(&grant.access_token).await {
            Ok(user) => ProviderProfile::from_user(&grant.open_id, &user),
            Err(e) => {
                LoggingHelper::log_profile_degraded(&e);
                ProviderProfile::placeholder(&grant.open_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::TikTokUser;
    use crate::session::ConnectedIdentity;
    use crate::testing::constants::TEST_CODE;
    use crate::testing::mock::MockTikTokApi;
    use crate::testing::TestFixtures;

    fn service_with(api: Arc<MockTikTokApi>) -> (TikTokAuthService, Arc<OAuthStateStore>) {
        let store = Arc::new(OAuthStateStore::new(600));
        let service = TikTokAuthService::new(api, store.clone(), TestFixtures::tiktok_settings());
        (service, store)
    }

    fn authorized(code: &str, state: &str) -> OAuthCallback {
        OAuthCallback {
            code: Some(code.to_string()),
            state: Some(state.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_provider_error_short_circuits() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, _) = service_with(api.clone());

        let handoff = service
            .handle_callback(&OAuthCallback {
                code: Some(TEST_CODE.to_string()),
                error: Some("access_denied".to_string()),
                error_description: Some("User denied".to_string()),
                ..Default::default()
            })
            .await;

        assert_eq!(
            handoff,
            SessionHandoff::Failed {
                error: "User denied".to_string()
            }
        );
        assert_eq!(api.exchange_calls(), 0);
        assert_eq!(api.profile_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_code_makes_no_calls() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, _) = service_with(api.clone());

        let handoff = service.handle_callback(&OAuthCallback::default()).await;

        assert_eq!(
            handoff,
            SessionHandoff::Failed {
                error: "No authorization code received".to_string()
            }
        );
        assert_eq!(api.exchange_calls(), 0);
    }

    #[tokio::test]
    async fn test_unissued_state_is_rejected_before_exchange() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, _) = service_with(api.clone());

        let handoff = service.handle_callback(&authorized(TEST_CODE, "xyz")).await;

        assert_eq!(
            handoff,
            SessionHandoff::Failed {
                error: "Invalid or expired OAuth state".to_string()
            }
        );
        assert_eq!(api.exchange_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_state_is_rejected() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, _) = service_with(api.clone());

        let handoff = service
            .handle_callback(&OAuthCallback {
                code: Some(TEST_CODE.to_string()),
                ..Default::default()
            })
            .await;

        assert!(!handoff.is_connected());
        assert_eq!(api.exchange_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_login() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, store) = service_with(api.clone());
        let state = store.issue();

        let handoff = service.handle_callback(&authorized(TEST_CODE, &state)).await;

        assert_eq!(
            handoff,
            SessionHandoff::Connected(ConnectedIdentity {
                display_name: "Jane Doe".to_string(),
                username: "janedoe".to_string(),
                avatar_url: "https://x/a.png".to_string(),
                open_id: "U1".to_string(),
                expires_in: 86400,
            })
        );
        assert_eq!(api.exchanged_codes(), vec![TEST_CODE.to_string()]);
        assert_eq!(api.profile_tokens(), vec!["T1".to_string()]);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_state_cannot_be_replayed() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, store) = service_with(api.clone());
        let state = store.issue();

        assert!(service
            .handle_callback(&authorized(TEST_CODE, &state))
            .await
            .is_connected());
        assert!(!service
            .handle_callback(&authorized(TEST_CODE, &state))
            .await
            .is_connected());
        assert_eq!(api.exchange_calls(), 1);
    }

    #[tokio::test]
    async fn test_exchange_failure_carries_provider_description() {
        let api = Arc::new(MockTikTokApi::with_results(
            Err(OAuthError::provider(
                "invalid_grant",
                Some("Authorization code is expired."),
            )),
            Ok(TikTokUser::default()),
        ));
        let (service, store) = service_with(api.clone());
        let state = store.issue();

        let handoff = service.handle_callback(&authorized(TEST_CODE, &state)).await;

        assert_eq!(
            handoff,
            SessionHandoff::Failed {
                error: "Authorization code is expired.".to_string()
            }
        );
        assert_eq!(api.profile_calls(), 0);
    }

    #[tokio::test]
    async fn test_profile_failure_degrades_to_placeholder() {
        let api = Arc::new(MockTikTokApi::with_results(
            Ok(MockTikTokApi::default_grant()),
            Err(OAuthError::MalformedResponse("Invalid JSON".to_string())),
        ));
        let (service, store) = service_with(api.clone());
        let state = store.issue();

        let handoff = service.handle_callback(&authorized(TEST_CODE, &state)).await;

        let SessionHandoff::Connected(identity) = handoff else {
            panic!("profile failure must still connect");
        };
        assert_eq!(identity.display_name, "Sandbox User");
        assert_eq!(identity.username, "U1");
        assert_eq!(identity.open_id, "U1");
        assert_eq!(identity.avatar_url, "");
    }

    #[tokio::test]
    async fn test_unconfigured_credentials() {
        let api = Arc::new(MockTikTokApi::successful());
        let store = Arc::new(OAuthStateStore::new(600));
        let service =
            TikTokAuthService::new(api.clone(), store.clone(), TikTokSettings::default());

        assert_eq!(service.begin_login().unwrap_err().kind(), "configuration");
        assert!(store.is_empty());

        let state = store.issue();
        let handoff = service.handle_callback(&authorized(TEST_CODE, &state)).await;
        assert!(!handoff.is_connected());
        assert_eq!(api.exchange_calls(), 0);
    }

    #[test]
    fn test_begin_login_registers_state() {
        let (service, store) = service_with(Arc::new(MockTikTokApi::successful()));

        let url = url::Url::parse(&service.begin_login().unwrap()).unwrap();
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.consume(&state).is_ok());
    }

    #[test]
    fn test_invalid_authorize_endpoint_leaves_no_state() {
        let store = Arc::new(OAuthStateStore::new(600));
        let settings = TikTokSettings {
            authorization_endpoint: "not a url".to_string(),
            ..TestFixtures::tiktok_settings()
        };
        let service =
            TikTokAuthService::new(Arc::new(MockTikTokApi::successful()), store.clone(), settings);

        assert_eq!(service.begin_login().unwrap_err().kind(), "configuration");
        assert!(store.is_empty());
    }
}
