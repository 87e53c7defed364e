// Centralized logging for the TikTok login flow; tokens and secrets never reach the log
use crate::oauth::{OAuthCallback, OAuthError};
use crate::settings::KolokoiSettings;
use log::{debug, info, warn};
use reqwest::StatusCode;

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log the shape of an incoming callback without its code or state
    pub fn log_callback_received(callback: &OAuthCallback) {
        debug!(
            "TikTok callback received: code={}, state={}, error={:?}",
            if callback.code.is_some() { "present" } else { "missing" },
            if callback.state.is_some() { "present" } else { "missing" },
            callback.error
        );
    }

    /// Log TikTok credential status at startup
    pub fn log_provider_init(settings: &KolokoiSettings) {
        if settings.tiktok.is_configured() {
            info!(
                "✅ TikTok Login Kit configured (client key {})",
                settings.tiktok.client_key_preview()
            );
        } else {
            warn!("❌ TikTok Login Kit not configured - set TIKTOK_CLIENT_KEY and TIKTOK_CLIENT_SECRET");
        }
    }

    /// Log the redirect to TikTok's authorize page
    pub fn log_authorization_redirect(authorize_endpoint: &str) {
        info!("→ Redirecting to TikTok OAuth at {authorize_endpoint}");
    }

    /// Log token exchange start
    pub fn log_token_exchange_start(token_endpoint: &str) {
        info!("🔄 Exchanging TikTok authorization code at {token_endpoint}");
    }

    /// Log status and size of a provider response
    pub fn log_provider_response(call: &str, status: StatusCode, body_len: usize) {
        debug!("TikTok {call} response: status={status}, {body_len} bytes");
    }

    /// Log a terminal failure of the callback
    pub fn log_callback_failed(error: &OAuthError) {
        warn!("TikTok callback failed ({}): {error}", error.kind());
    }

    /// Log that the profile could not be resolved and placeholders were used
    pub fn log_profile_degraded(error: &OAuthError) {
        warn!(
            "TikTok profile fetch failed ({}), continuing with placeholder identity: {error}",
            error.kind()
        );
    }

    /// Log a successful connection
    pub fn log_connected(open_id: &str, username: &str) {
        info!("✓ TikTok account connected: {username} (open_id {open_id})");
    }
}
