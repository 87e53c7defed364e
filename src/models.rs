use serde::{Deserialize, Serialize};

use crate::settings::TikTokSettings;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Diagnostics returned by `/api/tiktok/status`; never carries the secret
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TikTokStatusResponse {
    pub configured: bool,
    pub client_key_preview: String,
    pub redirect_uri: String,
    pub sandbox: bool,
    pub available_scopes: Vec<String>,
}

impl From<&TikTokSettings> for TikTokStatusResponse {
    fn from(settings: &TikTokSettings) -> Self {
        Self {
            configured: settings.is_configured(),
            client_key_preview: settings.client_key_preview(),
            redirect_uri: settings.redirect_uri.clone(),
            sandbox: settings.sandbox,
            available_scopes: settings.scopes.clone(),
        }
    }
}
