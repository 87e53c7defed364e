// TikTok Login Kit handlers: login, callback and status probe
use crate::models::TikTokStatusResponse;
use crate::oauth::{OAuthCallback, TikTokAuthService};
use crate::session::SessionHandoff;
use crate::settings::KolokoiSettings;
use crate::utils::responses::ResponseBuilder;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::error;

/// Start the TikTok OAuth flow
///
/// Redirects to TikTok's authorize page, or back to the dashboard with
/// `tt_error` when the flow cannot start.
///
/// # Errors
/// Never fails; every outcome is a redirect
pub async fn tiktok_login(
    auth_service: web::Data<TikTokAuthService>,
    settings: web::Data<KolokoiSettings>,
) -> Result<HttpResponse> {
    match auth_service.begin_login() {
        Ok(auth_url) => Ok(ResponseBuilder::redirect(&auth_url)),
        Err(e) => {
            error!("Failed to start TikTok login: {e}");
            Ok(ResponseBuilder::handoff_redirect(
                &settings.application.frontend_path,
                &SessionHandoff::failed(&e),
            ))
        }
    }
}

/// TikTok OAuth callback handler
///
/// The query string is read by hand so a malformed or repeated parameter
/// still ends in a handoff redirect.
///
/// # Errors
/// Never fails; every outcome is a redirect to the dashboard
pub async fn tiktok_callback(
    req: HttpRequest,
    auth_service: web::Data<TikTokAuthService>,
    settings: web::Data<KolokoiSettings>,
) -> Result<HttpResponse> {
    let callback = OAuthCallback::from_query(req.query_string());
    let handoff = auth_service.handle_callback(&callback).await;
    Ok(ResponseBuilder::handoff_redirect(
        &settings.application.frontend_path,
        &handoff,
    ))
}

/// Credential diagnostics for the dashboard's "Check Status" button
///
/// # Errors
/// Never fails
pub async fn tiktok_status(auth_service: web::Data<TikTokAuthService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(TikTokStatusResponse::from(auth_service.settings())))
}
