// HTTP request handlers for the TikTok connector
pub mod static_files;
pub mod tiktok;

use actix_web::web;

// Re-export the main handler functions
pub use static_files::{health, serve_index, serve_static};
pub use tiktok::{tiktok_callback, tiktok_login, tiktok_status};

/// Register every route served by the connector
///
/// Expects `web::Data<TikTokAuthService>` and `web::Data<KolokoiSettings>`
/// to be registered on the app.
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg
        // TikTok Login Kit endpoints
        .route("/api/tiktok/login", web::get().to(tiktok_login))
        .route("/api/tiktok/callback", web::get().to(tiktok_callback))
        .route("/api/tiktok/status", web::get().to(tiktok_status))
        // Health endpoint
        .route("/ping", web::get().to(health))
        // Dashboard front end
        .route("/", web::get().to(serve_index))
        .route("/{filename:.*}", web::get().to(serve_static));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TikTokStatusResponse;
    use crate::oauth::TikTokAuthService;
    use crate::session::OAuthStateStore;
    use crate::settings::{KolokoiSettings, TikTokSettings};
    use crate::testing::mock::MockTikTokApi;
    use crate::testing::TestFixtures;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use std::sync::Arc;

    fn app_data(
        tiktok: TikTokSettings,
        api: Arc<MockTikTokApi>,
    ) -> (web::Data<TikTokAuthService>, web::Data<KolokoiSettings>) {
        let settings = KolokoiSettings {
            tiktok: tiktok.clone(),
            ..KolokoiSettings::default()
        };
        let service =
            TikTokAuthService::new(api, Arc::new(OAuthStateStore::new(600)), tiktok);
        (web::Data::new(service), web::Data::new(settings))
    }

    #[actix_web::test]
    async fn test_callback_with_provider_error_redirects() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, settings) = app_data(TestFixtures::tiktok_settings(), api.clone());
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(settings)
                .configure(configure_services),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/tiktok/callback?error=access_denied&error_description=User%20denied")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/index.html?tt_error=User%20denied"
        );
        assert_eq!(api.exchange_calls(), 0);
    }

    #[actix_web::test]
    async fn test_login_without_credentials_redirects_with_error() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, settings) = app_data(TikTokSettings::default(), api);
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(settings)
                .configure(configure_services),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/tiktok/login")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert!(location.starts_with("/index.html?tt_error="));
    }

    #[actix_web::test]
    async fn test_status_reports_preview() {
        let api = Arc::new(MockTikTokApi::successful());
        let (service, settings) = app_data(TestFixtures::tiktok_settings(), api);
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(settings)
                .configure(configure_services),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/tiktok/status")
            .to_request();
        let status: TikTokStatusResponse = test::call_and_read_body_json(&app, req).await;

        assert!(status.configured);
        assert_eq!(status.client_key_preview, "sbawtest...");
        assert!(status.sandbox);
    }
}
