#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use kolokoi::{
    configure_services, settings::KolokoiSettings, utils::logging::LoggingHelper,
    TikTokAuthService, VERSION,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = KolokoiSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    LoggingHelper::log_provider_init(&settings);

    let auth_service = TikTokAuthService::from_settings(&settings).map_err(|e| {
        std::io::Error::other(format!("Failed to initialize TikTok client: {e}"))
    })?;

    start_server(auth_service, settings).await
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(
    auth_service: TikTokAuthService,
    settings: KolokoiSettings,
) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    // One service instance so every worker shares the same state store
    let auth_service = web::Data::new(auth_service);
    let cors_origins = settings.get_cors_origins();

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["Content-Type", "Accept"])
            .max_age(3600);

        App::new()
            .app_data(auth_service.clone())
            .app_data(web::Data::new(settings.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &KolokoiSettings) {
    println!("Starting KOLoKOI TikTok connector v{VERSION} on http://{bind_address}");
    println!();
    println!("TikTok endpoints:");
    println!("  GET  /api/tiktok/login    - Redirect to TikTok authorization");
    println!("  GET  /api/tiktok/callback - OAuth callback, redirects to the dashboard");
    println!("  GET  /api/tiktok/status   - Credential diagnostics");
    println!();
    println!("OAuth callback URL registered with TikTok:");
    println!("  {}", settings.tiktok.redirect_uri);
    println!();
    println!("System endpoints:");
    println!("  GET  /ping - Health check");
    println!("  GET  /     - Dashboard ({})", settings.application.frontend_path);
    println!(
        "  Static files folder: {}",
        settings.static_files.assets_folder
    );
}
