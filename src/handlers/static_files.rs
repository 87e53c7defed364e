use crate::models::HealthResponse;
use crate::settings::KolokoiSettings;
use crate::utils::responses::ResponseBuilder;
use actix_web::{web, HttpResponse, Result};
use log::debug;
use std::fs;
use std::path::{Component, Path};

/// Health check endpoint
///
/// # Errors
/// Returns an error if health status cannot be determined
pub async fn health() -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: "KOLoKOI TikTok connector is running".to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Serve the dashboard entry page
///
/// # Errors
/// Returns an error if the response cannot be built
pub async fn serve_index(settings: web::Data<KolokoiSettings>) -> Result<HttpResponse> {
    Ok(read_asset(&settings.static_files.assets_folder, "index.html"))
}

/// Serve static files from the configured static directory
///
/// # Errors
///
/// Returns an error if the response cannot be built. Missing files map to
/// `404` and traversal attempts to `400`.
pub async fn serve_static(
    path: web::Path<String>,
    settings: web::Data<KolokoiSettings>,
) -> Result<HttpResponse> {
    let filename = path.into_inner();

    if !is_safe_relative_path(&filename) {
        debug!("Rejected static file path: {filename}");
        return Ok(ResponseBuilder::invalid_path());
    }

    Ok(read_asset(&settings.static_files.assets_folder, &filename))
}

fn is_safe_relative_path(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('\\')
        && Path::new(filename)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

fn read_asset(assets_folder: &str, filename: &str) -> HttpResponse {
    let file_path = format!("{assets_folder}/{filename}");

    debug!("Attempting to serve static file: {file_path}");

    fs::read(&file_path).map_or_else(
        |_| {
            debug!("Static file not found: {file_path}");
            ResponseBuilder::not_found()
        },
        |contents| {
            HttpResponse::Ok()
                .content_type(content_type_for(&file_path))
                .body(contents)
        },
    )
}

fn content_type_for(file_path: &str) -> &'static str {
    match file_path.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "text/plain",
    }
}
