//! HTTP response helpers
//!
//! Consistent shapes for the redirects issued by the OAuth routes and the
//! JSON error bodies returned by the static file routes.

use crate::session::SessionHandoff;
use actix_web::{http::header, HttpResponse};
use serde_json::json;

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// `302 Found` to the given location
    #[must_use]
    pub fn redirect(location: &str) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }

    /// Redirect to the dashboard carrying a session handoff
    #[must_use]
    pub fn handoff_redirect(frontend_path: &str, handoff: &SessionHandoff) -> HttpResponse {
        Self::redirect(&handoff.redirect_location(frontend_path))
    }

    #[must_use]
    pub fn not_found() -> HttpResponse {
        HttpResponse::NotFound().json(json!({
            "error": "not_found",
            "message": "File not found"
        }))
    }

    #[must_use]
    pub fn invalid_path() -> HttpResponse {
        HttpResponse::BadRequest().json(json!({
            "error": "bad_request",
            "message": "Invalid request path. Path traversal is not allowed."
        }))
    }
}
