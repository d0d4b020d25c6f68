//! handlers/root_handler.rs
use actix_web::HttpResponse;
use serde_json::json;

/// GET / y GET /api/
pub async fn api_root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Welcome to the CRM API" }))
}

/// Respuesta para cualquier ruta no registrada.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "Not found",
        "message": "Requested resource not found"
    }))
}
