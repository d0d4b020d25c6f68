//! app.rs
use actix_web::{error, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::handlers::{campaign_handler, root_handler, statistics_handler};

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(root_handler::api_root))
        .service(
            web::scope("/api")
                .route("/", web::get().to(root_handler::api_root))
                .route(
                    "/campaigns",
                    web::post().to(campaign_handler::create_campaign_endpoint),
                )
                .route(
                    "/statistics",
                    web::get().to(statistics_handler::get_statistics_endpoint),
                ),
        );
}

/// Un body JSON mal formado o incompleto se reporta como cualquier otro
/// error de validación: 500 con un mensaje en `error`.
fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    log::warn!("JSON rechazado en {}: {}", req.path(), message);
    error::InternalError::from_response(
        err,
        HttpResponse::InternalServerError().json(json!({ "error": message })),
    )
    .into()
}
