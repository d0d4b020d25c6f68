//! handlers/statistics_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::services::statistics_service::StatisticsService;

/// GET /api/statistics
pub async fn get_statistics_endpoint(statistics: web::Data<StatisticsService>) -> HttpResponse {
    match statistics.compute().await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            log::error!("(get_statistics_endpoint) Error al calcular estadísticas: {:#}", e);
            HttpResponse::InternalServerError().json(json!({ "error": format!("{:#}", e) }))
        }
    }
}
