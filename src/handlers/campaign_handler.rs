//! handlers/campaign_handler.rs
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{
    models::campaign_model::{CreateCampaignRequest, CreateCampaignResponse},
    services::campaign_dispatcher::CampaignDispatcher,
};

/// Header que fija la capa de autenticación una vez validado el usuario.
pub const CALLER_HEADER: &str = "X-Authenticated-User";

/// POST /api/campaigns
pub async fn create_campaign_endpoint(
    dispatcher: web::Data<CampaignDispatcher>,
    req: HttpRequest,
    body: web::Json<CreateCampaignRequest>,
) -> HttpResponse {
    let caller = req
        .headers()
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let campaign = body.into_inner();

    log::info!(
        "(create_campaign_endpoint) Campaña solicitada por {}: type={}, {} destinatarios",
        caller,
        campaign.channel_type,
        campaign.clients.len()
    );

    match dispatcher
        .dispatch(&campaign.channel_type, &campaign.message, &campaign.clients)
        .await
    {
        Ok(result) => HttpResponse::Created().json(CreateCampaignResponse::from(result)),
        Err(e) => {
            log::error!("(create_campaign_endpoint) Error al crear la campaña: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}
