//! tests/channel_tests.rs

use std::sync::{Arc, Mutex};

use actix_rt::test;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};

use super::support::today;
use crate::config::app_config::{AppConfig, SmtpConfig, WhatsAppGatewayConfig};
use crate::errors::{DispatchError, FailureReason};
use crate::models::channel_model::ChannelKind;
use crate::models::customer_model::{Customer, Segment};
use crate::services::delivery_channel::{ChannelRegistry, DeliveryChannel};
use crate::services::email_channel::EmailChannel;
use crate::services::whatsapp_channel::{chat_id_for, WhatsAppChannel};

fn customer(email: &str, phone: &str) -> Customer {
    Customer {
        id: 1,
        name: "Ivan Ivanov".to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        birth_date: today(),
        gender: "male".to_string(),
        last_campaign_at: None,
        segment: Segment::Potential,
    }
}

fn smtp_config() -> SmtpConfig {
    SmtpConfig {
        host: "smtp.example.com".to_string(),
        port: 587,
        username: Some("crm@example.com".to_string()),
        password: Some("secret".to_string()),
        sender: Some("CRM <crm@example.com>".to_string()),
        subject: "New Campaign".to_string(),
    }
}

#[test]
async fn registry_rejects_unknown_and_unconfigured_types() {
    let registry = ChannelRegistry::new();

    assert!(matches!(
        registry.lookup("fax"),
        Err(DispatchError::UnknownChannel(ref t)) if t == "fax"
    ));
    assert!(matches!(
        registry.lookup("email"),
        Err(DispatchError::ChannelNotConfigured(ref t)) if t == "email"
    ));
    // Channel types are matched exactly.
    assert!(matches!(
        registry.lookup("Email"),
        Err(DispatchError::UnknownChannel(_))
    ));
}

#[test]
async fn registry_from_config_only_builds_what_is_configured() {
    let bare = ChannelRegistry::from_config(&AppConfig::default());
    assert!(!bare.contains(ChannelKind::Email));
    assert!(!bare.contains(ChannelKind::WhatsApp));

    let mut config = AppConfig::default();
    config.smtp = smtp_config();
    config.whatsapp = Some(WhatsAppGatewayConfig {
        base_url: "http://gateway:3000".to_string(),
        session_id: "crm".to_string(),
    });
    let full = ChannelRegistry::from_config(&config);

    assert!(full.contains(ChannelKind::Email));
    assert!(full.contains(ChannelKind::WhatsApp));
    assert_eq!(full.lookup("whatsapp").unwrap().kind(), ChannelKind::WhatsApp);
}

#[test]
async fn email_message_is_addressed_to_the_customer() {
    let channel = EmailChannel::from_config(&smtp_config()).unwrap();

    let message = channel
        .build_message(&customer("ivan@example.com", ""), "Spring sale")
        .unwrap();
    let raw = String::from_utf8(message.formatted()).unwrap();

    assert!(raw.contains("ivan@example.com"));
    assert!(raw.contains("Subject: New Campaign"));
    assert!(raw.contains("Spring sale"));
}

#[test]
async fn email_address_problems_are_delivery_failures() {
    let channel = EmailChannel::from_config(&smtp_config()).unwrap();

    assert_eq!(
        channel.build_message(&customer("  ", ""), "hi").unwrap_err(),
        FailureReason::MissingAddress("email")
    );
    assert!(matches!(
        channel.build_message(&customer("not-an-address", ""), "hi"),
        Err(FailureReason::InvalidAddress { ref address, .. }) if address == "not-an-address"
    ));
}

#[test]
async fn email_channel_needs_a_sender() {
    let mut config = smtp_config();
    config.sender = None;
    assert!(EmailChannel::from_config(&config).is_err());
}

#[test]
async fn chat_ids_are_built_from_phone_digits() {
    assert_eq!(chat_id_for("+7 (900) 123-45-67").as_deref(), Some("79001234567@c.us"));
    assert_eq!(chat_id_for("n/a"), None);
}

#[derive(Clone, Default)]
struct Received(Arc<Mutex<Vec<(String, Value)>>>);

async fn fake_send_message(
    path: web::Path<String>,
    body: web::Json<Value>,
    received: web::Data<Received>,
) -> HttpResponse {
    let payload = body.into_inner();
    let rejected = payload["chatId"]
        .as_str()
        .map(|id| id.starts_with("000"))
        .unwrap_or(true);
    received.0.lock().unwrap().push((path.into_inner(), payload));

    if rejected {
        HttpResponse::InternalServerError().body("session not connected")
    } else {
        HttpResponse::Ok().json(json!({ "success": true }))
    }
}

#[test]
async fn whatsapp_channel_posts_to_the_gateway() {
    let received = Received::default();
    let shared = received.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(shared.clone()))
            .route(
                "/client/sendMessage/{session}",
                web::post().to(fake_send_message),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let channel = WhatsAppChannel::new(&WhatsAppGatewayConfig {
        base_url: format!("http://{addr}"),
        session_id: "crm".to_string(),
    });

    channel
        .attempt(&customer("", "+7 900 123 45 67"), "Spring sale")
        .await
        .unwrap();
    let rejected = channel
        .attempt(&customer("", "000111"), "Spring sale")
        .await
        .unwrap_err();
    let missing = channel
        .attempt(&customer("", ""), "Spring sale")
        .await
        .unwrap_err();

    assert!(matches!(rejected, FailureReason::Transport(ref m) if m.contains("session not connected")));
    assert_eq!(missing, FailureReason::MissingAddress("phone"));

    let calls = received.0.lock().unwrap().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "crm");
    assert_eq!(
        calls[0].1,
        json!({ "chatId": "79001234567@c.us", "contentType": "string", "content": "Spring sale" })
    );

    handle.stop(true).await;
}
