use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::app_config::AppConfig;
use crate::handlers::root_handler;
use crate::logger::init_logger;
use crate::services::campaign_dispatcher::CampaignDispatcher;
use crate::services::campaign_service::{CampaignService, CampaignStore};
use crate::services::customer_service::{CustomerService, CustomerStore};
use crate::services::delivery_channel::ChannelRegistry;
use crate::services::seed_service::seed_demo_data;
use crate::services::statistics_service::StatisticsService;

mod app;
mod config;
mod errors;
mod handlers;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

/// Abre el pool de SQLite, creando el archivo (y su carpeta) si hace falta.
pub(crate) async fn setup_database(database_url: &str) -> Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL {database_url}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    if let Some(dir) = database_dir(database_url) {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Could not create directory {}", dir.display()))?;
    }

    log::info!("Conectando a SQLite en {}", database_url);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Could not connect to the SQLite database")
}

/// Carpeta del archivo de la base SQLite, si la URL apunta a uno.
fn database_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//")
        .split('?')
        .next()
        .unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    init_logger();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db_pool = setup_database(&config.database_url)
        .await
        .expect("Could not open the database");

    let customer_service = CustomerService::new(db_pool.clone());
    if let Err(e) = customer_service.run_migrations().await {
        panic!("Migrations failed: {:?}", e);
    }
    let campaign_service = CampaignService::new(db_pool.clone());

    let customers: Arc<dyn CustomerStore> = Arc::new(customer_service);
    let campaigns: Arc<dyn CampaignStore> = Arc::new(campaign_service);

    if config.seed_demo_data {
        if let Err(e) = seed_demo_data(customers.as_ref(), campaigns.as_ref()).await {
            log::error!("No se pudieron crear los datos de demo: {:#}", e);
        }
    }

    let dispatcher = CampaignDispatcher::new(
        ChannelRegistry::from_config(&config),
        customers.clone(),
        campaigns.clone(),
        config.delivery_timeout(),
    );
    let statistics = StatisticsService::new(customers, campaigns);

    log::info!(
        "Iniciando servidor en {}:{}",
        config.bind_host,
        config.bind_port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(dispatcher.clone()))
            .app_data(web::Data::new(statistics.clone()))
            .configure(app::init_app)
            .default_service(web::route().to(root_handler::not_found))
    })
    .workers(config.http_workers)
    .bind((config.bind_host.as_str(), config.bind_port))?
    .run()
    .await
}
