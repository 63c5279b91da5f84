mod config;
mod entities;
mod error;
mod middleware;
mod repository;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::repository::SeaOrmVideoRepository;
use crate::routes::create_routes;
use crate::services::cloudinary::{CloudinaryGateway, TranscodingGateway};
use crate::services::listing::ListingService;
use crate::services::upload::UploadService;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env());

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    Migrator::up(&db, None).await.expect("Migration failed");

    let repository = Arc::new(SeaOrmVideoRepository::new(db.clone()));

    let gateway = match &config.cloudinary {
        Some(credentials) => Some(
            Arc::new(CloudinaryGateway::new(credentials.clone())) as Arc<dyn TranscodingGateway>,
        ),
        None => {
            tracing::warn!("Cloudinary credentials not set; uploads will be rejected");
            None
        }
    };

    let state = AppState {
        db,
        config: config.clone(),
        upload: Arc::new(UploadService::new(gateway, repository.clone())),
        listing: Arc::new(ListingService::new(repository)),
    };

    let app = create_routes(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind address");
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await.unwrap();
}
