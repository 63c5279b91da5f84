use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::services::listing::ListingService;
use crate::services::upload::UploadService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub upload: Arc<UploadService>,
    pub listing: Arc<ListingService>,
}
