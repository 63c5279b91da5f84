use std::sync::Arc;

use uuid::Uuid;

use crate::entities::video;
use crate::error::AppError;
use crate::repository::VideoRepository;

/// Read side of the catalogue. Always returns the full table, newest first;
/// the collection is expected to stay dashboard-sized.
pub struct ListingService {
    repository: Arc<dyn VideoRepository>,
}

impl ListingService {
    pub fn new(repository: Arc<dyn VideoRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<video::Model>, AppError> {
        self.repository.find_all_newest_first().await
    }

    pub async fn get(&self, id: Uuid) -> Result<video::Model, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video '{}' not found", id)))
    }
}
