use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entities::video;
use crate::error::AppError;

/// Everything needed to persist a freshly uploaded video.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: f64,
}

#[automock]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn insert(&self, video: NewVideo) -> Result<video::Model, AppError>;
    async fn find_all_newest_first(&self) -> Result<Vec<video::Model>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<video::Model>, AppError>;
}

pub struct SeaOrmVideoRepository {
    db: DatabaseConnection,
}

impl SeaOrmVideoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VideoRepository for SeaOrmVideoRepository {
    async fn insert(&self, new: NewVideo) -> Result<video::Model, AppError> {
        let now = Utc::now().naive_utc();
        let record = video::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            description: Set(new.description),
            public_id: Set(new.public_id),
            original_size: Set(new.original_size),
            compressed_size: Set(new.compressed_size),
            duration: Set(new.duration),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record.insert(&self.db).await.map_err(AppError::Persistence)
    }

    async fn find_all_newest_first(&self) -> Result<Vec<video::Model>, AppError> {
        video::Entity::find()
            .order_by_desc(video::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::Query)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<video::Model>, AppError> {
        video::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::Query)
    }
}
