use std::sync::Arc;

use bytes::Bytes;

use crate::entities::video;
use crate::error::AppError;
use crate::repository::{NewVideo, VideoRepository};
use crate::services::cloudinary::{ResourceKind, TranscodingGateway, UploadOptions};

const VIDEO_FOLDER: &str = "video-uploads";
const IMAGE_FOLDER: &str = "image-uploads";
const VIDEO_TRANSFORMATION: &str = "q_auto,f_mp4";

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub data: Bytes,
    pub title: String,
    pub description: Option<String>,
    /// Size the uploader claims the file had before client-side compression.
    /// Stored verbatim, never re-measured.
    pub declared_original_size: i64,
}

/// Orchestrates an upload: validate, push through the gateway once, persist
/// once. No retries; if the insert fails after the remote upload succeeded
/// the remote asset is left orphaned.
pub struct UploadService {
    gateway: Option<Arc<dyn TranscodingGateway>>,
    repository: Arc<dyn VideoRepository>,
}

impl UploadService {
    pub fn new(
        gateway: Option<Arc<dyn TranscodingGateway>>,
        repository: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            gateway,
            repository,
        }
    }

    fn gateway(&self) -> Result<&Arc<dyn TranscodingGateway>, AppError> {
        self.gateway.as_ref().ok_or_else(|| {
            AppError::Configuration("Cloudinary credentials not found".to_string())
        })
    }

    pub async fn upload_video(&self, request: UploadRequest) -> Result<video::Model, AppError> {
        if request.data.is_empty() {
            return Err(AppError::MissingFile);
        }
        if request.title.trim().is_empty() {
            return Err(AppError::InvalidMetadata("Title is required".to_string()));
        }

        let gateway = self.gateway()?;
        let outcome = gateway
            .upload_stream(
                request.data,
                UploadOptions {
                    kind: ResourceKind::Video,
                    folder: VIDEO_FOLDER.to_string(),
                    transformation: Some(VIDEO_TRANSFORMATION.to_string()),
                },
            )
            .await?;

        tracing::info!(public_id = %outcome.public_id, bytes = outcome.bytes, "video uploaded");

        self.repository
            .insert(NewVideo {
                title: request.title,
                description: request.description,
                public_id: outcome.public_id,
                original_size: request.declared_original_size,
                compressed_size: outcome.bytes,
                duration: outcome.duration.unwrap_or(0.0),
            })
            .await
    }

    /// Images are pushed through the gateway but never persisted; the caller
    /// only gets the public id back.
    pub async fn upload_image(&self, data: Bytes) -> Result<String, AppError> {
        if data.is_empty() {
            return Err(AppError::MissingFile);
        }

        let gateway = self.gateway()?;
        let outcome = gateway
            .upload_stream(
                data,
                UploadOptions {
                    kind: ResourceKind::Image,
                    folder: IMAGE_FOLDER.to_string(),
                    transformation: None,
                },
            )
            .await?;

        tracing::info!(public_id = %outcome.public_id, "image uploaded");

        Ok(outcome.public_id)
    }
}
