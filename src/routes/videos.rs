use axum::{
    extract::{Path, Query, State},
    response::{Json, Redirect},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::video;
use crate::error::AppError;
use crate::services::delivery;
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<video::Model> for VideoResponse {
    fn from(model: video::Model) -> Self {
        VideoResponse {
            id: model.id,
            title: model.title,
            description: model.description,
            public_id: model.public_id,
            original_size: model.original_size,
            compressed_size: model.compressed_size,
            duration: model.duration,
            created_at: model.created_at.and_utc().to_rfc3339(),
            updated_at: model.updated_at.and_utc().to_rfc3339(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/media",
    responses(
        (status = 200, description = "All videos, newest first", body = [VideoResponse]),
        (status = 500, description = "Error fetching videos")
    ),
    tag = "Media"
)]
pub async fn list_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    let videos = state.listing.list().await?;
    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct DownloadParams {
    /// `thumbnail`, `preview`, or `full` (default).
    variant: Option<String>,
}

#[utoipa::path(
    get,
    path = "/media/{id}/download",
    params(
        ("id" = String, Path, description = "Video id"),
        DownloadParams
    ),
    responses(
        (status = 307, description = "Redirect to the CDN delivery URL"),
        (status = 404, description = "Video or variant not found"),
        (status = 500, description = "Gateway not configured")
    ),
    tag = "Media"
)]
pub async fn download_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DownloadParams>,
) -> Result<Redirect, AppError> {
    let cloudinary = state.config.cloudinary.as_ref().ok_or_else(|| {
        AppError::Configuration("Cloudinary credentials not found".to_string())
    })?;

    let video = state.listing.get(id).await?;

    let url = match params.variant.as_deref() {
        Some("thumbnail") => delivery::thumbnail_url(&cloudinary.cloud_name, &video.public_id),
        Some("preview") => delivery::preview_url(&cloudinary.cloud_name, &video.public_id),
        None | Some("full") => delivery::download_url(&cloudinary.cloud_name, &video.public_id),
        Some(other) => {
            return Err(AppError::NotFound(format!("Variant '{}' not found", other)));
        }
    };

    Ok(Redirect::temporary(&url))
}
