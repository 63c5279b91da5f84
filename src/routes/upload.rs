use axum::{
    extract::{Multipart, State},
    response::Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::error::AppError;
use crate::routes::videos::VideoResponse;
use crate::services::upload::UploadRequest;
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageUploadResponse {
    #[serde(rename = "publicId")]
    pub public_id: String,
}

#[utoipa::path(
    post,
    path = "/media-upload",
    tag = "Upload",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded and recorded", body = VideoResponse),
        (status = 400, description = "Missing file or invalid metadata"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Upload image failed!")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn media_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, AppError> {
    let mut data: Option<Bytes> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut original_size: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                data = Some(field.bytes().await.map_err(|_| {
                    AppError::BadRequest("Invalid multipart data".to_string())
                })?);
            }
            "title" => {
                title = Some(field.text().await.map_err(|_| {
                    AppError::BadRequest("Invalid multipart data".to_string())
                })?);
            }
            "description" => {
                description = Some(field.text().await.map_err(|_| {
                    AppError::BadRequest("Invalid multipart data".to_string())
                })?);
            }
            "originalSize" => {
                original_size = Some(field.text().await.map_err(|_| {
                    AppError::BadRequest("Invalid multipart data".to_string())
                })?);
            }
            _ => {}
        }
    }

    // The file check comes first: a request with no payload is rejected
    // before its metadata is even parsed.
    let data = data.unwrap_or_default();
    if data.is_empty() {
        return Err(AppError::MissingFile);
    }

    let declared_original_size = original_size
        .ok_or_else(|| AppError::InvalidMetadata("originalSize is required".to_string()))?
        .trim()
        .parse::<i64>()
        .map_err(|_| {
            AppError::InvalidMetadata("originalSize must be a decimal integer".to_string())
        })?;

    // Empty description fields count as absent.
    let description = description.filter(|d| !d.is_empty());

    let video = state
        .upload
        .upload_video(UploadRequest {
            data,
            title: title.unwrap_or_default(),
            description,
            declared_original_size,
        })
        .await?;

    tracing::info!(id = %video.id, title = %video.title, "media upload complete");
    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    post,
    path = "/image-upload",
    tag = "Upload",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image uploaded", body = ImageUploadResponse),
        (status = 400, description = "Missing file"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Upload image failed!")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn image_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, AppError> {
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() == Some("file") {
            data = Some(field.bytes().await.map_err(|_| {
                AppError::BadRequest("Invalid multipart data".to_string())
            })?);
        }
    }

    let public_id = state.upload.upload_image(data.unwrap_or_default()).await?;
    Ok(Json(ImageUploadResponse { public_id }))
}
