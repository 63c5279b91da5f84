use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use mockall::automock;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;
use crate::error::AppError;

const UPLOAD_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Which Cloudinary upload endpoint the payload goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub kind: ResourceKind,
    pub folder: String,
    pub transformation: Option<String>,
}

/// What the gateway reports back after a successful upload. `duration` is
/// only present for video resources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadOutcome {
    pub public_id: String,
    pub bytes: i64,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[automock]
#[async_trait]
pub trait TranscodingGateway: Send + Sync {
    async fn upload_stream(
        &self,
        data: Bytes,
        options: UploadOptions,
    ) -> Result<UploadOutcome, AppError>;
}

pub struct CloudinaryGateway {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryGateway {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Cloudinary request signature: parameters sorted by name, joined as
    /// `k=v` pairs with `&`, the API secret appended, then SHA-256 hex.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl TranscodingGateway for CloudinaryGateway {
    async fn upload_stream(
        &self,
        data: Bytes,
        options: UploadOptions,
    ) -> Result<UploadOutcome, AppError> {
        let timestamp = Utc::now().timestamp().to_string();

        let mut signed_params: Vec<(&str, String)> = vec![
            ("folder", options.folder.clone()),
            ("timestamp", timestamp.clone()),
        ];
        if let Some(transformation) = &options.transformation {
            signed_params.push(("transformation", transformation.clone()));
        }
        let signature = self.sign(&signed_params);

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(data.to_vec()).file_name("upload"),
            )
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", options.folder.clone())
            .text("signature", signature);
        if let Some(transformation) = options.transformation {
            form = form.text("transformation", transformation);
        }

        let url = format!(
            "{}/{}/{}/upload",
            UPLOAD_BASE,
            self.config.cloud_name,
            options.kind.as_str()
        );

        tracing::debug!(%url, folder = %options.folder, "uploading to gateway");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(format!("request to gateway failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UploadFailed(format!(
                "gateway returned {}: {}",
                status, body
            )));
        }

        response
            .json::<UploadOutcome>()
            .await
            .map_err(|e| AppError::UploadFailed(format!("unreadable gateway response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(secret: &str) -> CloudinaryGateway {
        CloudinaryGateway::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: secret.to_string(),
        })
    }

    #[test]
    fn signature_ignores_parameter_order() {
        let gw = gateway("s3cret");
        let a = gw.sign(&[
            ("folder", "video-uploads".to_string()),
            ("timestamp", "1700000000".to_string()),
        ]);
        let b = gw.sign(&[
            ("timestamp", "1700000000".to_string()),
            ("folder", "video-uploads".to_string()),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn signature_depends_on_the_secret() {
        let params = [("timestamp", "1700000000".to_string())];
        assert_ne!(gateway("one").sign(&params), gateway("two").sign(&params));
    }

    #[test]
    fn signature_is_lowercase_hex() {
        let digest = gateway("s3cret").sign(&[("timestamp", "1700000000".to_string())]);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn outcome_parses_without_duration() {
        let outcome: UploadOutcome = serde_json::from_str(
            r#"{"public_id":"image-uploads/abc","bytes":1024,"format":"jpg"}"#,
        )
        .unwrap();
        assert_eq!(outcome.public_id, "image-uploads/abc");
        assert_eq!(outcome.bytes, 1024);
        assert_eq!(outcome.duration, None);
    }

    #[test]
    fn outcome_parses_video_duration() {
        let outcome: UploadOutcome = serde_json::from_str(
            r#"{"public_id":"video-uploads/xyz","bytes":2048,"duration":12.5}"#,
        )
        .unwrap();
        assert_eq!(outcome.duration, Some(12.5));
    }
}
