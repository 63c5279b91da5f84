mod auth;
mod home;
mod upload;
mod videos;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        // General endpoints
        home::root,
        // Authentication endpoints
        auth::signup,
        auth::login,
        auth::me,
        // Upload endpoints
        upload::media_upload,
        upload::image_upload,
        // Media endpoints
        videos::list_videos,
        videos::download_video,
    ),
    components(
        schemas(
            // Auth schemas
            auth::SignupRequest,
            auth::SignupResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserProfile,
            // Upload schemas
            upload::ImageUploadResponse,
            // Media schemas
            videos::VideoResponse,
        )
    ),
    tags(
        (name = "General", description = "General API information"),
        (name = "Authentication", description = "Account signup, login, and profile"),
        (name = "Upload", description = "Authenticated media and image uploads"),
        (name = "Media", description = "Public video catalogue and delivery")
    ),
    info(
        title = "VideoVaultKit API",
        version = "0.1.0",
        description = "A Rust/Axum service for uploading videos through a transcoding gateway and serving a compressed catalogue",
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(
                utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                ),
            ),
        );
    }
}

pub fn create_routes(state: AppState) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    // Protected routes that require auth. The middleware runs before the
    // multipart body is touched, so an unauthenticated upload is rejected
    // without reading the payload.
    let protected_routes = Router::new()
        .route("/media-upload", post(upload::media_upload))
        .route("/image-upload", post(upload::image_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .route("/auth/me", get(auth::me))
        .layer(middleware::from_fn(auth_middleware));

    // Public routes (no auth required) and merge all together
    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/media", get(videos::list_videos))
        .route("/media/{id}/download", get(videos::download_video))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Router::new().merge(swagger_router).merge(app_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CloudinaryConfig, Config};
    use crate::middleware::auth::{jwt_secret, Claims};
    use crate::repository::MockVideoRepository;
    use crate::services::cloudinary::{MockTranscodingGateway, TranscodingGateway, UploadOutcome};
    use crate::services::listing::ListingService;
    use crate::services::upload::UploadService;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_state(gateway: MockTranscodingGateway, repository: MockVideoRepository) -> AppState {
        let repository = Arc::new(repository);
        let config = Arc::new(Config {
            database_url: String::new(),
            bind_addr: String::new(),
            cloudinary: Some(CloudinaryConfig {
                cloud_name: "demo".to_string(),
                api_key: "key".to_string(),
                api_secret: "s3cret".to_string(),
            }),
        });
        AppState {
            db: DatabaseConnection::default(),
            config,
            upload: Arc::new(UploadService::new(
                Some(Arc::new(gateway) as Arc<dyn TranscodingGateway>),
                repository.clone(),
            )),
            listing: Arc::new(ListingService::new(repository)),
        }
    }

    fn bearer() -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize
            + 3600;
        let claims = Claims {
            sub: "tester".to_string(),
            exp,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt_secret().as_ref()),
        )
        .unwrap();
        format!("Bearer {}", token)
    }

    const BOUNDARY: &str = "test-boundary";

    fn multipart_body(fields: &[(&str, &[u8])]) -> Body {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            if *name == "file" {
                body.extend_from_slice(
                    b"Content-Disposition: form-data; name=\"file\"; filename=\"clip.mp4\"\r\n",
                );
                body.extend_from_slice(b"Content-Type: video/mp4\r\n\r\n");
            } else {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
            }
            body.extend_from_slice(value);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Body::from(body)
    }

    fn multipart_content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sample_video() -> crate::entities::video::Model {
        let now = Utc::now().naive_utc();
        crate::entities::video::Model {
            id: Uuid::new_v4(),
            title: "My clip".to_string(),
            description: Some("a clip".to_string()),
            public_id: "video-uploads/abc123".to_string(),
            original_size: 5_000_000,
            compressed_size: 1_234_567,
            duration: 42.5,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn upload_without_a_token_is_unauthorized() {
        // No expectations: the request must never reach the gateway or store.
        let app = create_routes(test_state(
            MockTranscodingGateway::new(),
            MockVideoRepository::new(),
        ));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/media-upload")
                    .header(header::CONTENT_TYPE, multipart_content_type())
                    .body(multipart_body(&[("title", b"My clip".as_slice())]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response_json(response).await,
            serde_json::json!({ "error": "Unauthorized" })
        );
    }

    #[tokio::test]
    async fn upload_without_a_file_field_is_a_bad_request() {
        let app = create_routes(test_state(
            MockTranscodingGateway::new(),
            MockVideoRepository::new(),
        ));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/media-upload")
                    .header(header::AUTHORIZATION, bearer())
                    .header(header::CONTENT_TYPE, multipart_content_type())
                    .body(multipart_body(&[
                        ("title", b"My clip".as_slice()),
                        ("originalSize", b"5000000".as_slice()),
                    ]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_json(response).await,
            serde_json::json!({ "error": "File not found!" })
        );
    }

    #[tokio::test]
    async fn upload_round_trip_returns_the_stored_record() {
        let mut gateway = MockTranscodingGateway::new();
        gateway.expect_upload_stream().times(1).returning(|_, _| {
            Ok(UploadOutcome {
                public_id: "video-uploads/abc123".to_string(),
                bytes: 1_234_567,
                duration: Some(42.5),
            })
        });

        let mut repository = MockVideoRepository::new();
        repository
            .expect_insert()
            .times(1)
            .returning(|_| Ok(sample_video()));

        let app = create_routes(test_state(gateway, repository));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/media-upload")
                    .header(header::AUTHORIZATION, bearer())
                    .header(header::CONTENT_TYPE, multipart_content_type())
                    .body(multipart_body(&[
                        ("file", b"fake video bytes".as_slice()),
                        ("title", b"My clip".as_slice()),
                        ("description", b"a clip".as_slice()),
                        ("originalSize", b"5000000".as_slice()),
                    ]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["publicId"], "video-uploads/abc123");
        assert_eq!(body["compressedSize"], 1_234_567);
        assert_eq!(body["originalSize"], 5_000_000);
    }

    #[tokio::test]
    async fn listing_is_public_and_camel_cased() {
        let mut repository = MockVideoRepository::new();
        repository
            .expect_find_all_newest_first()
            .times(1)
            .returning(|| Ok(vec![sample_video()]));

        let app = create_routes(test_state(MockTranscodingGateway::new(), repository));

        let response = app
            .oneshot(Request::builder().uri("/media").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body[0]["title"], "My clip");
        assert_eq!(body[0]["publicId"], "video-uploads/abc123");
        assert!(body[0].get("public_id").is_none());
    }

    #[tokio::test]
    async fn listing_failures_report_the_fetch_error() {
        let mut repository = MockVideoRepository::new();
        repository
            .expect_find_all_newest_first()
            .times(1)
            .returning(|| {
                Err(crate::error::AppError::Query(sea_orm::DbErr::Custom(
                    "down".into(),
                )))
            });

        let app = create_routes(test_state(MockTranscodingGateway::new(), repository));

        let response = app
            .oneshot(Request::builder().uri("/media").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response_json(response).await,
            serde_json::json!({ "error": "Error fetching videos" })
        );
    }

    #[tokio::test]
    async fn download_redirects_to_the_thumbnail_variant() {
        let video = sample_video();
        let id = video.id;
        let mut repository = MockVideoRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(video.clone())));

        let app = create_routes(test_state(MockTranscodingGateway::new(), repository));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/media/{}/download?variant=thumbnail", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://res.cloudinary.com/demo/video/upload/c_fill,g_auto,h_270,w_480,q_auto/video-uploads/abc123.jpg"
        );
    }

    #[tokio::test]
    async fn unknown_variant_is_not_found() {
        let video = sample_video();
        let id = video.id;
        let mut repository = MockVideoRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(video.clone())));

        let app = create_routes(test_state(MockTranscodingGateway::new(), repository));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/media/{}/download?variant=hologram", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn home_serves_html() {
        let app = create_routes(test_state(
            MockTranscodingGateway::new(),
            MockVideoRepository::new(),
        ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
