use std::env;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

const BOUNDARY: &str = "test-upload-boundary";

fn setup_env() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("CLOUDINARY_CLOUD_NAME", "test-cloud");
    env::set_var("CLOUDINARY_API_KEY", "test-key");
    env::set_var("CLOUDINARY_API_SECRET", "test-secret");
    // Small cap so the oversize path is cheap to hit.
    env::set_var("MAX_UPLOAD_BYTES", "1024");
    let _ = staffhub_backend::config::init_config();
}

fn build_app(app_state: staffhub_backend::AppState) -> Router {
    Router::new()
        .route(
            "/upload-profile-image",
            post(staffhub_backend::routes::profile::upload_profile_image),
        )
        .layer(axum::middleware::from_fn(
            staffhub_backend::middleware::auth::require_bearer_auth,
        ))
        .with_state(app_state)
}

fn multipart_body(user_id: i64, content_type: &str, file_bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"user_id\"\r\n\r\n{user_id}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"avatar\"\r\ncontent-type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload-profile-image")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

async fn seed_user(pool: &sqlx::PgPool) -> i64 {
    let user_service = staffhub_backend::services::user_service::UserService::new(pool.clone());
    let hashed = staffhub_backend::utils::crypto::hash_password("pw").expect("hash");
    let user = user_service
        .signup(staffhub_backend::services::user_service::NewUser {
            email: format!("upload_{}@example.com", Uuid::new_v4()),
            hashed_password: hashed,
            name: "Uploader".to_string(),
            user_type: staffhub_backend::models::user::UserType::User,
        })
        .await
        .expect("seed user");
    user.id
}

#[tokio::test]
async fn upload_validation_and_lookup_failures() {
    setup_env();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping upload_validation_and_lookup_failures");
        return;
    }

    let pool = staffhub_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let user_id = seed_user(&pool).await;
    let app_state = staffhub_backend::AppState::new(pool.clone());
    let app = build_app(app_state);
    let token =
        staffhub_backend::utils::token::issue_token("Uploader", "upload@example.com").expect("token");

    // No token at all.
    let req = Request::builder()
        .method("POST")
        .uri("/upload-profile-image")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(user_id, "image/png", b"png")))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Wrong content type is rejected locally; the media host is never
    // contacted, so this must fail fast with 400 rather than 500.
    let body = multipart_body(user_id, "text/plain", b"just some text");
    let resp = app.clone().oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Oversize payload (cap is 1024 bytes in this test's config).
    let body = multipart_body(user_id, "image/png", &[0u8; 2048]);
    let resp = app.clone().oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unknown user fails before validation or upload.
    let body = multipart_body(999999999, "image/png", b"png");
    let resp = app.clone().oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Missing file field.
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"user_id\"\r\n\r\n{user_id}\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    let resp = app.clone().oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing was persisted for the failed attempts.
    let (profile_image,): (Option<String>,) =
        sqlx::query_as("SELECT profile_image FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .expect("profile_image");
    assert!(profile_image.is_none());
}
