use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Json},
};
use bytes::Bytes;

use crate::{
    dto::user_dto::{UploadImageQuery, UserResponse},
    error::{Error, Result},
    AppState,
};

#[utoipa::path(
    get,
    path = "/profile/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = Json<UserResponse>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_id(id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/upload-profile-image",
    params(
        ("user_id" = Option<i64>, Query, description = "Target user, if not sent as a form field")
    ),
    responses(
        (status = 200, description = "Hosted image URL", body = String),
        (status = 400, description = "Unsupported type or payload too large"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Remote upload failed")
    )
)]
#[axum::debug_handler]
pub async fn upload_profile_image(
    State(state): State<AppState>,
    Query(query): Query<UploadImageQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut user_id: Option<i64> = None;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "user_id" => {
                let raw = field.text().await?;
                user_id = raw.trim().parse().ok();
            }
            "file" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                upload = Some((content_type, data));
            }
            _ => {}
        }
    }

    let user_id = user_id
        .or(query.user_id)
        .ok_or_else(|| Error::BadRequest("user_id is required".to_string()))?;
    let (content_type, data) =
        upload.ok_or_else(|| Error::BadRequest("file is required".to_string()))?;

    let user = match state.user_service.get_by_id(user_id).await {
        Ok(user) => user,
        Err(Error::NotFound(_)) => return Err(Error::NotFound("User not found".to_string())),
        Err(e) => return Err(e),
    };

    // The remote round trip runs outside any database transaction; the URL
    // is persisted afterwards as its own short write.
    let image_url = state.media_service.upload_image(data, &content_type).await?;
    state
        .user_service
        .set_profile_image(user.id, &image_url)
        .await?;

    Ok(Json(image_url))
}
