use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Form,
};
use validator::Validate;

use crate::{
    dto::user_dto::{LoginForm, SignupPayload, TokenResponse, UserResponse},
    error::{Error, Result},
    models::user::UserType,
    services::user_service::NewUser,
    utils::crypto::{hash_password, verify_password},
    utils::token::issue_token,
    AppState,
};

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Authenticated", body = Json<TokenResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Form(payload): Form<LoginForm>,
) -> Result<impl IntoResponse> {
    // Unknown email and wrong password must be indistinguishable.
    let user = match state.user_service.get_by_email(&payload.username).await {
        Ok(user) => user,
        Err(Error::NotFound(_)) => return Err(Error::InvalidCredentials),
        Err(e) => return Err(e),
    };

    let is_valid = verify_password(&payload.password, &user.hashed_password)
        .map_err(|_| Error::InvalidCredentials)?;
    if !is_valid {
        return Err(Error::InvalidCredentials);
    }

    let access_token = issue_token(&user.name, &user.email)?;
    Ok(Json(TokenResponse { access_token }))
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "User registered", body = Json<UserResponse>),
        (status = 400, description = "Duplicate email or invalid type")
    )
)]
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user_type = match payload.user_type.as_deref() {
        Some(raw) => UserType::parse(raw)?,
        None => UserType::default(),
    };

    let hashed_password = hash_password(&payload.password)
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

    let user = state
        .user_service
        .signup(NewUser {
            email: payload.email,
            hashed_password,
            name: payload.name,
            user_type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
