use axum::{extract::State, Extension, Json};
use serde_json::json;

use crate::{
    error::{AppError, Result},
    models::{Artisan, ChangePasswordRequest, PublicUser, UpdateUserRequest, UserRole},
    queries::{artisan_queries, user_queries},
    utils::{extractors::extract_user_id, jwt::Claims},
    AppState,
};

#[derive(Debug, serde::Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artisan: Option<Artisan>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>> {
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let artisan = if user.role == UserRole::Artisan {
        artisan_queries::find_by_user_id(&state.db, user_id).await?
    } else {
        None
    };

    Ok(Json(ProfileResponse {
        user: user.into(),
        artisan,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>> {
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::update_user(
        &state.db,
        user_id,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
        payload.phone.as_deref(),
        payload.avatar.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if payload.new_password.len() < 6 {
        return Err(AppError::BadRequest(
            "New password must be at least 6 characters".to_string(),
        ));
    }

    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let is_valid = bcrypt::verify(&payload.current_password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&payload.new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    user_queries::update_password(&state.db, user_id, &password_hash).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// Tokens are stateless; logout is a client-side discard.
pub async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "message": "Logged out successfully" }))
}

pub async fn verify_token(Extension(claims): Extension<Claims>) -> Result<Json<serde_json::Value>> {
    let user_id = extract_user_id(&claims)?;

    Ok(Json(json!({
        "valid": true,
        "user": {
            "id": user_id,
            "email": claims.email,
            "role": claims.role,
        }
    })))
}
