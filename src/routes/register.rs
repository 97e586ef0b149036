use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{AppError, Result},
    models::{AuthResponse, RegisterRequest, UserRole},
    queries::{artisan_queries, user_queries},
    utils::jwt,
    AppState,
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    validate_registration(&payload)?;

    let email = payload.email.trim().to_lowercase();

    if user_queries::find_by_email(&state.db, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User already exists with this email".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let role = payload.role.unwrap_or(UserRole::Customer);

    let user = user_queries::create_user(
        &state.db,
        payload.first_name.trim(),
        payload.last_name.trim(),
        &email,
        &password_hash,
        role,
        payload.phone.as_deref().map(str::trim),
    )
    .await?;

    let artisan = if role == UserRole::Artisan {
        let business_name = format!(
            "{} {}'s Workshop",
            payload.first_name.trim(),
            payload.last_name.trim()
        );
        Some(artisan_queries::create_default(&state.db, user.id, &business_name).await?)
    } else {
        None
    };

    let token = jwt::generate_token(user.id, &user.email, user.role)?;
    user_queries::touch_last_login(&state.db, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
            artisan,
        }),
    ))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }

    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if payload.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    Ok(())
}
