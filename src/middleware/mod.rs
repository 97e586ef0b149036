use axum::{extract::Request, middleware::Next, response::Response};

use crate::{error::AppError, models::UserRole, utils::jwt::Claims};

fn verify_bearer(req: &Request) -> Result<Claims, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

    crate::utils::jwt::verify_token(token)
}

pub async fn auth_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let claims = verify_bearer(&req)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Same as `auth_middleware` but additionally requires the artisan role.
pub async fn artisan_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let claims = verify_bearer(&req)?;

    if claims.role != UserRole::Artisan {
        return Err(AppError::Forbidden(
            "Artisan access required".to_string(),
        ));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
