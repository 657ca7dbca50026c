use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::jwt::{verify_token, TokenType};
use crate::error::AppError;
use crate::AppState;

/// Request-scoped identity. Inserted by [`require_auth`] and taken by every
/// protected handler as an explicit argument.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let token_data = verify_token(token, &state.config)?;

    if token_data.claims.token_type != TokenType::Access {
        return Err(AppError::Unauthorized);
    }

    // Access tokens outlive account deletion, so the user must still exist.
    let username = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE id = $1")
        .bind(token_data.claims.sub)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id = %token_data.claims.sub, "Access token for deleted user");
            AppError::Unauthorized
        })?;

    let auth_user = AuthUser {
        id: token_data.claims.sub,
        username,
    };

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}
