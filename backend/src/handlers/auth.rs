use axum::{extract::State, Extension, Json};
use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::SqliteExecutor;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::{create_token_pair, hash_token, verify_token, TokenPair, TokenType},
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::user::{LoginRequest, RefreshRequest, RegisterRequest, User, UserProfile};
use crate::services::streak::{self, StreakChange};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserProfile,
    pub messages: Vec<String>,
}

async fn store_refresh_token(
    db: impl SqliteExecutor<'_>,
    user_id: Uuid,
    raw_refresh_token: &str,
    ttl_secs: i64,
    parent_token_id: Option<Uuid>,
) -> AppResult<Uuid> {
    let token_hash = hash_token(raw_refresh_token);
    let now = Utc::now();
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, parent_token_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&token_hash)
    .bind(now + Duration::seconds(ttl_secs))
    .bind(parent_token_id)
    .bind(now)
    .execute(db)
    .await?;

    Ok(id)
}

/// Create a token pair and persist the refresh token hash.
async fn issue_token_pair(
    db: impl SqliteExecutor<'_>,
    user_id: Uuid,
    username: &str,
    config: &Config,
    parent_token_id: Option<Uuid>,
) -> AppResult<TokenPair> {
    let tokens = create_token_pair(user_id, username, config)?;
    store_refresh_token(
        db,
        user_id,
        &tokens.refresh_token,
        config.jwt_refresh_ttl_secs,
        parent_token_id,
    )
    .await?;
    Ok(tokens)
}

async fn revoke_all_user_tokens(db: impl SqliteExecutor<'_>, user_id: Uuid) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = 1, revoked_at = $2
        WHERE user_id = $1 AND revoked = 0
        "#,
    )
    .bind(user_id)
    .bind(Utc::now())
    .execute(db)
    .await?;
    Ok(())
}

/// New users start with no streak and no login. A concurrent registration
/// that wins the race surfaces as a conflict, not a database error.
async fn insert_user(
    db: impl SqliteExecutor<'_>,
    username: &str,
    email: &str,
    password_hash: &str,
) -> AppResult<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password_hash, streak_days, last_login, created_at)
        VALUES ($1, $2, $3, $4, 0, NULL, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Username or email already registered.".into())
        }
        other => AppError::Database(other),
    })
}

fn streak_message(change: StreakChange, streak: i64) -> Option<String> {
    match change {
        StreakChange::Extended => Some(format!("🔥 {} day streak!", streak)),
        _ => None,
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;

    let username_taken =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind(&body.username)
            .fetch_one(&state.db)
            .await?;
    if username_taken > 0 {
        return Err(AppError::Conflict(
            "Username already taken. Please choose a different one.".into(),
        ));
    }

    let email_taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&body.email)
        .fetch_one(&state.db)
        .await?;
    if email_taken > 0 {
        return Err(AppError::Conflict(
            "Email already registered. Please use a different one.".into(),
        ));
    }

    let pwd_hash = hash_password(&body.password)?;

    let mut tx = state.db.begin().await?;

    let user = insert_user(&mut *tx, &body.username, &body.email, &pwd_hash).await?;

    let tokens = issue_token_pair(&mut *tx, user.id, &user.username, &state.config, None).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(Json(AuthResponse {
        tokens,
        user: user.into(),
        messages: vec!["Registration successful! Welcome to PlantPal! 🌱".into()],
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&body.username)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::debug!(username = %body.username, "Login rejected: bad password");
        return Err(AppError::Unauthorized);
    }

    let now = Utc::now();
    let update = streak::advance(user.streak_days, user.last_login, now);

    let mut tx = state.db.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET streak_days = $2, last_login = $3
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(update.streak)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let tokens = issue_token_pair(&mut *tx, user.id, &user.username, &state.config, None).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %user.id,
        streak = update.streak,
        change = ?update.change,
        "User logged in"
    );

    let mut messages = Vec::new();
    if let Some(msg) = streak_message(update.change, update.streak) {
        messages.push(msg);
    }
    messages.push(format!("Welcome back, {}! 🌿", user.username));

    Ok(Json(AuthResponse {
        tokens,
        user: user.into(),
        messages,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    let token_data = verify_token(&body.refresh_token, &state.config)?;

    if token_data.claims.token_type != TokenType::Refresh {
        return Err(AppError::Unauthorized);
    }

    let token_hash = hash_token(&body.refresh_token);

    let (stored_id, stored_user_id, revoked) = sqlx::query_as::<_, (Uuid, Uuid, bool)>(
        "SELECT id, user_id, revoked FROM refresh_tokens WHERE token_hash = $1",
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::Unauthorized)?;

    // A revoked token being replayed burns every session of its user.
    if revoked {
        tracing::warn!(
            user_id = %stored_user_id,
            token_id = %stored_id,
            "Refresh token reuse detected, revoking all tokens for user"
        );
        revoke_all_user_tokens(&state.db, stored_user_id).await?;
        return Err(AppError::Unauthorized);
    }

    if stored_user_id != token_data.claims.sub {
        return Err(AppError::Unauthorized);
    }

    let mut tx = state.db.begin().await?;

    sqlx::query("UPDATE refresh_tokens SET revoked = 1, revoked_at = $2 WHERE id = $1")
        .bind(stored_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

    let tokens = issue_token_pair(
        &mut *tx,
        token_data.claims.sub,
        &token_data.claims.username,
        &state.config,
        Some(stored_id),
    )
    .await?;
    tx.commit().await?;

    Ok(Json(tokens))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    revoke_all_user_tokens(&state.db, auth_user.id).await?;
    Ok(Json(serde_json::json!({
        "message": "You have been logged out. See you soon! 👋"
    })))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}

/// Delete the account and everything it owns in one transaction.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let mut tx = state.db.begin().await?;

    sqlx::query(
        "DELETE FROM mood_logs WHERE plant_id IN (SELECT id FROM plants WHERE user_id = $1)",
    )
    .bind(auth_user.id)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "DELETE FROM reminders WHERE plant_id IN (SELECT id FROM plants WHERE user_id = $1)",
    )
    .bind(auth_user.id)
    .execute(&mut *tx)
    .await?;
    let plants = sqlx::query("DELETE FROM plants WHERE user_id = $1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;
    let users = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;

    if users.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    tx.commit().await?;

    tracing::info!(
        user_id = %auth_user.id,
        plants_removed = plants.rows_affected(),
        "Account deleted"
    );

    Ok(Json(serde_json::json!({ "deleted": true, "id": auth_user.id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_message_only_when_extended() {
        assert_eq!(
            streak_message(StreakChange::Extended, 4).as_deref(),
            Some("🔥 4 day streak!")
        );
        assert!(streak_message(StreakChange::Started, 1).is_none());
        assert!(streak_message(StreakChange::Reset, 1).is_none());
        assert!(streak_message(StreakChange::Unchanged, 3).is_none());
    }

    #[tokio::test]
    async fn test_insert_user_maps_unique_violation_to_conflict() {
        let db = crate::db::create_memory_pool().await.unwrap();
        crate::db::run_migrations(&db).await.unwrap();

        insert_user(&db, "ivy", "ivy@example.com", "hash").await.unwrap();

        let same_name = insert_user(&db, "ivy", "other@example.com", "hash").await;
        assert!(matches!(same_name, Err(AppError::Conflict(_))));

        let same_email = insert_user(&db, "moss", "ivy@example.com", "hash").await;
        assert!(matches!(same_email, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_auth_response_flattens_tokens() {
        let resp = AuthResponse {
            tokens: TokenPair {
                access_token: "a".into(),
                refresh_token: "r".into(),
                expires_in: 900,
            },
            user: UserProfile {
                id: Uuid::nil(),
                username: "ivy".into(),
                email: "ivy@example.com".into(),
                streak_days: 1,
                last_login: None,
                created_at: Utc::now(),
            },
            messages: vec!["hi".into()],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["access_token"], "a");
        assert_eq!(json["expires_in"], 900);
        assert_eq!(json["user"]["username"], "ivy");
    }
}
