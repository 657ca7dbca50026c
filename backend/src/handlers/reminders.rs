use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::auth::ownership::{owned_plant, owned_reminder};
use crate::error::{AppError, AppResult};
use crate::models::reminder::{CreateReminderRequest, Reminder};
use crate::AppState;

pub async fn create_reminder(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(plant_id): Path<Uuid>,
    Json(body): Json<CreateReminderRequest>,
) -> AppResult<Json<serde_json::Value>> {
    body.validate()?;
    owned_plant(&state.db, &auth_user, plant_id).await?;

    let reminder = sqlx::query_as::<_, Reminder>(
        r#"
        INSERT INTO reminders (id, plant_id, description, reminder_date, completed, created_at)
        VALUES ($1, $2, $3, $4, 0, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(plant_id)
    .bind(&body.description)
    .bind(body.reminder_date)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok(Json(serde_json::json!({
        "reminder": reminder,
        "message": "⏰ Reminder added!",
    })))
}

pub async fn complete_reminder(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(reminder_id): Path<Uuid>,
) -> AppResult<Json<Reminder>> {
    owned_reminder(&state.db, &auth_user, reminder_id).await?;

    let reminder = sqlx::query_as::<_, Reminder>(
        "UPDATE reminders SET completed = 1 WHERE id = $1 RETURNING *",
    )
    .bind(reminder_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Reminder not found".into()))?;

    Ok(Json(reminder))
}

pub async fn delete_reminder(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(reminder_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let reminder = owned_reminder(&state.db, &auth_user, reminder_id).await?;

    sqlx::query("DELETE FROM reminders WHERE id = $1")
        .bind(reminder.id)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": reminder.id,
        "plant_id": reminder.plant_id,
        "message": "Reminder deleted.",
    })))
}
