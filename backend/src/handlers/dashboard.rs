use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::mood_log::MoodLogWithPlant;
use crate::models::plant::Plant;
use crate::models::reminder::ReminderWithPlant;
use crate::AppState;

const UPCOMING_REMINDERS: i64 = 5;
const RECENT_MOODS: i64 = 5;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub plants: Vec<Plant>,
    pub reminders: Vec<ReminderWithPlant>,
    pub recent_moods: Vec<MoodLogWithPlant>,
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Dashboard>> {
    let plants = sqlx::query_as::<_, Plant>(
        "SELECT * FROM plants WHERE user_id = $1 ORDER BY created_at ASC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    let reminders = sqlx::query_as::<_, ReminderWithPlant>(
        r#"
        SELECT r.*, p.name AS plant_name FROM reminders r
        JOIN plants p ON p.id = r.plant_id
        WHERE p.user_id = $1 AND r.completed = 0 AND r.reminder_date >= $2
        ORDER BY r.reminder_date ASC
        LIMIT $3
        "#,
    )
    .bind(auth_user.id)
    .bind(Utc::now())
    .bind(UPCOMING_REMINDERS)
    .fetch_all(&state.db)
    .await?;

    let recent_moods = sqlx::query_as::<_, MoodLogWithPlant>(
        r#"
        SELECT m.*, p.name AS plant_name FROM mood_logs m
        JOIN plants p ON p.id = m.plant_id
        WHERE p.user_id = $1
        ORDER BY m.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(auth_user.id)
    .bind(RECENT_MOODS)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Dashboard {
        plants,
        reminders,
        recent_moods,
    }))
}
