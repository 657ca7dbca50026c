use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::auth::ownership::{owned_mood_log, owned_plant};
use crate::error::{AppError, AppResult};
use crate::models::mood_log::{CreateMoodLogRequest, MoodLog, MoodLogCreated};
use crate::models::plant::Plant;
use crate::models::{Page, PageQuery};
use crate::services::sentiment;
use crate::AppState;

/// Score the note, store it and grow the plant, all in one transaction.
pub async fn create_mood_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(plant_id): Path<Uuid>,
    Json(body): Json<CreateMoodLogRequest>,
) -> AppResult<Json<MoodLogCreated>> {
    body.validate()?;
    owned_plant(&state.db, &auth_user, plant_id).await?;

    let sentiment = sentiment::analyze(state.analyzer.as_ref(), &body.note_text);

    let mut tx = state.db.begin().await?;

    // Re-read inside the transaction; the plant may have gone since the check.
    let current = sqlx::query_as::<_, Plant>("SELECT * FROM plants WHERE id = $1")
        .bind(plant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Plant not found".into()))?;
    let before = current.growth();
    let after = before.accrue(sentiment.growth_points);

    let mood_log = sqlx::query_as::<_, MoodLog>(
        r#"
        INSERT INTO mood_logs (id, plant_id, note_text, sentiment_score, sentiment_label, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(plant_id)
    .bind(&body.note_text)
    .bind(sentiment.score)
    .bind(sentiment.label)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    let plant = sqlx::query_as::<_, Plant>(
        "UPDATE plants SET level = $2, growth_points = $3 WHERE id = $1 RETURNING *",
    )
    .bind(plant_id)
    .bind(after.level)
    .bind(after.growth_points)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let levels_gained = after.level - before.level;
    if levels_gained > 0 {
        tracing::info!(
            plant_id = %plant_id,
            level = after.level,
            levels_gained = levels_gained,
            "Plant levelled up"
        );
    }
    tracing::debug!(
        plant_id = %plant_id,
        score = sentiment.score,
        label = sentiment.label.as_str(),
        awarded = sentiment.growth_points,
        "Mood logged"
    );

    let label = sentiment.label;
    Ok(Json(MoodLogCreated {
        mood_log,
        subjectivity: sentiment.subjectivity,
        emoji: label.emoji(),
        plant_state: label.plant_state(),
        growth_points_awarded: sentiment.growth_points,
        levels_gained,
        plant,
        message: format!(
            "{} Mood logged! Your plant {} vibes!",
            label.emoji(),
            label.as_str()
        ),
    }))
}

pub async fn list_mood_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(plant_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<MoodLog>>> {
    owned_plant(&state.db, &auth_user, plant_id).await?;
    let (offset, limit) = query.window(state.config.mood_logs_per_page);

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mood_logs WHERE plant_id = $1")
        .bind(plant_id)
        .fetch_one(&state.db)
        .await?;

    let logs = sqlx::query_as::<_, MoodLog>(
        r#"
        SELECT * FROM mood_logs
        WHERE plant_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(plant_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Page {
        items: logs,
        page: query.number(),
        per_page: limit,
        total,
    }))
}

/// Growth already awarded by the log is kept.
pub async fn delete_mood_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let mood_log = owned_mood_log(&state.db, &auth_user, mood_id).await?;

    sqlx::query("DELETE FROM mood_logs WHERE id = $1")
        .bind(mood_log.id)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": mood_log.id,
        "plant_id": mood_log.plant_id,
        "message": "Mood log deleted.",
    })))
}
