use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::auth::ownership::owned_plant;
use crate::error::AppResult;
use crate::models::mood_log::MoodLog;
use crate::models::plant::{CreatePlantRequest, Plant, PlantDetail, UpdatePlantRequest};
use crate::models::reminder::Reminder;
use crate::models::{Page, PageQuery};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PlantSaved {
    pub plant: Plant,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PlantDeleted {
    pub deleted: bool,
    pub id: Uuid,
    pub mood_logs_removed: u64,
    pub reminders_removed: u64,
    pub message: String,
}

pub async fn list_plants(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Plant>>> {
    let (offset, limit) = query.window(state.config.plants_per_page);

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plants WHERE user_id = $1")
        .bind(auth_user.id)
        .fetch_one(&state.db)
        .await?;

    let plants = sqlx::query_as::<_, Plant>(
        r#"
        SELECT * FROM plants
        WHERE user_id = $1
        ORDER BY created_at ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(auth_user.id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Page {
        items: plants,
        page: query.number(),
        per_page: limit,
        total,
    }))
}

pub async fn create_plant(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreatePlantRequest>,
) -> AppResult<Json<PlantSaved>> {
    body.validate()?;

    let plant = sqlx::query_as::<_, Plant>(
        r#"
        INSERT INTO plants (id, user_id, name, plant_type, level, growth_points, created_at)
        VALUES ($1, $2, $3, $4, 1, 0, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.name)
    .bind(body.plant_type)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    tracing::info!(user_id = %auth_user.id, plant_id = %plant.id, "Plant created");

    let message = format!("🌱 {} has been planted!", plant.name);
    Ok(Json(PlantSaved { plant, message }))
}

pub async fn get_plant(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(plant_id): Path<Uuid>,
) -> AppResult<Json<PlantDetail>> {
    let plant = owned_plant(&state.db, &auth_user, plant_id).await?;

    let mood_logs = sqlx::query_as::<_, MoodLog>(
        "SELECT * FROM mood_logs WHERE plant_id = $1 ORDER BY created_at DESC",
    )
    .bind(plant.id)
    .fetch_all(&state.db)
    .await?;

    let reminders = sqlx::query_as::<_, Reminder>(
        "SELECT * FROM reminders WHERE plant_id = $1 ORDER BY reminder_date ASC",
    )
    .bind(plant.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(PlantDetail {
        emoji: plant.plant_type.emoji(),
        plant,
        mood_logs,
        reminders,
    }))
}

pub async fn update_plant(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(plant_id): Path<Uuid>,
    Json(body): Json<UpdatePlantRequest>,
) -> AppResult<Json<PlantSaved>> {
    body.validate()?;
    owned_plant(&state.db, &auth_user, plant_id).await?;

    let plant = sqlx::query_as::<_, Plant>(
        r#"
        UPDATE plants SET
            name = COALESCE($2, name),
            plant_type = COALESCE($3, plant_type)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(plant_id)
    .bind(&body.name)
    .bind(body.plant_type)
    .fetch_one(&state.db)
    .await?;

    let message = format!("✅ {} has been updated!", plant.name);
    Ok(Json(PlantSaved { plant, message }))
}

/// Delete a plant with its mood logs and reminders in one transaction.
pub async fn delete_plant(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(plant_id): Path<Uuid>,
) -> AppResult<Json<PlantDeleted>> {
    let plant = owned_plant(&state.db, &auth_user, plant_id).await?;

    let mut tx = state.db.begin().await?;

    let mood_logs = sqlx::query("DELETE FROM mood_logs WHERE plant_id = $1")
        .bind(plant.id)
        .execute(&mut *tx)
        .await?;
    let reminders = sqlx::query("DELETE FROM reminders WHERE plant_id = $1")
        .bind(plant.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM plants WHERE id = $1")
        .bind(plant.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %auth_user.id,
        plant_id = %plant.id,
        mood_logs_removed = mood_logs.rows_affected(),
        reminders_removed = reminders.rows_affected(),
        "Plant deleted"
    );

    Ok(Json(PlantDeleted {
        deleted: true,
        id: plant.id,
        mood_logs_removed: mood_logs.rows_affected(),
        reminders_removed: reminders.rows_affected(),
        message: format!("🗑️ {} has been removed.", plant.name),
    }))
}
