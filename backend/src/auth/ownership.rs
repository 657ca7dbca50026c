//! Ownership checks for plants and their children.
//!
//! A missing row is `NotFound`; a row that belongs to somebody else is
//! `Forbidden`. Mood logs and reminders are resolved to their owner through
//! the plant they hang off.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::{mood_log::MoodLog, plant::Plant, reminder::Reminder};

pub async fn owned_plant(db: &SqlitePool, auth_user: &AuthUser, plant_id: Uuid) -> AppResult<Plant> {
    let plant = sqlx::query_as::<_, Plant>("SELECT * FROM plants WHERE id = $1")
        .bind(plant_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Plant not found".into()))?;

    ensure_owner(auth_user, plant.user_id, "plant", plant.id)?;
    Ok(plant)
}

pub async fn owned_mood_log(
    db: &SqlitePool,
    auth_user: &AuthUser,
    mood_id: Uuid,
) -> AppResult<MoodLog> {
    let mood_log = sqlx::query_as::<_, MoodLog>("SELECT * FROM mood_logs WHERE id = $1")
        .bind(mood_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Mood log not found".into()))?;

    let owner = plant_owner(db, mood_log.plant_id).await?;
    ensure_owner(auth_user, owner, "mood_log", mood_log.id)?;
    Ok(mood_log)
}

pub async fn owned_reminder(
    db: &SqlitePool,
    auth_user: &AuthUser,
    reminder_id: Uuid,
) -> AppResult<Reminder> {
    let reminder = sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = $1")
        .bind(reminder_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Reminder not found".into()))?;

    let owner = plant_owner(db, reminder.plant_id).await?;
    ensure_owner(auth_user, owner, "reminder", reminder.id)?;
    Ok(reminder)
}

async fn plant_owner(db: &SqlitePool, plant_id: Uuid) -> AppResult<Uuid> {
    sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM plants WHERE id = $1")
        .bind(plant_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Plant not found".into()))
}

fn ensure_owner(auth_user: &AuthUser, owner: Uuid, kind: &str, id: Uuid) -> AppResult<()> {
    if owner != auth_user.id {
        tracing::warn!(
            user_id = %auth_user.id,
            owner_id = %owner,
            entity = kind,
            entity_id = %id,
            "Ownership check failed"
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_owner() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            username: "fern".into(),
        };
        assert!(ensure_owner(&user, user.id, "plant", Uuid::new_v4()).is_ok());
        assert!(matches!(
            ensure_owner(&user, Uuid::new_v4(), "plant", Uuid::new_v4()),
            Err(AppError::Forbidden)
        ));
    }
}
