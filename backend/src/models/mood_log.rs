use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::plant::Plant;
pub use crate::services::sentiment::SentimentLabel;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodLog {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub note_text: String,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub created_at: DateTime<Utc>,
}

/// A mood log with the name of its plant, for cross-plant feeds.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MoodLogWithPlant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub mood_log: MoodLog,
    pub plant_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMoodLogRequest {
    #[validate(length(min = 10, max = 1000, message = "Note must be 10-1000 characters"))]
    pub note_text: String,
}

#[derive(Debug, Serialize)]
pub struct MoodLogCreated {
    pub mood_log: MoodLog,
    pub subjectivity: f64,
    pub emoji: &'static str,
    pub plant_state: &'static str,
    pub growth_points_awarded: i64,
    pub levels_gained: i64,
    pub plant: Plant,
    pub message: String,
}
