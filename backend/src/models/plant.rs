use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::mood_log::MoodLog;
use crate::models::reminder::Reminder;
use crate::services::growth::Growth;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlantType {
    Sunflower,
    Rose,
    Cactus,
    Tulip,
    CherryBlossom,
    Hibiscus,
    Lotus,
    Seedling,
}

impl PlantType {
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Sunflower => "🌻",
            Self::Rose => "🌹",
            Self::Cactus => "🌵",
            Self::Tulip => "🌷",
            Self::CherryBlossom => "🌸",
            Self::Hibiscus => "🌺",
            Self::Lotus => "🪷",
            Self::Seedling => "🌱",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: PlantType,
    pub level: i64,
    pub growth_points: i64,
    pub created_at: DateTime<Utc>,
}

impl Plant {
    pub fn growth(&self) -> Growth {
        Growth::new(self.level, self.growth_points)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlantRequest {
    #[validate(length(min = 1, max = 100, message = "Plant name must be 1-100 characters"))]
    pub name: String,

    #[serde(rename = "type")]
    pub plant_type: PlantType,
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlantRequest {
    #[validate(length(min = 1, max = 100, message = "Plant name must be 1-100 characters"))]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub plant_type: Option<PlantType>,
}

#[derive(Debug, Serialize)]
pub struct PlantDetail {
    #[serde(flatten)]
    pub plant: Plant,
    pub emoji: &'static str,
    pub mood_logs: Vec<MoodLog>,
    pub reminders: Vec<Reminder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_reads_type_field() {
        let req: CreatePlantRequest =
            serde_json::from_str(r#"{"name":"Sunny","type":"cherry_blossom"}"#).unwrap();
        assert_eq!(req.plant_type, PlantType::CherryBlossom);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_unknown_type() {
        let result = serde_json::from_str::<CreatePlantRequest>(r#"{"name":"Sunny","type":"oak"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_rejects_empty_name() {
        let req: CreatePlantRequest = serde_json::from_str(r#"{"name":"","type":"rose"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_allows_partial() {
        let req: UpdatePlantRequest = serde_json::from_str(r#"{"type":"lotus"}"#).unwrap();
        assert!(req.name.is_none());
        assert_eq!(req.plant_type, Some(PlantType::Lotus));
        assert!(req.validate().is_ok());
    }
}
