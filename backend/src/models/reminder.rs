use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub description: String,
    pub reminder_date: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Open reminder with its plant's name, for the dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReminderWithPlant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub reminder: Reminder,
    pub plant_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReminderRequest {
    #[validate(length(min = 5, max = 200, message = "Reminder must be 5-200 characters"))]
    pub description: String,

    #[serde(deserialize_with = "deserialize_due")]
    pub reminder_date: DateTime<Utc>,
}

/// Accepts RFC 3339, or the `YYYY-MM-DDTHH:MM` shape of an HTML
/// datetime-local input, which is read as UTC.
fn deserialize_due<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_due(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid reminder_date: {raw}")))
}

fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_due_rfc3339() {
        assert_eq!(
            parse_due("2026-05-01T08:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 6, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_due_datetime_local() {
        assert_eq!(
            parse_due("2026-05-01T08:30"),
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_due_rejects_garbage() {
        assert_eq!(parse_due("tomorrow"), None);
    }

    #[test]
    fn test_request_requires_date() {
        let result = serde_json::from_str::<CreateReminderRequest>(r#"{"description":"Water it"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_description_bounds() {
        let req: CreateReminderRequest =
            serde_json::from_str(r#"{"description":"Wet","reminder_date":"2026-05-01T08:30"}"#)
                .unwrap();
        assert!(req.validate().is_err());
    }
}
