use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::mood_log::{MoodLog, SentimentLabel};
use crate::AppState;

/// Number of most recent logs plotted on the mood chart.
const CHART_WINDOW: usize = 30;

#[derive(Debug, Serialize)]
pub struct MoodSeries {
    /// `MM/DD` of each point.
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
    pub sentiments: Vec<SentimentLabel>,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct MoodStats {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub mood_data: MoodSeries,
    pub stats: MoodStats,
}

pub async fn get_insights(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<InsightResponse>> {
    let logs = sqlx::query_as::<_, MoodLog>(
        r#"
        SELECT m.* FROM mood_logs m
        JOIN plants p ON p.id = m.plant_id
        WHERE p.user_id = $1
        ORDER BY m.created_at ASC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(summarize(&logs)))
}

/// Chart series over the last [`CHART_WINDOW`] logs plus label counts over
/// all of them. `logs` must be oldest first.
fn summarize(logs: &[MoodLog]) -> InsightResponse {
    let recent = &logs[logs.len().saturating_sub(CHART_WINDOW)..];

    let mood_data = MoodSeries {
        labels: recent
            .iter()
            .map(|log| log.created_at.format("%m/%d").to_string())
            .collect(),
        scores: recent.iter().map(|log| log.sentiment_score).collect(),
        sentiments: recent.iter().map(|log| log.sentiment_label).collect(),
    };

    let mut stats = MoodStats {
        total: logs.len(),
        ..MoodStats::default()
    };
    for log in logs {
        match log.sentiment_label {
            SentimentLabel::Positive => stats.positive += 1,
            SentimentLabel::Neutral => stats.neutral += 1,
            SentimentLabel::Negative => stats.negative += 1,
        }
    }

    InsightResponse { mood_data, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn logs(labels: &[SentimentLabel]) -> Vec<MoodLog> {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| MoodLog {
                id: Uuid::new_v4(),
                plant_id: Uuid::nil(),
                note_text: "a note long enough".into(),
                sentiment_score: match label {
                    SentimentLabel::Positive => 0.5,
                    SentimentLabel::Neutral => 0.0,
                    SentimentLabel::Negative => -0.5,
                },
                sentiment_label: *label,
                created_at: start + Duration::days(i as i64),
            })
            .collect()
    }

    #[test]
    fn test_summarize_empty() {
        let insight = summarize(&[]);
        assert_eq!(insight.stats, MoodStats::default());
        assert!(insight.mood_data.labels.is_empty());
    }

    #[test]
    fn test_summarize_counts_labels() {
        use SentimentLabel::*;
        let insight = summarize(&logs(&[Positive, Positive, Neutral, Negative]));
        assert_eq!(
            insight.stats,
            MoodStats {
                total: 4,
                positive: 2,
                neutral: 1,
                negative: 1,
            }
        );
        assert_eq!(insight.mood_data.labels[0], "01/01");
        assert_eq!(insight.mood_data.scores, vec![0.5, 0.5, 0.0, -0.5]);
    }

    #[test]
    fn test_chart_keeps_last_thirty() {
        let all = logs(&[SentimentLabel::Neutral; 45]);
        let insight = summarize(&all);
        assert_eq!(insight.stats.total, 45);
        assert_eq!(insight.mood_data.labels.len(), CHART_WINDOW);
        // Day 16 of January is the 16th log (index 15), the first one kept.
        assert_eq!(insight.mood_data.labels[0], "01/16");
        assert_eq!(insight.mood_data.labels[29], "02/14");
    }
}
