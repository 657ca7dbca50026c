//! Sentiment scoring for mood notes.
//!
//! A [`SentimentModel`] turns free text into a [`Polarity`]; [`classify`]
//! buckets the polarity score into a [`SentimentLabel`], which in turn fixes
//! the growth award for the plant the note was written against.

use serde::{Deserialize, Serialize};

/// Scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Growth points a mood log with this label awards its plant.
    pub fn growth_award(self) -> i64 {
        match self {
            Self::Positive => 20,
            Self::Neutral => 5,
            Self::Negative => 0,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Positive => "😊",
            Self::Neutral => "😐",
            Self::Negative => "😔",
        }
    }

    /// Animation state the client plays for the plant after a log.
    pub fn plant_state(self) -> &'static str {
        match self {
            Self::Positive => "growing",
            Self::Neutral => "idle",
            Self::Negative => "calming",
        }
    }
}

/// Raw model output: polarity in [-1, 1], subjectivity in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Polarity {
    pub score: f64,
    pub subjectivity: f64,
}

pub trait SentimentModel: Send + Sync {
    fn polarity(&self, text: &str) -> Polarity;
}

/// Lexicon-based model backed by VADER. The compound score is the polarity;
/// the share of positive plus negative lexicon weight stands in for
/// subjectivity.
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderModel;

impl SentimentModel for VaderModel {
    fn polarity(&self, text: &str) -> Polarity {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        Polarity {
            score: get("compound"),
            subjectivity: get("pos") + get("neg"),
        }
    }
}

/// Classified result of a single note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sentiment {
    pub score: f64,
    pub subjectivity: f64,
    pub label: SentimentLabel,
    pub growth_points: i64,
}

pub fn classify(score: f64) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Score `text` with `model` and classify it. Non-finite scores count as 0.0.
pub fn analyze(model: &dyn SentimentModel, text: &str) -> Sentiment {
    let raw = model.polarity(text);
    let score = if raw.score.is_finite() {
        raw.score.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let subjectivity = if raw.subjectivity.is_finite() {
        raw.subjectivity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let label = classify(score);

    Sentiment {
        score,
        subjectivity,
        label,
        growth_points: label.growth_award(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl SentimentModel for Fixed {
        fn polarity(&self, _text: &str) -> Polarity {
            Polarity {
                score: self.0,
                subjectivity: 0.5,
            }
        }
    }

    #[test]
    fn test_classify_positive() {
        let s = analyze(&Fixed(0.5), "anything");
        assert_eq!(s.label, SentimentLabel::Positive);
        assert_eq!(s.growth_points, 20);
    }

    #[test]
    fn test_classify_neutral_at_zero() {
        let s = analyze(&Fixed(0.0), "anything");
        assert_eq!(s.label, SentimentLabel::Neutral);
        assert_eq!(s.growth_points, 5);
    }

    #[test]
    fn test_classify_negative() {
        let s = analyze(&Fixed(-0.2), "anything");
        assert_eq!(s.label, SentimentLabel::Negative);
        assert_eq!(s.growth_points, 0);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(classify(0.1), SentimentLabel::Neutral);
        assert_eq!(classify(-0.1), SentimentLabel::Neutral);
        assert_eq!(classify(0.100001), SentimentLabel::Positive);
        assert_eq!(classify(-0.100001), SentimentLabel::Negative);
    }

    #[test]
    fn test_non_finite_score_is_neutral() {
        let s = analyze(&Fixed(f64::NAN), "anything");
        assert_eq!(s.score, 0.0);
        assert_eq!(s.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let s = analyze(&Fixed(3.0), "anything");
        assert_eq!(s.score, 1.0);
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_label_presentation() {
        assert_eq!(SentimentLabel::Positive.emoji(), "😊");
        assert_eq!(SentimentLabel::Negative.plant_state(), "calming");
        assert_eq!(SentimentLabel::Neutral.as_str(), "neutral");
    }

    #[test]
    fn test_vader_scores_clear_cases() {
        let model = VaderModel;

        let happy = analyze(&model, "I love my plant, today was a wonderful and happy day!");
        assert_eq!(happy.label, SentimentLabel::Positive);
        assert!(happy.subjectivity > 0.0);

        let sad = analyze(&model, "I feel terrible, sad and angry about everything.");
        assert_eq!(sad.label, SentimentLabel::Negative);

        let flat = analyze(&model, "The plant is on the table.");
        assert_eq!(flat.label, SentimentLabel::Neutral);
    }
}
