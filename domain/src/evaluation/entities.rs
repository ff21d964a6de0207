//! Evaluation value objects

use super::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Rubric scores on a 1-10 scale
///
/// Every score is optional: truncated orchestrator output often loses the
/// tail of a score object, and a missing score is not a zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub music_style: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub lyrics: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub originality: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cohesion: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_alignment: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub suno_execution_prediction: Option<f64>,
}

impl Scores {
    pub fn new(music_style: f64, lyrics: f64, originality: f64, cohesion: f64) -> Self {
        Self {
            music_style: Some(music_style),
            lyrics: Some(lyrics),
            originality: Some(originality),
            cohesion: Some(cohesion),
            request_alignment: None,
            suno_execution_prediction: None,
        }
    }

    /// Present scores with their short labels, in rubric order.
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("style", self.music_style),
            ("lyrics", self.lyrics),
            ("originality", self.originality),
            ("cohesion", self.cohesion),
            ("alignment", self.request_alignment),
            ("execution", self.suno_execution_prediction),
        ]
        .into_iter()
        .filter_map(|(label, score)| score.map(|s| (label, s)))
    }

    /// Mean of every rubric score that is present, 0 when none is.
    pub fn total(&self) -> f64 {
        let (sum, count) = self
            .labelled()
            .fold((0.0, 0usize), |(sum, count), (_, s)| (sum + s, count + 1));
        if count == 0 { 0.0 } else { sum / count as f64 }
    }

    /// True when the orchestrator produced no usable score at all.
    pub fn is_empty(&self) -> bool {
        self.labelled().next().is_none()
    }
}

/// Recommendation buckets in fixed priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationBucket {
    CriticalFixes,
    QuickWins,
    DepthEnhancements,
    SunoOptimization,
}

impl RecommendationBucket {
    /// All buckets, highest priority first.
    pub const ALL: [RecommendationBucket; 4] = [
        RecommendationBucket::CriticalFixes,
        RecommendationBucket::QuickWins,
        RecommendationBucket::DepthEnhancements,
        RecommendationBucket::SunoOptimization,
    ];

    /// JSON key of the bucket.
    pub fn key(&self) -> &'static str {
        match self {
            RecommendationBucket::CriticalFixes => "critical_fixes",
            RecommendationBucket::QuickWins => "quick_wins",
            RecommendationBucket::DepthEnhancements => "depth_enhancements",
            RecommendationBucket::SunoOptimization => "suno_optimization",
        }
    }

    /// Heading used in prompts and console output.
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationBucket::CriticalFixes => "Critical fixes (must address)",
            RecommendationBucket::QuickWins => "Quick wins",
            RecommendationBucket::DepthEnhancements => "Depth enhancements",
            RecommendationBucket::SunoOptimization => "Suno optimization",
        }
    }
}

/// Structured recommendations, partitioned by priority
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub critical_fixes: Vec<String>,
    pub quick_wins: Vec<String>,
    pub depth_enhancements: Vec<String>,
    pub suno_optimization: Vec<String>,
}

impl Recommendations {
    pub fn get(&self, bucket: RecommendationBucket) -> &[String] {
        match bucket {
            RecommendationBucket::CriticalFixes => &self.critical_fixes,
            RecommendationBucket::QuickWins => &self.quick_wins,
            RecommendationBucket::DepthEnhancements => &self.depth_enhancements,
            RecommendationBucket::SunoOptimization => &self.suno_optimization,
        }
    }

    /// Buckets with their directives, highest priority first.
    pub fn buckets(&self) -> impl Iterator<Item = (RecommendationBucket, &[String])> {
        RecommendationBucket::ALL
            .into_iter()
            .map(move |bucket| (bucket, self.get(bucket)))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets().all(|(_, items)| items.is_empty())
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let bucket = |key: &str| {
                    map.get(key)
                        .map(lenient::string_list_from)
                        .unwrap_or_default()
                };
                Self {
                    critical_fixes: bucket("critical_fixes"),
                    quick_wins: bucket("quick_wins"),
                    depth_enhancements: bucket("depth_enhancements"),
                    suno_optimization: bucket("suno_optimization"),
                }
            }
            // Older orchestrator prompts returned recommendations as prose.
            Value::String(_) | Value::Array(_) => Self {
                quick_wins: lenient::string_list_from(value),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for Recommendations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// The orchestrator's critique of one candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub scores: Scores,
    #[serde(default, deserialize_with = "lenient::text")]
    pub analysis: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Recommendations,
    /// Fields this crate does not model (`suno_compliance`,
    /// `matched_request`, `predicted_suno_result`, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Evaluation {
    pub fn new(scores: Scores, analysis: impl Into<String>) -> Self {
        Self {
            scores,
            analysis: analysis.into(),
            ..Self::default()
        }
    }

    pub fn with_strengths(mut self, strengths: Vec<String>) -> Self {
        self.strengths = strengths;
        self
    }

    pub fn with_weaknesses(mut self, weaknesses: Vec<String>) -> Self {
        self.weaknesses = weaknesses;
        self
    }

    pub fn with_recommendations(mut self, recommendations: Recommendations) -> Self {
        self.recommendations = recommendations;
        self
    }
}

/// Structured explanation of the winner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerAnalysis {
    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub key_differentiators: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub best_for: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scores_total_core_rubric() {
        let scores = Scores::new(8.0, 7.0, 6.0, 9.0);
        assert_eq!(scores.total(), 7.5);
    }

    #[test]
    fn test_scores_total_includes_optional() {
        let mut scores = Scores::new(8.0, 8.0, 8.0, 8.0);
        scores.request_alignment = Some(3.0);
        assert_eq!(scores.total(), 7.0);
    }

    #[test]
    fn test_scores_accept_strings() {
        let scores: Scores =
            serde_json::from_value(json!({"music_style": "8", "lyrics": 7})).unwrap();
        assert_eq!(scores.music_style, Some(8.0));
        assert_eq!(scores.lyrics, Some(7.0));
        assert_eq!(scores.cohesion, None);
        assert!(scores.request_alignment.is_none());
    }

    #[test]
    fn test_scores_total_ignores_missing() {
        let scores: Scores = serde_json::from_value(json!({"music_style": 9})).unwrap();
        assert_eq!(scores.total(), 9.0);

        let scores: Scores =
            serde_json::from_value(json!({"music_style": 9, "lyrics": "6", "cohesion": null}))
                .unwrap();
        assert_eq!(scores.total(), 7.5);
        assert!(!scores.is_empty());
    }

    #[test]
    fn test_scores_without_values() {
        let scores: Scores = serde_json::from_value(json!({"lyrics": "great"})).unwrap();
        assert!(scores.is_empty());
        assert_eq!(scores.total(), 0.0);
    }

    #[test]
    fn test_scores_reject_non_finite() {
        let scores: Scores =
            serde_json::from_value(json!({"music_style": "NaN", "lyrics": "inf", "cohesion": 7}))
                .unwrap();
        assert_eq!(scores.music_style, None);
        assert_eq!(scores.lyrics, None);
        assert_eq!(scores.total(), 7.0);
    }

    #[test]
    fn test_recommendations_partial_object() {
        let recs: Recommendations = serde_json::from_value(json!({
            "critical_fixes": ["fix the bridge"],
            "quick_wins": "shorten intro"
        }))
        .unwrap();
        assert_eq!(recs.critical_fixes, vec!["fix the bridge"]);
        assert_eq!(recs.quick_wins, vec!["shorten intro"]);
        assert!(recs.depth_enhancements.is_empty());
    }

    #[test]
    fn test_recommendations_from_prose() {
        let recs: Recommendations = serde_json::from_value(json!("tighten the chorus")).unwrap();
        assert_eq!(recs.quick_wins, vec!["tighten the chorus"]);
    }

    #[test]
    fn test_bucket_order() {
        let recs = Recommendations::default();
        let keys: Vec<_> = recs.buckets().map(|(b, _)| b.key()).collect();
        assert_eq!(
            keys,
            vec!["critical_fixes", "quick_wins", "depth_enhancements", "suno_optimization"]
        );
    }

    #[test]
    fn test_evaluation_keeps_unknown_fields() {
        let eval: Evaluation = serde_json::from_value(json!({
            "scores": {"music_style": 9, "lyrics": 8, "originality": 7, "cohesion": 8},
            "analysis": "Strong hook",
            "strengths": ["hook"],
            "weaknesses": ["chorus repeats too much"],
            "predicted_suno_result": "radio-ready"
        }))
        .unwrap();
        assert_eq!(eval.weaknesses, vec!["chorus repeats too much"]);
        assert_eq!(eval.extra["predicted_suno_result"], "radio-ready");
        assert!(eval.recommendations.is_empty());
    }
}
