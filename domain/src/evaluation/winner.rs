//! Evaluation bundles and winner selection

use super::entities::{Evaluation, Scores, WinnerAnalysis};
use super::lenient;
use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything one orchestrator call returns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationBundle {
    pub evaluations: BTreeMap<AgentId, Evaluation>,
    pub winner_agent_id: Option<AgentId>,
    pub winner_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_analysis: Option<WinnerAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparative_insights: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_guidance: Option<Value>,
}

impl EvaluationBundle {
    /// Build a bundle from the orchestrator's JSON object.
    ///
    /// Accepts the detailed shape (`evaluations` keyed by agent id) and the
    /// older flat shape (`scores` and `feedback` keyed by agent id).
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(mut root) = value else {
            return Err("orchestrator response is not a JSON object".to_string());
        };

        let evaluations = match root.remove("evaluations") {
            Some(Value::Object(entries)) => entries
                .into_iter()
                .map(|(id, entry)| {
                    serde_json::from_value::<Evaluation>(entry)
                        .map(|eval| (AgentId::new(id.clone()), eval))
                        .map_err(|e| format!("evaluation for {}: {}", id, e))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()?,
            Some(_) => return Err("`evaluations` is not an object".to_string()),
            None => Self::legacy_evaluations(&root)
                .ok_or_else(|| "response has no `evaluations`".to_string())?,
        };

        let winner_analysis = match root.remove("winner_analysis") {
            Some(v @ Value::Object(_)) => serde_json::from_value::<WinnerAnalysis>(v).ok(),
            _ => None,
        };

        let winner_agent_id = root
            .get("winner_agent_id")
            .map(lenient::text_from)
            .filter(|id| !id.trim().is_empty())
            .map(AgentId::new);

        let winner_reason = root
            .get("winner_reason")
            .map(lenient::text_from)
            .filter(|r| !r.is_empty())
            .or_else(|| winner_analysis.as_ref().map(|a| a.reason.clone()))
            .unwrap_or_default();

        Ok(Self {
            evaluations,
            winner_agent_id,
            winner_reason,
            winner_analysis,
            comparative_insights: root.remove("comparative_insights"),
            user_guidance: root.remove("user_guidance"),
        })
    }

    fn legacy_evaluations(root: &serde_json::Map<String, Value>) -> Option<BTreeMap<AgentId, Evaluation>> {
        let scores = root.get("scores")?.as_object()?;
        let feedback = root.get("feedback").and_then(Value::as_object);

        let evaluations = scores
            .iter()
            .map(|(id, raw)| {
                let scores: Scores = serde_json::from_value(raw.clone()).unwrap_or_default();
                let analysis = feedback
                    .and_then(|f| f.get(id))
                    .map(lenient::text_from)
                    .unwrap_or_default();
                (AgentId::new(id.clone()), Evaluation::new(scores, analysis))
            })
            .collect();
        Some(evaluations)
    }

    pub fn evaluation(&self, id: &AgentId) -> Option<&Evaluation> {
        self.evaluations.get(id)
    }

    /// Pick the winner among `candidates`.
    ///
    /// The orchestrator's named winner wins when it is one of the candidates.
    /// Otherwise the evaluated candidate with the highest total score is
    /// chosen (ties go to the lowest agent id). Returns `None` when no
    /// candidate was evaluated.
    pub fn select_winner<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a AgentId>,
    ) -> Option<WinnerSelection> {
        let candidates: Vec<&AgentId> = candidates.into_iter().collect();

        if let Some(named) = &self.winner_agent_id
            && candidates.contains(&named)
        {
            return Some(WinnerSelection {
                agent_id: named.clone(),
                reason: self.winner_reason.clone(),
                analysis: self.winner_analysis.clone(),
                override_agent_id: None,
            });
        }

        let mut best: Option<(&AgentId, f64)> = None;
        for id in candidates {
            let Some(eval) = self.evaluations.get(id) else {
                continue;
            };
            let total = eval.scores.total();
            match best {
                Some((best_id, best_total))
                    if total < best_total || (total == best_total && id >= best_id) => {}
                _ => best = Some((id, total)),
            }
        }

        best.map(|(id, total)| WinnerSelection {
            agent_id: id.clone(),
            reason: format!("Highest total score ({:.2})", total),
            analysis: None,
            override_agent_id: None,
        })
    }
}

/// The verdict for a round, with an optional user override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSelection {
    pub agent_id: AgentId,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<WinnerAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_agent_id: Option<AgentId>,
}

impl WinnerSelection {
    pub fn new(agent_id: impl Into<AgentId>, reason: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            reason: reason.into(),
            analysis: None,
            override_agent_id: None,
        }
    }

    /// The user's pick when present, otherwise the orchestrator's.
    pub fn effective_winner(&self) -> &AgentId {
        self.override_agent_id.as_ref().unwrap_or(&self.agent_id)
    }

    pub fn is_overridden(&self) -> bool {
        self.override_agent_id.is_some()
    }

    pub fn set_override(&mut self, agent_id: AgentId) {
        self.override_agent_id = Some(agent_id);
    }

    pub fn clear_override(&mut self) {
        self.override_agent_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(names: &[&str]) -> Vec<AgentId> {
        names.iter().map(|n| AgentId::new(*n)).collect()
    }

    fn detailed() -> Value {
        json!({
            "evaluations": {
                "claude": {
                    "scores": {"music_style": 9, "lyrics": 9, "originality": 8, "cohesion": 9},
                    "analysis": "Vivid imagery",
                    "strengths": ["imagery"],
                    "weaknesses": ["long bridge"],
                    "recommendations": {"critical_fixes": [], "quick_wins": ["trim bridge"]}
                },
                "gpt": {
                    "scores": {"music_style": 7, "lyrics": 6, "originality": 6, "cohesion": 7},
                    "analysis": "Solid"
                }
            },
            "winner_agent_id": "claude",
            "winner_analysis": {
                "reason": "Best imagery",
                "key_differentiators": ["imagery", "hook"],
                "best_for": "late-night radio"
            }
        })
    }

    #[test]
    fn test_from_value_detailed() {
        let bundle = EvaluationBundle::from_value(detailed()).unwrap();
        assert_eq!(bundle.evaluations.len(), 2);
        assert_eq!(bundle.winner_agent_id, Some(AgentId::new("claude")));
        assert_eq!(bundle.winner_reason, "Best imagery");
        let analysis = bundle.winner_analysis.as_ref().unwrap();
        assert_eq!(analysis.key_differentiators.len(), 2);
    }

    #[test]
    fn test_from_value_legacy_shape() {
        let bundle = EvaluationBundle::from_value(json!({
            "scores": {"a": {"music_style": 8, "lyrics": 7, "originality": 6, "cohesion": 8}},
            "feedback": {"a": "Good groove"},
            "winner_agent_id": "a"
        }))
        .unwrap();
        let eval = bundle.evaluation(&AgentId::new("a")).unwrap();
        assert_eq!(eval.analysis, "Good groove");
        assert_eq!(eval.scores.total(), 7.25);
    }

    #[test]
    fn test_from_value_requires_evaluations() {
        let err = EvaluationBundle::from_value(json!({"winner_agent_id": "a"})).unwrap_err();
        assert!(err.contains("evaluations"));
        assert!(EvaluationBundle::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_select_named_winner() {
        let bundle = EvaluationBundle::from_value(detailed()).unwrap();
        let winner = bundle.select_winner(&ids(&["claude", "gpt"])).unwrap();
        assert_eq!(winner.agent_id.as_str(), "claude");
        assert_eq!(winner.reason, "Best imagery");
    }

    #[test]
    fn test_unknown_winner_falls_back_to_highest_total() {
        let mut bundle = EvaluationBundle::from_value(detailed()).unwrap();
        bundle.winner_agent_id = Some(AgentId::new("grok"));
        let winner = bundle.select_winner(&ids(&["claude", "gpt"])).unwrap();
        assert_eq!(winner.agent_id.as_str(), "claude");
        assert!(winner.reason.starts_with("Highest total score"));
    }

    #[test]
    fn test_fallback_averages_only_surviving_scores() {
        let bundle = EvaluationBundle::from_value(json!({
            "evaluations": {
                "a": {"scores": {"music_style": 7, "lyrics": 7, "originality": 7, "cohesion": 7}},
                "b": {"scores": {"music_style": 9}}
            }
        }))
        .unwrap();
        let winner = bundle.select_winner(&ids(&["a", "b"])).unwrap();
        assert_eq!(winner.agent_id.as_str(), "b");
    }

    #[test]
    fn test_no_evaluated_candidates_has_no_winner() {
        let bundle = EvaluationBundle::from_value(json!({"evaluations": {}})).unwrap();
        assert!(bundle.select_winner(&ids(&["a"])).is_none());
    }

    #[test]
    fn test_override_takes_precedence() {
        let mut winner = WinnerSelection::new("claude", "Best imagery");
        assert_eq!(winner.effective_winner().as_str(), "claude");

        winner.set_override(AgentId::new("gpt"));
        assert!(winner.is_overridden());
        assert_eq!(winner.effective_winner().as_str(), "gpt");

        winner.clear_override();
        assert_eq!(winner.effective_winner().as_str(), "claude");
    }
}
