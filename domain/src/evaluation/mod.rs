//! Orchestrator evaluations
//!
//! The orchestrator returns one [`Evaluation`] per candidate plus a winner.
//! Models are loose about types (scores as strings, a single string where a
//! list is expected), so deserialization here is deliberately forgiving; see
//! [`lenient`].

mod entities;
mod lenient;
mod winner;

pub use entities::{Evaluation, RecommendationBucket, Recommendations, Scores, WinnerAnalysis};
pub use winner::{EvaluationBundle, WinnerSelection};
