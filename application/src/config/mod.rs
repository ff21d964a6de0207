//! Application-level configuration.
//!
//! - [`GenerationParams`]: temperature, token budgets, timeouts

pub mod execution_params;

pub use execution_params::GenerationParams;
