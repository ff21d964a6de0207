//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod exchange_logger;
pub mod llm_gateway;
pub mod progress;
pub mod prompt_store;
pub mod song_repository;
