//! Application layer for SongMaster
//!
//! This crate contains use cases, port definitions, prompt resolution and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod prompts;
pub mod use_cases;

// Re-export commonly used types
pub use config::GenerationParams;
pub use ports::{
    exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    prompt_store::{PromptEntry, PromptStore, PromptStoreError},
    song_repository::{RepositoryError, SavedSong, SongRepository},
};
pub use prompts::{PromptCache, PromptResolver};
pub use use_cases::evaluate_round::{
    EvaluateRoundError, EvaluateRoundInput, EvaluateRoundUseCase, RoundEvaluation,
};
pub use use_cases::generate_artists::{GenerateArtistsError, GenerateArtistsUseCase};
pub use use_cases::generate_round::{GenerateRoundError, GenerateRoundInput, GenerateRoundUseCase};
pub use use_cases::iterate_round::{IterateRoundError, IterateRoundInput, IterateRoundUseCase};
pub use use_cases::run_round::{RoundOutcome, RunIterationInput, RunRoundInput, RunRoundUseCase};
pub use use_cases::save_song::{SaveSongError, SaveSongInput, SaveSongUseCase};
pub use use_cases::shared::CallError;
