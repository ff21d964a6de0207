//! Prompt store adapters
//!
//! Implementations of the [`PromptStore`](songmaster_application::PromptStore)
//! port. Both stores only accept the known [`PromptKey`](songmaster_domain::PromptKey)s
//! on update.

mod memory;
mod toml_store;

pub use memory::InMemoryPromptStore;
pub use toml_store::TomlPromptStore;

use songmaster_application::PromptStoreError;
use songmaster_domain::PromptKey;

fn check_key(key: &str) -> Result<PromptKey, PromptStoreError> {
    key.parse()
        .map_err(|_| PromptStoreError::UnknownKey(key.to_string()))
}
