use cs_core::ports::RegistryError;
use cs_core::{ConfigError, EntryId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("entry {0} not found")]
    NotFound(EntryId),

    /// The in-memory history already reflects the change; the next mutation
    /// rewrites the whole index.
    #[error("failed to persist history: {0}")]
    Persist(#[source] RegistryError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
