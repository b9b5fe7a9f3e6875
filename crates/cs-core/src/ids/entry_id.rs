use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Opaque identity of one history entry.
///
/// Ids are minted when an entry is created and are not persisted; observers
/// use them to address items for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl_id!(EntryId);
