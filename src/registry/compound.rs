//! Compound definitions

use serde::{Deserialize, Serialize};

/// How a compound exists in a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundKind {
    /// Floats in clouds that cells collect (glucose, hydrogen sulfide)
    Cloud,
    /// Ambient condition of the whole patch (sunlight, oxygen, temperature)
    Environmental,
    /// Only exists inside cells (the energy carrier)
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundDefinition {
    pub name: String,
    pub display_name: String,
    pub kind: CompoundKind,
}

impl CompoundDefinition {
    pub fn is_cloud(&self) -> bool {
        self.kind == CompoundKind::Cloud
    }

    pub fn is_environmental(&self) -> bool {
        self.kind == CompoundKind::Environmental
    }
}
