use thiserror::Error;

use crate::hex::Hex;

#[derive(Error, Debug)]
pub enum EvoError {
    #[error("Unknown {kind} definition: {name}")]
    UnknownDefinition { kind: &'static str, name: String },

    #[error("Invalid placement strategy selector: {0}")]
    InvalidPlacementStrategy(u8),

    #[error("Compound {0} is a cloud compound and cannot back an environmental food source")]
    CloudCompoundNotEnvironmental(String),

    #[error("Organelle {organelle} overlaps an existing organelle at {hex:?}")]
    OrganelleOverlap { organelle: String, hex: Hex },

    #[error("Island reconnection did not converge after {0} iterations")]
    IslandRepairDiverged(usize),

    #[error("Species ids exhausted: {count} ids from {first} pass u32::MAX")]
    SpeciesIdOverflow { first: u32, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Data parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl EvoError {
    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownDefinition {
            kind,
            name: name.into(),
        }
    }
}

impl From<toml::de::Error> for EvoError {
    fn from(e: toml::de::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvoError>;
