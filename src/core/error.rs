use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum UniverseError {
    #[error("dado {0} não encontrado")]
    NotFound(UnitId),

    #[error("argumento inválido: {0}")]
    InvalidArgument(String),

    #[error("energia insuficiente no dado {unit}: {available:.2} < {requested:.2}")]
    InsufficientEnergy {
        unit: UnitId,
        available: f32,
        requested: f32,
    },

    #[error("persistence failure at {path:?}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UniverseError>;
