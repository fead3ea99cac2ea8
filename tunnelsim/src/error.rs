// tunnelsim/src/error.rs
// errores del simulador; el monitor en si no tiene errores recuperables

use bridgemon::{BridgeSnapshot, Group, ParsePolicyError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no se pudo leer {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no se pudo interpretar {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Policy(#[from] ParsePolicyError),
    #[error("valor invalido para `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("simulacion trabada: {idle_ms} ms sin eventos con el puente vacio y gente esperando ({snapshot})")]
    Stalled { idle_ms: u64, snapshot: BridgeSnapshot },
    #[error("no se pudo lanzar el hilo {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("un hilo de {0} termino con panic")]
    Panicked(Group),
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;
