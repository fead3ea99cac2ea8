// modulo raiz de tunnelsim
// configura y corre la simulacion del tunel sobre el monitor de bridgemon

pub mod error;
pub mod log;
pub mod config;
pub mod model;
pub mod sim;

// reexports comodos
pub use error::{ConfigError, Result, SimError};
pub use config::{ConfigLayer, GroupConfig, GroupLayer, SimConfig};
pub use model::*;
pub use sim::*;
