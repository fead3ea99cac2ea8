// Sistema de simulacion del tunel

mod report;
mod runner;
mod spawner;
mod watchdog;

pub use report::{GroupStats, SimReport};
pub use runner::run_simulation;
pub use spawner::Generator;
pub use watchdog::{ProgressObserver, Watchdog};
