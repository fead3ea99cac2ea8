// Muestreo de tiempos: cruce normal recortado en cero y llegadas exponenciales

use crate::config::{section, GroupConfig, SimConfig};
use crate::error::ConfigError;
use bridgemon::{CrossingTime, Group};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Semilla para un flujo concreto (`stream`) a partir de la semilla global.
/// Sin semilla global se toma una al azar.
pub fn derive_seed(seed: Option<u64>, stream: u64) -> u64 {
    match seed {
        Some(s) => s
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(stream.wrapping_mul(0xBF58_476D_1CE4_E5B9)),
        None => rand::random(),
    }
}

// satura en Duration::MAX si el producto no cabe
fn scaled(secs: f64, scale: f64) -> Duration {
    Duration::try_from_secs_f64((secs * scale).max(0.0)).unwrap_or(Duration::MAX)
}

/// Tiempo de cruce con una normal por grupo, recortada en cero.
///
/// La comparten todas las entidades, por eso el generador va detras de un Mutex.
pub struct NormalCrossing {
    dists: [Normal<f64>; 3],
    scale: f64,
    rng: Mutex<StdRng>,
}

impl NormalCrossing {
    pub fn from_config(config: &SimConfig, seed: u64) -> Result<Self, ConfigError> {
        let normal = |g: Group| {
            let GroupConfig {
                crossing_mean_secs,
                crossing_spread_secs,
                ..
            } = *config.group(g);
            Normal::new(crossing_mean_secs, crossing_spread_secs).map_err(|err| {
                ConfigError::invalid(format!("{}.crossing_spread_secs", section(g)), err.to_string())
            })
        };

        Ok(Self {
            dists: [
                normal(Group::NorthCar)?,
                normal(Group::SouthCar)?,
                normal(Group::Pedestrian)?,
            ],
            scale: config.time_scale,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }
}

impl CrossingTime for NormalCrossing {
    fn crossing_time(&self, group: Group) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let secs = self.dists[group.index()].sample(&mut *rng);
        scaled(secs, self.scale)
    }
}

/// Tiempos entre llegadas de un grupo. Cada generador tiene el suyo.
pub struct ExpArrival {
    dist: Exp<f64>,
    scale: f64,
    rng: StdRng,
}

impl ExpArrival {
    pub fn new(mean_secs: f64, scale: f64, seed: u64) -> Result<Self, ConfigError> {
        let dist = Exp::new(1.0 / mean_secs)
            .map_err(|err| ConfigError::invalid("mean_arrival_secs", err.to_string()))?;
        Ok(Self {
            dist,
            scale,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn next_gap(&mut self) -> Duration {
        scaled(self.dist.sample(&mut self.rng), self.scale)
    }
}
