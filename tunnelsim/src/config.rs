// tunnelsim/src/config.rs
// configuracion de la simulacion
//
// Capas, de menor a mayor prioridad: valores por defecto, archivo TOML,
// variables de entorno `TUNNEL_*` y flags de la linea de comandos. Cada capa
// es un `ConfigLayer` con todos los campos opcionales.

use crate::error::ConfigError;
use bridgemon::{FairnessPolicy, Group};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// tope para cualquier tiempo de un grupo, en segundos (un dia)
pub const MAX_SECS: f64 = 86_400.0;

/// Parametros de un grupo: cuantos llegan, cada cuanto y cuanto tardan.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupConfig {
    pub count: u32,
    /// media de la exponencial entre llegadas
    pub mean_arrival_secs: f64,
    /// media y desviacion de la normal del cruce
    pub crossing_mean_secs: f64,
    pub crossing_spread_secs: f64,
}

impl GroupConfig {
    /// 100 coches, uno cada 0.5 s en promedio, cruce N(1, 0.5)
    pub fn cars() -> Self {
        Self {
            count: 100,
            mean_arrival_secs: 0.5,
            crossing_mean_secs: 1.0,
            crossing_spread_secs: 0.5,
        }
    }

    /// 10 peatones, uno cada 5 s en promedio, cruce N(30, 10)
    pub fn pedestrians() -> Self {
        Self {
            count: 10,
            mean_arrival_secs: 5.0,
            crossing_mean_secs: 30.0,
            crossing_spread_secs: 10.0,
        }
    }

    fn validate(&self, group: Group) -> Result<(), ConfigError> {
        let check = |name: &str, v: f64, zero_ok: bool| {
            let low_ok = if zero_ok { v >= 0.0 } else { v > 0.0 };
            if v.is_finite() && low_ok && v <= MAX_SECS {
                Ok(())
            } else {
                let low = if zero_ok { "0" } else { "mayor que 0" };
                Err(ConfigError::invalid(
                    format!("{}.{name}", section(group)),
                    format!("debe estar entre {low} y {MAX_SECS} s, se recibio {v}"),
                ))
            }
        };
        check("mean_arrival_secs", self.mean_arrival_secs, false)?;
        check("crossing_mean_secs", self.crossing_mean_secs, false)?;
        check("crossing_spread_secs", self.crossing_spread_secs, true)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub north: GroupConfig,
    pub south: GroupConfig,
    pub pedestrians: GroupConfig,
    pub policy: FairnessPolicy,
    /// factor que multiplica todos los tiempos muestreados
    pub time_scale: f64,
    pub seed: Option<u64>,
    /// tiempo sin eventos tras el cual el watchdog declara la corrida trabada
    pub stall_timeout_ms: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            north: GroupConfig::cars(),
            south: GroupConfig::cars(),
            pedestrians: GroupConfig::pedestrians(),
            policy: FairnessPolicy::None,
            time_scale: 1.0,
            seed: None,
            stall_timeout_ms: None,
        }
    }
}

impl SimConfig {
    pub fn group(&self, group: Group) -> &GroupConfig {
        match group {
            Group::NorthCar => &self.north,
            Group::SouthCar => &self.south,
            Group::Pedestrian => &self.pedestrians,
        }
    }

    pub fn group_mut(&mut self, group: Group) -> &mut GroupConfig {
        match group {
            Group::NorthCar => &mut self.north,
            Group::SouthCar => &mut self.south,
            Group::Pedestrian => &mut self.pedestrians,
        }
    }

    pub fn total_entities(&self) -> u32 {
        Group::ALL.iter().map(|&g| self.group(g).count).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for g in Group::ALL {
            self.group(g).validate(g)?;
        }
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(ConfigError::invalid(
                "time_scale",
                format!("debe ser finito y mayor que cero, se recibio {}", self.time_scale),
            ));
        }
        if self.stall_timeout_ms == Some(0) {
            return Err(ConfigError::invalid("stall_timeout_ms", "debe ser mayor que cero"));
        }
        Ok(())
    }
}

/// nombre de la seccion TOML de cada grupo
pub fn section(group: Group) -> &'static str {
    match group {
        Group::NorthCar => "north",
        Group::SouthCar => "south",
        Group::Pedestrian => "pedestrians",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupLayer {
    pub count: Option<u32>,
    pub mean_arrival_secs: Option<f64>,
    pub crossing_mean_secs: Option<f64>,
    pub crossing_spread_secs: Option<f64>,
}

impl GroupLayer {
    fn apply_to(&self, cfg: &mut GroupConfig) {
        if let Some(v) = self.count {
            cfg.count = v;
        }
        if let Some(v) = self.mean_arrival_secs {
            cfg.mean_arrival_secs = v;
        }
        if let Some(v) = self.crossing_mean_secs {
            cfg.crossing_mean_secs = v;
        }
        if let Some(v) = self.crossing_spread_secs {
            cfg.crossing_spread_secs = v;
        }
    }
}

/// Una capa de configuracion parcial (archivo o flags).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub policy: Option<String>,
    pub time_scale: Option<f64>,
    pub seed: Option<u64>,
    pub stall_timeout_ms: Option<u64>,
    pub north: Option<GroupLayer>,
    pub south: Option<GroupLayer>,
    pub pedestrians: Option<GroupLayer>,
}

impl ConfigLayer {
    pub fn apply_to(&self, config: &mut SimConfig) -> Result<(), ConfigError> {
        if let Some(raw) = &self.policy {
            config.policy = raw.parse()?;
        }
        if let Some(v) = self.time_scale {
            config.time_scale = v;
        }
        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
        if let Some(v) = self.stall_timeout_ms {
            config.stall_timeout_ms = Some(v);
        }
        for g in Group::ALL {
            let layer = match g {
                Group::NorthCar => &self.north,
                Group::SouthCar => &self.south,
                Group::Pedestrian => &self.pedestrians,
            };
            if let Some(layer) = layer {
                layer.apply_to(config.group_mut(g));
            }
        }
        Ok(())
    }
}

pub fn load_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn apply_env_overrides(config: &mut SimConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Aplica `TUNNEL_POLICY`, `TUNNEL_TIME_SCALE` y `TUNNEL_SEED` tomados de
/// `lookup`. Los valores invalidos se ignoran con un warning.
pub fn apply_overrides_from(config: &mut SimConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(raw) = lookup("TUNNEL_POLICY") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            match trimmed.parse::<FairnessPolicy>() {
                Ok(policy) => config.policy = policy,
                Err(err) => tracing::warn!("TUNNEL_POLICY invalida, se ignora: {err}"),
            }
        }
    }

    if let Some(raw) = lookup("TUNNEL_TIME_SCALE") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            match trimmed.parse::<f64>() {
                Ok(v) => config.time_scale = v,
                Err(err) => tracing::warn!("TUNNEL_TIME_SCALE invalida, se ignora: {err}"),
            }
        }
    }

    if let Some(raw) = lookup("TUNNEL_SEED") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            match trimmed.parse::<u64>() {
                Ok(v) => config.seed = Some(v),
                Err(err) => tracing::warn!("TUNNEL_SEED invalida, se ignora: {err}"),
            }
        }
    }
}

/// Junta todas las capas en orden: defaults, archivo (si hay), entorno segun
/// `env` y por ultimo `overrides`. Valida solo el resultado final, asi un
/// valor malo del archivo que otra capa pisa no aborta la carga.
pub fn resolve(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    overrides: &ConfigLayer,
) -> Result<SimConfig, ConfigError> {
    let mut config = SimConfig::default();
    if let Some(path) = path {
        load_file(path)?.apply_to(&mut config)?;
    }
    apply_overrides_from(&mut config, env);
    overrides.apply_to(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// `resolve` con el entorno real del proceso.
pub fn load(path: Option<&Path>, overrides: &ConfigLayer) -> Result<SimConfig, ConfigError> {
    resolve(path, |key| std::env::var(key).ok(), overrides)
}
