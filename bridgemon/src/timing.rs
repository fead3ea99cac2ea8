// bridgemon/src/timing.rs
// fuente del tiempo que una entidad pasa sobre el puente
// las distribuciones reales viven en el simulador; aqui solo la interfaz

use crate::group::Group;
use std::time::Duration;

pub trait CrossingTime: Send + Sync {
    fn crossing_time(&self, group: Group) -> Duration;
}

impl<F> CrossingTime for F
where
    F: Fn(Group) -> Duration + Send + Sync,
{
    fn crossing_time(&self, group: Group) -> Duration {
        self(group)
    }
}

/// mismo tiempo para todos los grupos, util en pruebas
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCrossing(pub Duration);

impl CrossingTime for FixedCrossing {
    fn crossing_time(&self, _group: Group) -> Duration {
        self.0
    }
}
