// bridgemon/src/entity.rs
// ciclo de vida de un coche o peaton que cruza una vez

use crate::group::{EntityId, Group};
use crate::monitor::BridgeMonitor;
use crate::timing::CrossingTime;
use std::thread;
use std::time::{Duration, Instant};

/// Fase de la entidad. Solo avanza, nunca retrocede.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityPhase {
    WantsEnter,
    OnBridge,
    Leaving,
    Done,
}

/// Resumen de un cruce terminado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingReport {
    pub id: EntityId,
    pub group: Group,
    /// tiempo bloqueado dentro de `request_enter`
    pub waited: Duration,
    /// tiempo sobre el puente
    pub crossed: Duration,
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    group: Group,
    phase: EntityPhase,
    waited: Duration,
    crossed: Duration,
}

impl Entity {
    pub fn new(id: EntityId, group: Group) -> Self {
        Self {
            id,
            group,
            phase: EntityPhase::WantsEnter,
            waited: Duration::ZERO,
            crossed: Duration::ZERO,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn phase(&self) -> EntityPhase {
        self.phase
    }

    /// Avanza una transicion y devuelve la fase nueva.
    ///
    /// - `WantsEnter`: bloquea en el monitor hasta ser admitida.
    /// - `OnBridge`: duerme el tiempo de cruce muestreado.
    /// - `Leaving`: avisa la salida al monitor.
    /// - `Done`: no hace nada.
    pub fn step(&mut self, monitor: &BridgeMonitor, timing: &dyn CrossingTime) -> EntityPhase {
        match self.phase {
            EntityPhase::WantsEnter => {
                let start = Instant::now();
                monitor.request_enter_as(self.id, self.group);
                self.waited = start.elapsed();
                self.phase = EntityPhase::OnBridge;
            }
            EntityPhase::OnBridge => {
                let d = timing.crossing_time(self.group);
                thread::sleep(d);
                self.crossed = d;
                self.phase = EntityPhase::Leaving;
            }
            EntityPhase::Leaving => {
                monitor.notify_exit_as(self.id, self.group);
                self.phase = EntityPhase::Done;
            }
            EntityPhase::Done => {}
        }
        tracing::trace!(id = self.id, group = %self.group, phase = ?self.phase, "fase");
        self.phase
    }

    /// Cruza completo: pide entrada, ocupa el puente y sale.
    ///
    /// Si el tiempo de cruce hace panic con la entidad ya admitida, la salida
    /// se avisa igual al desenrollar y el panic sigue su curso.
    pub fn run(mut self, monitor: &BridgeMonitor, timing: &dyn CrossingTime) -> CrossingReport {
        if self.phase == EntityPhase::WantsEnter {
            self.step(monitor, timing);
        }
        if self.phase == EntityPhase::OnBridge {
            let guard = ExitGuard {
                monitor,
                id: self.id,
                group: self.group,
                armed: true,
            };
            self.step(monitor, timing);
            guard.disarm();
        }
        while self.step(monitor, timing) != EntityPhase::Done {}
        CrossingReport {
            id: self.id,
            group: self.group,
            waited: self.waited,
            crossed: self.crossed,
        }
    }
}

// avisa la salida si se suelta armado, o sea durante un panic sobre el puente
struct ExitGuard<'a> {
    monitor: &'a BridgeMonitor,
    id: EntityId,
    group: Group,
    armed: bool,
}

impl ExitGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(id = self.id, group = %self.group, "panic sobre el puente, se libera el lugar");
            self.monitor.notify_exit_as(self.id, self.group);
        }
    }
}
