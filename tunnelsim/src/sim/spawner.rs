// Generador de entidades de un grupo: lanza un hilo por entidad con
// llegadas exponenciales y espera a que todas terminen de cruzar

use crate::error::{Result, SimError};
use crate::model::ExpArrival;
use bridgemon::{BridgeMonitor, CrossingReport, CrossingTime, Entity, EntityId, Group};
use std::sync::Arc;
use std::thread;

pub struct Generator {
    group: Group,
    count: u32,
    arrivals: ExpArrival,
    monitor: Arc<BridgeMonitor>,
    timing: Arc<dyn CrossingTime>,
    next_id: EntityId,
}

impl Generator {
    pub fn new(
        group: Group,
        count: u32,
        arrivals: ExpArrival,
        monitor: Arc<BridgeMonitor>,
        timing: Arc<dyn CrossingTime>,
    ) -> Self {
        Self {
            group,
            count,
            arrivals,
            monitor,
            timing,
            next_id: 1,
        }
    }

    fn spawn_entity(&mut self) -> Result<thread::JoinHandle<CrossingReport>> {
        let id = self.next_id;
        self.next_id += 1;

        let group = self.group;
        let monitor = Arc::clone(&self.monitor);
        let timing = Arc::clone(&self.timing);
        let name = format!("{}-{}", group, id);

        tracing::debug!(%group, id, "creando entidad");
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || Entity::new(id, group).run(&monitor, timing.as_ref()))
            .map_err(|source| SimError::Spawn { name, source })
    }

    /// Lanza las `count` entidades y junta sus resumenes en orden de llegada.
    pub fn run(mut self) -> Result<Vec<CrossingReport>> {
        let mut handles = Vec::with_capacity(self.count as usize);
        for _ in 0..self.count {
            handles.push(self.spawn_entity()?);
            thread::sleep(self.arrivals.next_gap());
        }

        let group = self.group;
        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| SimError::Panicked(group)))
            .collect()
    }
}
