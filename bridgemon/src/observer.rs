// bridgemon/src/observer.rs
// gancho de observacion del monitor
// el monitor avisa cada cambio pero nunca lee lo que el observador hace

use crate::group::{EntityId, Group};
use crate::state::BridgeSnapshot;
use std::sync::{Mutex, PoisonError};

/// momento del protocolo en que se emite el evento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// entrada a `request_enter`, ya anotado como esperando
    WantsEnter,
    /// salida de `request_enter`, ya ocupando el puente
    Entered,
    /// entrada a `notify_exit`, todavia ocupando
    Leaving,
    /// salida de `notify_exit`
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeEvent {
    pub entity: Option<EntityId>,
    pub group: Group,
    pub kind: EventKind,
    pub snapshot: BridgeSnapshot,
}

/// Receptor de eventos del monitor.
///
/// Se llama con el lock del monitor adquirido, asi que los eventos llegan en
/// el mismo orden en que cambia el estado. La implementacion no debe
/// bloquearse ni volver a llamar al monitor.
pub trait BridgeObserver: Send + Sync {
    fn on_event(&self, event: &BridgeEvent);
}

impl<F> BridgeObserver for F
where
    F: Fn(&BridgeEvent) + Send + Sync,
{
    fn on_event(&self, event: &BridgeEvent) {
        self(event)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BridgeObserver for NoopObserver {
    fn on_event(&self, _event: &BridgeEvent) {}
}

/// Guarda todos los eventos en memoria, pensado para las pruebas.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<BridgeEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BridgeEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// eventos de una entidad concreta, en orden
    pub fn kinds_for(&self, group: Group, entity: EntityId) -> Vec<EventKind> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.group == group && e.entity == Some(entity))
            .map(|e| e.kind)
            .collect()
    }
}

impl BridgeObserver for RecordingObserver {
    fn on_event(&self, event: &BridgeEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
