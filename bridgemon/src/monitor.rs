// bridgemon/src/monitor.rs
// monitor del puente: un Mutex para todo el estado y una Condvar por grupo

use crate::group::{EntityId, Group};
use crate::observer::{BridgeEvent, BridgeObserver, EventKind, NoopObserver};
use crate::policy::FairnessPolicy;
use crate::state::{BridgeSnapshot, BridgeState};
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Monitor compartido por todas las entidades.
///
/// Se crea una vez por puente y se comparte con `Arc`. Todas las lecturas y
/// escrituras de ocupacion, espera y turno pasan por el mismo lock.
pub struct BridgeMonitor {
    policy: FairnessPolicy,
    state: Mutex<BridgeState>,
    // indexadas con Group::index()
    conds: [Condvar; 3],
    observer: Arc<dyn BridgeObserver>,
}

impl fmt::Debug for BridgeMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeMonitor")
            .field("policy", &self.policy)
            .field("state", &self.snapshot())
            .finish()
    }
}

impl BridgeMonitor {
    pub fn new(policy: FairnessPolicy) -> Self {
        Self::with_observer(policy, Arc::new(NoopObserver))
    }

    pub fn with_observer(policy: FairnessPolicy, observer: Arc<dyn BridgeObserver>) -> Self {
        Self {
            policy,
            state: Mutex::new(BridgeState::new()),
            conds: [Condvar::new(), Condvar::new(), Condvar::new()],
            observer,
        }
    }

    pub fn policy(&self) -> FairnessPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> BridgeSnapshot {
        self.lock_state().snapshot()
    }

    /// Pide entrar al puente. Bloquea hasta que el predicado del grupo se
    /// cumpla; al volver el llamador ya cuenta como ocupante. No hay timeout.
    pub fn request_enter(&self, group: Group) {
        self.enter(None, group);
    }

    /// igual que `request_enter` pero etiqueta los eventos con la entidad
    pub fn request_enter_as(&self, id: EntityId, group: Group) {
        self.enter(Some(id), group);
    }

    /// Avisa que un miembro del grupo salio del puente.
    ///
    /// # Panics
    /// Si el grupo no tiene a nadie encima.
    pub fn notify_exit(&self, group: Group) {
        self.exit(None, group);
    }

    pub fn notify_exit_as(&self, id: EntityId, group: Group) {
        self.exit(Some(id), group);
    }

    fn enter(&self, entity: Option<EntityId>, group: Group) {
        let mut state = self.lock_state();
        state.begin_wait(group);
        self.emit(entity, group, EventKind::WantsEnter, &state);

        while !self.policy.may_enter(&state, group) {
            tracing::trace!(%group, ?entity, "esperando el puente");
            state = self.conds[group.index()]
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.admit(group);
        self.emit(entity, group, EventKind::Entered, &state);
    }

    fn exit(&self, entity: Option<EntityId>, group: Group) {
        let mut state = self.lock_state();
        self.emit(entity, group, EventKind::Leaving, &state);

        let drained = state.release(group);
        if self.policy.rotates_turn() {
            state.pass_turn(group.successor());
        }
        self.emit(entity, group, EventKind::Left, &state);

        // solo el vaciado de un grupo puede volver verdadero el predicado
        // de los otros dos; el del propio grupo no depende de su ocupacion
        if drained {
            tracing::trace!(%group, turn = %state.turn(), "grupo vacio, despertando rivales");
            for rival in group.rivals() {
                self.conds[rival.index()].notify_all();
            }
        }
    }

    fn emit(&self, entity: Option<EntityId>, group: Group, kind: EventKind, state: &BridgeState) {
        self.observer.on_event(&BridgeEvent {
            entity,
            group,
            kind,
            snapshot: state.snapshot(),
        });
    }

    // el estado nunca queda a medias entre dos lineas que puedan hacer panic,
    // por eso un lock envenenado se puede seguir usando
    fn lock_state(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
