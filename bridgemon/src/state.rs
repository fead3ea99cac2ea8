// bridgemon/src/state.rs
// estado compartido del puente: ocupacion, espera y turno
// no sabe nada de locks; el monitor lo guarda detras de un Mutex

use crate::group::Group;
use std::fmt;

/// Foto del estado del puente tomada con el lock adquirido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeSnapshot {
    pub occupancy: [u32; 3],
    pub waiting: [u32; 3],
    pub turn: Group,
}

impl BridgeSnapshot {
    pub fn occupancy(&self, group: Group) -> u32 {
        self.occupancy[group.index()]
    }

    pub fn waiting(&self, group: Group) -> u32 {
        self.waiting[group.index()]
    }

    /// cuantos grupos tienen al menos un miembro encima
    pub fn active_groups(&self) -> usize {
        self.occupancy.iter().filter(|&&n| n > 0).count()
    }

    /// exclusion entre grupos: a lo sumo uno ocupa el puente
    pub fn is_exclusive(&self) -> bool {
        self.active_groups() <= 1
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.iter().all(|&n| n == 0)
    }

    pub fn total_waiting(&self) -> u32 {
        self.waiting.iter().sum()
    }
}

impl fmt::Display for BridgeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [on, os, op] = self.occupancy;
        let [wn, ws, wp] = self.waiting;
        write!(
            f,
            "M: <north:{on}, south:{os}, ped:{op}, north_waiting:{wn}, south_waiting:{ws}, ped_waiting:{wp}, turn:{}>",
            self.turn
        )
    }
}

/// Contadores del puente.
///
/// Las operaciones son pasos atomicos respecto al lock del monitor:
/// `begin_wait` al pedir entrada, `admit` al ser admitido y `release`
/// al salir. Un decremento por debajo de cero es un error de protocolo
/// y provoca panic en vez de dar la vuelta.
#[derive(Debug, Clone)]
pub struct BridgeState {
    occupancy: [u32; 3],
    waiting: [u32; 3],
    turn: Group,
}

impl Default for BridgeState {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeState {
    pub fn new() -> Self {
        Self {
            occupancy: [0; 3],
            waiting: [0; 3],
            turn: Group::NorthCar,
        }
    }

    pub fn occupancy(&self, group: Group) -> u32 {
        self.occupancy[group.index()]
    }

    pub fn waiting(&self, group: Group) -> u32 {
        self.waiting[group.index()]
    }

    pub fn turn(&self) -> Group {
        self.turn
    }

    /// la entidad se anota como esperando antes de evaluar el predicado
    pub fn begin_wait(&mut self, group: Group) {
        self.waiting[group.index()] += 1;
    }

    /// pasa de esperando a ocupando
    pub fn admit(&mut self, group: Group) {
        let i = group.index();
        self.waiting[i] = self.waiting[i]
            .checked_sub(1)
            .unwrap_or_else(|| panic!("admit sin espera previa para {group}"));
        self.occupancy[i] += 1;
    }

    /// Un miembro del grupo sale. Devuelve `true` si el grupo quedo vacio.
    pub fn release(&mut self, group: Group) -> bool {
        let i = group.index();
        self.occupancy[i] = self.occupancy[i]
            .checked_sub(1)
            .unwrap_or_else(|| panic!("salida de {group} con el puente sin {group}s"));
        self.occupancy[i] == 0
    }

    pub fn pass_turn(&mut self, to: Group) {
        self.turn = to;
    }

    pub fn snapshot(&self) -> BridgeSnapshot {
        BridgeSnapshot {
            occupancy: self.occupancy,
            waiting: self.waiting,
            turn: self.turn,
        }
    }
}
