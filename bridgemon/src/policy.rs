// bridgemon/src/policy.rs
// politicas de admision
//
// `None` solo mira la ocupacion de los otros grupos: segura y sin deadlock,
// pero un grupo que se repone sin parar deja con hambre a los demas.
//
// `TurnRotation` agrega el turno y los contadores de espera. El turno pasa al
// sucesor del grupo que sale en cada salida, aunque ese sucesor no tenga a
// nadie esperando. Si eso pasa mientras los otros dos grupos esperan, ninguno
// de los dos cumple su predicado hasta que llegue alguien del grupo con turno:
// es un deadlock conocido de esta politica y se conserva tal cual.

use crate::group::Group;
use crate::state::BridgeState;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FairnessPolicy {
    /// sin turno, solo exclusion por ocupacion
    #[default]
    None,
    /// turno rotativo en cada salida
    TurnRotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("politica desconocida `{0}` (esperado `none` o `turn-rotation`)")]
pub struct ParsePolicyError(pub String);

impl FairnessPolicy {
    /// Predicado de admision de `group`. Se evalua con el lock adquirido y
    /// se vuelve a evaluar en cada despertar.
    pub fn may_enter(self, state: &BridgeState, group: Group) -> bool {
        let [a, b] = group.rivals();
        let clear = state.occupancy(a) == 0 && state.occupancy(b) == 0;

        match self {
            FairnessPolicy::None => clear,
            FairnessPolicy::TurnRotation => {
                let nobody_else_waiting = state.waiting(a) == 0 && state.waiting(b) == 0;
                clear && (state.turn() == group || nobody_else_waiting)
            }
        }
    }

    /// si cada salida mueve el turno
    pub fn rotates_turn(self) -> bool {
        matches!(self, FairnessPolicy::TurnRotation)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FairnessPolicy::None => "none",
            FairnessPolicy::TurnRotation => "turn-rotation",
        }
    }
}

impl fmt::Display for FairnessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FairnessPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FairnessPolicy::None),
            "turn-rotation" | "turn_rotation" => Ok(FairnessPolicy::TurnRotation),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}
