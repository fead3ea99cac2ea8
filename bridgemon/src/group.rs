// bridgemon/src/group.rs
// grupos de trafico que se excluyen en el puente

use std::fmt;

/// identificador de un coche o peaton dentro de su grupo
pub type EntityId = u32;

/// Grupo al que pertenece cada entidad que cruza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    NorthCar,
    SouthCar,
    Pedestrian,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::NorthCar, Group::SouthCar, Group::Pedestrian];

    /// posicion del grupo en los arreglos de contadores
    pub const fn index(self) -> usize {
        match self {
            Group::NorthCar => 0,
            Group::SouthCar => 1,
            Group::Pedestrian => 2,
        }
    }

    /// Grupo que recibe el turno cuando sale un miembro de este.
    /// El ciclo es fijo: norte -> sur -> peatones -> norte.
    pub const fn successor(self) -> Group {
        match self {
            Group::NorthCar => Group::SouthCar,
            Group::SouthCar => Group::Pedestrian,
            Group::Pedestrian => Group::NorthCar,
        }
    }

    /// los otros dos grupos, en orden fijo
    pub const fn rivals(self) -> [Group; 2] {
        match self {
            Group::NorthCar => [Group::SouthCar, Group::Pedestrian],
            Group::SouthCar => [Group::NorthCar, Group::Pedestrian],
            Group::Pedestrian => [Group::NorthCar, Group::SouthCar],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Group::NorthCar => "north car",
            Group::SouthCar => "south car",
            Group::Pedestrian => "pedestrian",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
