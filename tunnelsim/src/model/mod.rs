// reune los muestreadores de tiempos de la simulacion

mod sampling;

pub use sampling::{derive_seed, ExpArrival, NormalCrossing};
