// bridgemon/src/lib.rs
// monitor de un puente de un solo carril
// lo comparten coches hacia el norte, coches hacia el sur y peatones;
// solo un grupo puede estar encima a la vez pero varios del mismo grupo si

pub mod group;
pub mod state;
pub mod policy;
pub mod observer;
pub mod monitor;
pub mod timing;
pub mod entity;

pub use group::{EntityId, Group};
pub use state::{BridgeSnapshot, BridgeState};
pub use policy::{FairnessPolicy, ParsePolicyError};
pub use observer::{BridgeEvent, BridgeObserver, EventKind, NoopObserver, RecordingObserver};
pub use monitor::BridgeMonitor;
pub use timing::{CrossingTime, FixedCrossing};
pub use entity::{CrossingReport, Entity, EntityPhase};
