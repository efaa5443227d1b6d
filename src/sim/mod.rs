//! Tribute-war simulation engine
//!
//! An agent-based model of coalition-free conquest: polities extract
//! tribute from conquered neighbors, aggregate strength through their
//! tribute trees, and collapse when the tree outgrows its trunk.
//! Deterministic for a given registry, config and seed.

pub mod engine;
pub mod events;
pub mod output;
pub mod polity;
pub mod registry;
pub mod systems;

pub use engine::{simulate, TributeEngine};
pub use events::{Event, EventKind, EventLog};
pub use output::{EventRow, SimulationOutput, SimulationStats, WealthRow};
pub use polity::{PolityState, WorldState};
pub use registry::{Site, SiteRegistry};
