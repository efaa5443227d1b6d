//! Per-tick rule systems

mod conflict;
mod rebellion;
pub mod strength;
mod tribute;

pub use conflict::{resolve_conflicts, WarOutcome};
pub use rebellion::{check_rebellions, Secession};
pub use strength::effective_strengths;
pub use tribute::{collect_tribute, TributePayment};
