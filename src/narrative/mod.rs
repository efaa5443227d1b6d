//! Narrative extraction - turning the run log into readable history
//!
//! Segments each actor's wealth series into eras at local extrema,
//! classifies each era's trend, attributes logged events to eras, and
//! renders the result as prose.

pub mod assembler;
pub mod era;
pub mod extrema;
pub mod naming;
pub mod summary;

pub use assembler::{NarrativeAssembler, NarrativeStyle};
pub use era::{build_eras, Era, EraTrend};
pub use extrema::era_boundaries;
pub use naming::NameBook;
pub use summary::{render_event, trend_sentence, TickToYear};
