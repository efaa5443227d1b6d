use thiserror::Error;

use crate::core::types::{PolityId, Tick};

#[derive(Error, Debug)]
pub enum HegemonError {
    #[error("duplicate site id: {0}")]
    DuplicateSite(PolityId),

    #[error("negative base resource for {id}: {value}")]
    NegativeResource { id: PolityId, value: f32 },

    #[error("negative initial wealth for {id}: {value}")]
    NegativeWealth { id: PolityId, value: f32 },

    #[error("site {referrer} references unknown site {unknown}")]
    UnknownSite { referrer: PolityId, unknown: PolityId },

    #[error("initial overlord relation contains a cycle through {0}")]
    OverlordCycle(PolityId),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("tick appended out of order: expected {expected}, got {got}")]
    OutOfOrderTick { expected: Tick, got: Tick },

    #[error("internal invariant violated at tick {tick}: {detail}")]
    InvariantViolation { tick: Tick, detail: String },

    #[error("unknown actor: {0}")]
    UnknownActor(PolityId),

    #[error("invalid tick window [{start}, {end}], log ends at {last}")]
    InvalidTickWindow { start: Tick, end: Tick, last: Tick },

    #[error("malformed log: {0}")]
    MalformedLog(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, HegemonError>;
