//! Simulation configuration with documented constants
//!
//! All tunable rule parameters are collected here with explanations of
//! their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};

use crate::core::error::{HegemonError, Result};

/// How effective strength aggregates over a tribute tree.
///
/// An actor's strength is its own wealth plus its tributary tree's wealth.
/// The exact aggregation is a policy rather than a fixed formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum StrengthPolicy {
    /// Plain transitive sum: every member of the tree contributes its
    /// full wealth.
    Sum,
    /// Each hierarchy level below an actor contributes `factor^depth` of
    /// its wealth. Distant tributaries count for less; deep empires are
    /// weaker than their ledgers suggest.
    Discounted { factor: f32 },
}

impl StrengthPolicy {
    /// Per-level contribution weight. `Sum` is the `factor == 1.0` case.
    pub fn level_factor(&self) -> f32 {
        match self {
            StrengthPolicy::Sum => 1.0,
            StrengthPolicy::Discounted { factor } => *factor,
        }
    }
}

impl Default for StrengthPolicy {
    fn default() -> Self {
        StrengthPolicy::Sum
    }
}

/// Configuration for a simulation run
///
/// These values have been tuned to produce good emergent behavior.
/// Changing them will affect how quickly empires form and how long
/// they survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of ticks to simulate. The engine has no convergence
    /// condition; it always runs the full horizon.
    pub horizon: u32,

    /// Relative strength gap required for a war, as a fraction of the
    /// stronger side's strength.
    ///
    /// A war fires between neighbors when `(s_hi - s_lo) / s_hi`
    /// exceeds this. At 0.25, an actor needs a full third more strength
    /// than its target. Lower values mean more frequent conquest.
    pub war_margin: f32,

    /// Fraction of a tributary's post-income wealth transferred to its
    /// direct overlord every tick. Must be strictly between 0 and 1.
    ///
    /// Higher fractions starve tributaries faster, which feeds the
    /// rebellion check sooner.
    pub tribute_fraction: f32,

    /// Share of an overlord's total strength a tributary must represent
    /// before it secedes.
    ///
    /// At 0.45, a tributary rebels once it carries nearly half the
    /// empire. Together with `war_margin` this sets the overreach
    /// ceiling on empire size.
    pub rebellion_threshold: f32,

    /// Minimum wealth deviation for a local extremum to start a new
    /// narrative era. Extrema below this are treated as noise and the
    /// adjacent eras merge. Zero keeps every extremum.
    pub min_prominence: f32,

    /// Random seed. Consumed only for tie-breaking where the rules
    /// leave residual ambiguity; two runs with the same registry,
    /// parameters and seed produce identical logs.
    pub seed: u64,

    /// Effective strength aggregation policy.
    pub strength_policy: StrengthPolicy,

    /// Minimum actor count before per-actor strength computation uses
    /// parallel processing. Below this threshold, thread overhead
    /// exceeds benefits.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon: 200,
            war_margin: 0.25,
            tribute_fraction: 0.15,
            rebellion_threshold: 0.45,
            min_prominence: 0.0,
            seed: 42,
            strength_policy: StrengthPolicy::default(),
            parallel_threshold: 1000,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML. Missing fields take their defaults.
    /// The parsed config is validated before being returned.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate parameter ranges. Called before a simulation starts;
    /// an invalid config never produces a log entry.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(HegemonError::InvalidParameter {
                name: "horizon",
                reason: "must be a positive number of ticks".into(),
            });
        }
        if !(0.0..1.0).contains(&self.war_margin) {
            return Err(HegemonError::InvalidParameter {
                name: "war_margin",
                reason: format!("{} is outside [0, 1)", self.war_margin),
            });
        }
        if self.tribute_fraction <= 0.0 || self.tribute_fraction >= 1.0 {
            return Err(HegemonError::InvalidParameter {
                name: "tribute_fraction",
                reason: format!("{} is outside (0, 1)", self.tribute_fraction),
            });
        }
        if self.rebellion_threshold <= 0.0 || self.rebellion_threshold >= 1.0 {
            return Err(HegemonError::InvalidParameter {
                name: "rebellion_threshold",
                reason: format!("{} is outside (0, 1)", self.rebellion_threshold),
            });
        }
        if self.min_prominence < 0.0 || !self.min_prominence.is_finite() {
            return Err(HegemonError::InvalidParameter {
                name: "min_prominence",
                reason: format!("{} is not a non-negative number", self.min_prominence),
            });
        }
        if let StrengthPolicy::Discounted { factor } = self.strength_policy {
            if factor <= 0.0 || factor > 1.0 {
                return Err(HegemonError::InvalidParameter {
                    name: "strength_policy.factor",
                    reason: format!("{} is outside (0, 1]", factor),
                });
            }
        }
        Ok(())
    }
}
