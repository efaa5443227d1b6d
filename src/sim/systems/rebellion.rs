//! Rebellion check - the cost of imperial overreach
//!
//! A tributary weighs its own strength against what its overlord would
//! keep without it. Once the tributary's share of the combined strength
//! clears the threshold, the overlord has overextended and the
//! tributary secedes.

use crate::core::config::EngineConfig;
use crate::sim::polity::WorldState;
use crate::sim::registry::SiteRegistry;
use crate::sim::systems::strength::strength_excluding;

/// One secession, by snapshot index
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Secession {
    pub tributary: usize,
    pub former_overlord: usize,
}

pub fn check_rebellions(
    registry: &SiteRegistry,
    prev: &WorldState,
    strengths: &[f32],
    config: &EngineConfig,
) -> Vec<Secession> {
    let mut secessions = Vec::new();
    for (tributary, polity) in prev.polities.iter().enumerate() {
        let Some(overlord) = polity.overlord.and_then(|id| registry.index_of(id)) else {
            continue;
        };
        let own = strengths[tributary];
        let rest = strength_excluding(strengths[overlord], own, config.strength_policy);
        let combined = own + rest;
        if combined <= 0.0 {
            continue;
        }
        if own / combined > config.rebellion_threshold {
            secessions.push(Secession {
                tributary,
                former_overlord: overlord,
            });
        }
    }
    secessions
}
