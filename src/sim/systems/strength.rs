//! Effective strength aggregation over the tribute hierarchy
//!
//! An actor's strength is its own wealth plus its tributary tree's
//! wealth, transitively. Large trees are strong, but each link is a
//! point of fragility: the same numbers feed the rebellion check.

use rayon::prelude::*;

use crate::core::config::{EngineConfig, StrengthPolicy};
use crate::sim::polity::WorldState;
use crate::sim::registry::SiteRegistry;

/// Direct-tributary table, index -> child indices in registry order
pub fn child_table(registry: &SiteRegistry, state: &WorldState) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); state.polities.len()];
    for (i, polity) in state.polities.iter().enumerate() {
        if let Some(parent) = polity.overlord.and_then(|id| registry.index_of(id)) {
            children[parent].push(i);
        }
    }
    children
}

/// Strength of the subtree rooted at `root` under the given per-level
/// discount. Iterative, with a fixed traversal order so the summation
/// order (and thus the float result) is identical on every run.
pub fn subtree_strength(
    state: &WorldState,
    children: &[Vec<usize>],
    root: usize,
    level_factor: f32,
) -> f32 {
    let mut total = 0.0;
    let mut stack = vec![(root, 1.0f32)];
    while let Some((node, weight)) = stack.pop() {
        total += weight * state.polities[node].wealth;
        for &child in children[node].iter().rev() {
            stack.push((child, weight * level_factor));
        }
    }
    total
}

/// Effective strength of every actor, computed from the previous
/// snapshot only. Fans out across workers above the configured actor
/// count; per-actor traversal order is fixed either way, so the
/// parallel and sequential paths produce bit-identical results.
pub fn effective_strengths(
    registry: &SiteRegistry,
    state: &WorldState,
    config: &EngineConfig,
) -> Vec<f32> {
    let children = child_table(registry, state);
    let factor = config.strength_policy.level_factor();
    let n = state.polities.len();

    if n >= config.parallel_threshold {
        (0..n)
            .into_par_iter()
            .map(|i| subtree_strength(state, &children, i, factor))
            .collect()
    } else {
        (0..n)
            .map(|i| subtree_strength(state, &children, i, factor))
            .collect()
    }
}

/// Overlord strength excluding one direct tributary's subtree. The
/// tributary contributes `level_factor * subtree` to its overlord, so
/// that much comes back out.
pub fn strength_excluding(
    overlord_strength: f32,
    tributary_strength: f32,
    policy: StrengthPolicy,
) -> f32 {
    (overlord_strength - policy.level_factor() * tributary_strength).max(0.0)
}
