//! War resolution over neighboring, non-allied pairs
//!
//! Wars are deterministic: the stronger side wins outright when its
//! margin clears the configured threshold. The seeded RNG is consumed
//! only to order candidates whose margins tie exactly.

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::sim::polity::WorldState;
use crate::sim::registry::SiteRegistry;

/// One resolved war, by snapshot index
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarOutcome {
    pub winner: usize,
    pub loser: usize,
    pub margin: f32,
}

/// Resolve this tick's wars from the previous snapshot.
///
/// A pair fights only if the two sides are neighbors and belong to
/// different tribute trees (same tree means allied, or in a transitive
/// overlord/tributary relation). The relative gap
/// `(s_hi - s_lo) / s_hi` must strictly exceed `war_margin`; ties and
/// sub-margin differences produce no war.
///
/// Each polity loses at most one war per tick (largest margin wins the
/// claim), and an outcome is dropped if committing it would bend the
/// forest into a cycle given the outcomes already accepted - possible
/// under a discounted strength policy where a deep tributary can
/// out-muscle its own ancestor's conqueror.
pub fn resolve_conflicts(
    registry: &SiteRegistry,
    state: &WorldState,
    strengths: &[f32],
    war_margin: f32,
    rng: &mut ChaCha8Rng,
) -> Vec<WarOutcome> {
    let mut candidates = Vec::new();

    for &(a, b) in registry.neighbor_pairs() {
        if state.root_index(registry, a) == state.root_index(registry, b) {
            continue;
        }
        let (winner, loser) = if strengths[a] > strengths[b] {
            (a, b)
        } else if strengths[b] > strengths[a] {
            (b, a)
        } else {
            continue; // exact tie, no war
        };
        if strengths[winner] <= 0.0 {
            continue;
        }
        let margin = (strengths[winner] - strengths[loser]) / strengths[winner];
        if margin > war_margin {
            candidates.push(WarOutcome { winner, loser, margin });
        }
    }

    // Strongest claims first; exact ties are ordered by the seeded RNG
    candidates.sort_by_key(|c| (OrderedFloat(-c.margin), c.winner, c.loser));
    let mut start = 0;
    while start < candidates.len() {
        let mut end = start + 1;
        while end < candidates.len() && candidates[end].margin == candidates[start].margin {
            end += 1;
        }
        if end - start > 1 {
            candidates[start..end].shuffle(rng);
        }
        start = end;
    }

    // Accept in priority order, one loss per polity, no cycles
    let mut overlords: Vec<Option<usize>> = (0..state.polities.len())
        .map(|i| state.overlord_index(registry, i))
        .collect();
    let mut conquered = vec![false; state.polities.len()];
    let mut outcomes = Vec::new();

    for candidate in candidates {
        if conquered[candidate.loser] {
            continue;
        }
        if creates_cycle(&overlords, candidate.winner, candidate.loser) {
            continue;
        }
        overlords[candidate.loser] = Some(candidate.winner);
        conquered[candidate.loser] = true;
        outcomes.push(candidate);
    }

    outcomes
}

/// Would parenting `loser` under `winner` close a loop? True when the
/// loser already sits on the winner's ancestor chain.
fn creates_cycle(overlords: &[Option<usize>], winner: usize, loser: usize) -> bool {
    let mut cursor = Some(winner);
    let mut steps = 0;
    while let Some(node) = cursor {
        if node == loser {
            return true;
        }
        steps += 1;
        if steps > overlords.len() {
            return true;
        }
        cursor = overlords[node];
    }
    false
}
