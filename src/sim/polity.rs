//! Per-tick polity state and the immutable world snapshot
//!
//! The overlord relation is a parent-index forest over a flat vector of
//! polity records: each record stores only its overlord's id or None.
//! Cycle-freedom is an invariant checked after every commit rather than
//! a property of the representation.

use serde::{Deserialize, Serialize};

use crate::core::error::{HegemonError, Result};
use crate::core::types::{PolityId, Tick};
use crate::sim::registry::SiteRegistry;

/// One polity's state within a snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolityState {
    pub id: PolityId,
    pub wealth: f32,
    /// Direct overlord, None = independent
    pub overlord: Option<PolityId>,
}

impl PolityState {
    pub fn is_independent(&self) -> bool {
        self.overlord.is_none()
    }
}

/// Complete world snapshot for one tick
///
/// Entries are in registry order: `polities[i].id == registry.sites()[i].id`.
/// A snapshot is produced once per tick and never mutated after being
/// logged; tick t is computed from the tick t-1 snapshot only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub tick: Tick,
    pub polities: Vec<PolityState>,
}

impl WorldState {
    /// Initial snapshot (tick 0) from the registry's starting wealth
    /// and overlord relation.
    pub fn initial(registry: &SiteRegistry) -> Self {
        Self {
            tick: 0,
            polities: registry
                .iter()
                .map(|site| PolityState {
                    id: site.id,
                    wealth: site.initial_wealth,
                    overlord: site.initial_overlord,
                })
                .collect(),
        }
    }

    pub fn get(&self, registry: &SiteRegistry, id: PolityId) -> Option<&PolityState> {
        registry.index_of(id).map(|i| &self.polities[i])
    }

    /// Index of the direct overlord, if any
    pub fn overlord_index(&self, registry: &SiteRegistry, index: usize) -> Option<usize> {
        self.polities[index]
            .overlord
            .and_then(|id| registry.index_of(id))
    }

    /// Root of the tribute tree containing `index`. Bounded by the
    /// polity count; on a (never expected) cycle the walk stops at the
    /// bound and the post-commit forest check reports it.
    pub fn root_index(&self, registry: &SiteRegistry, index: usize) -> usize {
        let mut cursor = index;
        for _ in 0..self.polities.len() {
            match self.overlord_index(registry, cursor) {
                Some(parent) => cursor = parent,
                None => return cursor,
            }
        }
        cursor
    }

    /// Indices of direct tributaries of `index`, in registry order
    pub fn direct_tributaries(&self, index: usize) -> Vec<usize> {
        let id = self.polities[index].id;
        self.polities
            .iter()
            .enumerate()
            .filter(|(_, p)| p.overlord == Some(id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Verify the overlord relation is a forest. A cycle here is a
    /// fatal internal bug, never recovered silently.
    pub fn verify_forest(&self, registry: &SiteRegistry) -> Result<()> {
        for start in 0..self.polities.len() {
            let mut cursor = start;
            let mut steps = 0;
            while let Some(parent) = self.overlord_index(registry, cursor) {
                steps += 1;
                if parent == start || steps > self.polities.len() {
                    return Err(HegemonError::InvariantViolation {
                        tick: self.tick,
                        detail: format!(
                            "overlord cycle through {}",
                            self.polities[start].id
                        ),
                    });
                }
                cursor = parent;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::sim::registry::Site;

    fn registry(overlords: &[Option<u32>]) -> SiteRegistry {
        let sites = overlords
            .iter()
            .enumerate()
            .map(|(i, &overlord)| Site {
                id: PolityId(i as u32),
                position: Vec2::default(),
                neighbors: vec![],
                base_resource: 10.0,
                initial_wealth: 100.0,
                initial_overlord: overlord.map(PolityId),
            })
            .collect();
        SiteRegistry::new(sites).unwrap()
    }

    #[test]
    fn test_initial_snapshot_mirrors_registry() {
        let registry = registry(&[None, Some(0), Some(1)]);
        let state = WorldState::initial(&registry);
        assert_eq!(state.tick, 0);
        assert_eq!(state.polities[1].overlord, Some(PolityId(0)));
        assert_eq!(state.polities[2].wealth, 100.0);
    }

    #[test]
    fn test_root_index_walks_chain() {
        let registry = registry(&[None, Some(0), Some(1)]);
        let state = WorldState::initial(&registry);
        assert_eq!(state.root_index(&registry, 2), 0);
        assert_eq!(state.root_index(&registry, 0), 0);
    }

    #[test]
    fn test_direct_tributaries() {
        let registry = registry(&[None, Some(0), Some(0), Some(1)]);
        let state = WorldState::initial(&registry);
        assert_eq!(state.direct_tributaries(0), vec![1, 2]);
        assert_eq!(state.direct_tributaries(1), vec![3]);
        assert!(state.direct_tributaries(3).is_empty());
    }

    #[test]
    fn test_verify_forest_detects_cycle() {
        let registry = registry(&[None, Some(0)]);
        let mut state = WorldState::initial(&registry);
        // corrupt the forest: 0 -> 1 -> 0
        state.polities[0].overlord = Some(PolityId(1));
        assert!(matches!(
            state.verify_forest(&registry),
            Err(HegemonError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_verify_forest_accepts_chain() {
        let registry = registry(&[None, Some(0), Some(1), None]);
        let state = WorldState::initial(&registry);
        assert!(state.verify_forest(&registry).is_ok());
    }
}
