//! Site registry - the immutable set of polity sites a run is built on
//!
//! Sites are produced externally (terrain + placement models) and consumed
//! here as a fixed input: id, position, neighbor relation, base resource
//! value, plus the starting wealth and overlord relation. All structural
//! validation happens at construction; a registry that constructs
//! successfully can be simulated without runtime surprises.

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{HegemonError, Result};
use crate::core::types::{PolityId, Vec2};

/// Starting wealth used when a TOML registry omits the field.
/// Midpoint of the generator's uniform [300, 500] draw.
fn default_initial_wealth() -> f32 {
    400.0
}

/// One polity site
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Site {
    pub id: PolityId,
    pub position: Vec2,
    pub neighbors: Vec<PolityId>,
    /// Wealth gained per tick before tribute
    pub base_resource: f32,
    #[serde(default = "default_initial_wealth")]
    pub initial_wealth: f32,
    /// Starting subordination, None = independent
    #[serde(default)]
    pub initial_overlord: Option<PolityId>,
}

#[derive(Deserialize)]
struct RegistryFile {
    site: Vec<Site>,
}

/// Validated, immutable collection of sites
#[derive(Clone, Debug)]
pub struct SiteRegistry {
    sites: Vec<Site>,
    index: AHashMap<PolityId, usize>,
    /// Deduplicated neighbor pairs as (index, index), lexicographic
    pairs: Vec<(usize, usize)>,
}

impl SiteRegistry {
    /// Build a registry, validating every structural constraint the
    /// simulation depends on. Fails with the specific violated
    /// constraint; the simulation never starts on a bad registry.
    pub fn new(sites: Vec<Site>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(sites.len());
        for (i, site) in sites.iter().enumerate() {
            if index.insert(site.id, i).is_some() {
                return Err(HegemonError::DuplicateSite(site.id));
            }
            if site.base_resource < 0.0 {
                return Err(HegemonError::NegativeResource {
                    id: site.id,
                    value: site.base_resource,
                });
            }
            if site.initial_wealth < 0.0 {
                return Err(HegemonError::NegativeWealth {
                    id: site.id,
                    value: site.initial_wealth,
                });
            }
        }

        for site in &sites {
            for &neighbor in &site.neighbors {
                if !index.contains_key(&neighbor) {
                    return Err(HegemonError::UnknownSite {
                        referrer: site.id,
                        unknown: neighbor,
                    });
                }
            }
            if let Some(overlord) = site.initial_overlord {
                if !index.contains_key(&overlord) {
                    return Err(HegemonError::UnknownSite {
                        referrer: site.id,
                        unknown: overlord,
                    });
                }
            }
        }

        // The overlord relation must form a forest. Walk each parent
        // chain; more steps than sites means a cycle.
        for site in &sites {
            let mut cursor = site.initial_overlord;
            let mut steps = 0;
            while let Some(overlord) = cursor {
                if overlord == site.id || steps > sites.len() {
                    return Err(HegemonError::OverlordCycle(site.id));
                }
                cursor = sites[index[&overlord]].initial_overlord;
                steps += 1;
            }
        }

        let mut pairs = Vec::new();
        for (i, site) in sites.iter().enumerate() {
            for &neighbor in &site.neighbors {
                let j = index[&neighbor];
                if i != j {
                    pairs.push((i.min(j), i.max(j)));
                }
            }
        }
        pairs.sort_unstable();
        pairs.dedup();

        Ok(Self { sites, index, pairs })
    }

    /// Load a registry from a TOML document of `[[site]]` tables.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(text)?;
        Self::new(file.site)
    }

    /// Generate a demo registry: `count` sites on a ring with a few
    /// random chords, uniform [300, 500] starting wealth and modest
    /// per-tick income. Deterministic for a given seed.
    pub fn generate(count: u32, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let count = count.max(2);
        let mut sites: Vec<Site> = (0..count)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / count as f32;
                let prev = PolityId((i + count - 1) % count);
                let next = PolityId((i + 1) % count);
                Site {
                    id: PolityId(i),
                    position: Vec2::new(angle.cos() * 100.0, angle.sin() * 100.0),
                    neighbors: vec![prev, next],
                    base_resource: rng.gen_range(15.0..25.0),
                    initial_wealth: rng.gen_range(300.0..500.0),
                    initial_overlord: None,
                }
            })
            .collect();

        // Chords keep the topology from being a pure ring
        for i in 0..count {
            if count > 4 && rng.gen_bool(0.2) {
                let offset = rng.gen_range(2..count - 1);
                let j = (i + offset) % count;
                let other = PolityId(j);
                if !sites[i as usize].neighbors.contains(&other) {
                    sites[i as usize].neighbors.push(other);
                    sites[j as usize].neighbors.push(PolityId(i));
                }
            }
        }

        Self::new(sites)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn get(&self, id: PolityId) -> Option<&Site> {
        self.index.get(&id).map(|&i| &self.sites[i])
    }

    pub fn index_of(&self, id: PolityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Neighbor pairs by site index, each unordered pair exactly once.
    /// An asymmetric neighbor listing still yields the pair.
    pub fn neighbor_pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: u32, neighbors: &[u32]) -> Site {
        Site {
            id: PolityId(id),
            position: Vec2::default(),
            neighbors: neighbors.iter().map(|&n| PolityId(n)).collect(),
            base_resource: 20.0,
            initial_wealth: 400.0,
            initial_overlord: None,
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = SiteRegistry::new(vec![site(1, &[]), site(1, &[])]);
        assert!(matches!(result, Err(HegemonError::DuplicateSite(PolityId(1)))));
    }

    #[test]
    fn test_negative_resource_rejected() {
        let mut bad = site(1, &[]);
        bad.base_resource = -1.0;
        assert!(matches!(
            SiteRegistry::new(vec![bad]),
            Err(HegemonError::NegativeResource { .. })
        ));
    }

    #[test]
    fn test_negative_wealth_rejected() {
        let mut bad = site(1, &[]);
        bad.initial_wealth = -5.0;
        assert!(matches!(
            SiteRegistry::new(vec![bad]),
            Err(HegemonError::NegativeWealth { .. })
        ));
    }

    #[test]
    fn test_unknown_neighbor_rejected() {
        let result = SiteRegistry::new(vec![site(1, &[9])]);
        assert!(matches!(result, Err(HegemonError::UnknownSite { .. })));
    }

    #[test]
    fn test_overlord_cycle_rejected() {
        // A subordinate to B, B subordinate to A
        let mut a = site(1, &[2]);
        let mut b = site(2, &[1]);
        a.initial_overlord = Some(PolityId(2));
        b.initial_overlord = Some(PolityId(1));
        assert!(matches!(
            SiteRegistry::new(vec![a, b]),
            Err(HegemonError::OverlordCycle(_))
        ));
    }

    #[test]
    fn test_self_overlord_rejected() {
        let mut a = site(1, &[]);
        a.initial_overlord = Some(PolityId(1));
        assert!(matches!(
            SiteRegistry::new(vec![a]),
            Err(HegemonError::OverlordCycle(PolityId(1)))
        ));
    }

    #[test]
    fn test_valid_chain_accepted() {
        let mut a = site(1, &[2]);
        let mut b = site(2, &[1, 3]);
        let c = site(3, &[2]);
        a.initial_overlord = Some(PolityId(2));
        b.initial_overlord = Some(PolityId(3));
        let registry = SiteRegistry::new(vec![a, b, c]).unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_neighbor_pairs_deduplicated() {
        let registry =
            SiteRegistry::new(vec![site(0, &[1]), site(1, &[0, 2]), site(2, &[1])]).unwrap();
        assert_eq!(registry.neighbor_pairs(), &[(0, 1), (1, 2)]);
    }

    #[test]
    fn test_asymmetric_listing_still_pairs() {
        // 0 lists 1, but 1 does not list 0
        let registry = SiteRegistry::new(vec![site(0, &[1]), site(1, &[])]).unwrap();
        assert_eq!(registry.neighbor_pairs(), &[(0, 1)]);
    }

    #[test]
    fn test_from_toml() {
        let text = r#"
            [[site]]
            id = 0
            position = { x = 0.0, y = 0.0 }
            neighbors = [1]
            base_resource = 20.0
            initial_wealth = 350.0

            [[site]]
            id = 1
            position = { x = 10.0, y = 0.0 }
            neighbors = [0]
            base_resource = 18.0
            initial_overlord = 0
        "#;
        let registry = SiteRegistry::from_toml_str(text).unwrap();
        assert_eq!(registry.len(), 2);
        let second = registry.get(PolityId(1)).unwrap();
        assert_eq!(second.initial_wealth, 400.0);
        assert_eq!(second.initial_overlord, Some(PolityId(0)));
    }

    #[test]
    fn test_generate_deterministic() {
        let a = SiteRegistry::generate(12, 99).unwrap();
        let b = SiteRegistry::generate(12, 99).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.initial_wealth, y.initial_wealth);
            assert_eq!(x.neighbors, y.neighbors);
        }
    }
}
