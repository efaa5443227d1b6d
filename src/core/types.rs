//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for polities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolityId(pub u32);

impl PolityId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PolityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation time unit (discrete, contiguous from 0)
pub type Tick = u32;

/// 2D position of a site on the world map
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polity_id_equality() {
        let a = PolityId(1);
        let b = PolityId(1);
        let c = PolityId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_polity_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<PolityId, &str> = HashMap::new();
        map.insert(PolityId(1), "empire");
        assert_eq!(map.get(&PolityId(1)), Some(&"empire"));
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }
}
