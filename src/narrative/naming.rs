//! Deterministic display names for polities
//!
//! Sites arrive from the placement model as bare ids; the chronicle
//! needs something pronounceable. Names are drawn syllable by syllable
//! from a fixed inventory with a seeded RNG, so a given seed always
//! produces the same book.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::types::PolityId;
use crate::sim::registry::SiteRegistry;

const VOWELS: [&str; 6] = ["a", "e", "i", "o", "u", "y"];
const CONSONANTS: [&str; 16] = [
    "b", "d", "g", "h", "k", "l", "m", "n", "p", "r", "s", "t", "v", "z", "th", "sh",
];

/// Map from polity id to display name
#[derive(Clone, Debug, Default)]
pub struct NameBook {
    names: BTreeMap<PolityId, String>,
}

impl NameBook {
    /// Generate names for every site in the registry. Deterministic
    /// for a given seed; names are unique within the book.
    pub fn generate(registry: &SiteRegistry, seed: u64) -> Self {
        let ids: Vec<PolityId> = registry.iter().map(|s| s.id).collect();
        Self::generate_for(&ids, seed)
    }

    /// Generate names for an explicit id list (registry order matters
    /// for determinism).
    pub fn generate_for(ids: &[PolityId], seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut names = BTreeMap::new();
        let mut used = std::collections::HashSet::new();
        for &id in ids {
            let mut name = make_word(&mut rng);
            // collisions are rare; regenerate rather than suffix
            while !used.insert(name.clone()) {
                name = make_word(&mut rng);
            }
            names.insert(id, name);
        }
        Self { names }
    }

    /// Display name for a polity; unknown ids fall back to the raw id
    pub fn name(&self, id: PolityId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Polity {}", id))
    }
}

/// Two or three syllables, title-cased, occasionally clipped
fn make_word(rng: &mut ChaCha8Rng) -> String {
    let syllable_count = rng.gen_range(2..=3);
    let mut word = String::new();
    for _ in 0..syllable_count {
        let consonant = CONSONANTS[rng.gen_range(0..CONSONANTS.len())];
        let vowel = VOWELS[rng.gen_range(0..VOWELS.len())];
        if rng.gen_bool(0.5) {
            word.push_str(consonant);
            word.push_str(vowel);
        } else {
            word.push_str(vowel);
            word.push_str(consonant);
        }
    }
    if word.len() > 3 && rng.gen_bool(0.5) {
        word.pop();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_names() {
        let ids = [PolityId(0), PolityId(1), PolityId(2)];
        let a = NameBook::generate_for(&ids, 11);
        let b = NameBook::generate_for(&ids, 11);
        for &id in &ids {
            assert_eq!(a.name(id), b.name(id));
        }
    }

    #[test]
    fn test_names_are_unique() {
        let ids: Vec<PolityId> = (0..200).map(PolityId).collect();
        let book = NameBook::generate_for(&ids, 3);
        let mut seen = std::collections::HashSet::new();
        for &id in &ids {
            assert!(seen.insert(book.name(id)));
        }
    }

    #[test]
    fn test_names_are_title_cased() {
        let book = NameBook::generate_for(&[PolityId(0)], 5);
        let name = book.name(PolityId(0));
        assert!(name.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn test_unknown_id_falls_back() {
        let book = NameBook::default();
        assert_eq!(book.name(PolityId(9)), "Polity #9");
    }
}
