//! Fake value pools
//!
//! One pool per entity category: the ordered candidate sequence the
//! generator draws from, a monotonic cursor, the used-set covering every
//! value committed so far, and the fallback counter consumed once the
//! candidates run out. Pools are seeded from built-in fake data providers
//! or loaded from a JSON pool file.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use fake::faker::address::en::CityName;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::domain::category::EntityCategory;
use crate::domain::result::Result;

/// Default number of candidates seeded per category
pub const DEFAULT_POOL_SIZE: usize = 1000;

/// Candidate replacement values for one entity category
///
/// The cursor only moves forward: a candidate skipped because it was
/// already used or reserved is never revisited. The used-set covers
/// pool-drawn, synthesized, and fallback-mutated values alike, so no
/// later mint can collide with an earlier one.
#[derive(Debug, Clone)]
pub struct FakeValuePool {
    candidates: Vec<String>,
    cursor: usize,
    used: HashSet<String>,
    fallback_counter: usize,
}

impl FakeValuePool {
    /// Creates a pool from a candidate sequence
    ///
    /// Duplicate candidates are dropped, keeping the first occurrence so
    /// the draw order stays stable.
    pub fn new(candidates: Vec<String>) -> Self {
        let mut seen = HashSet::with_capacity(candidates.len());
        let deduped: Vec<String> = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.clone()))
            .collect();
        Self {
            candidates: deduped,
            cursor: 0,
            used: HashSet::new(),
            fallback_counter: 0,
        }
    }

    /// Seeds a pool for a category from the built-in fake data providers
    ///
    /// URL pools hold lowercased surname tokens rather than full
    /// addresses; the generator composes them into `https://{a}.{b}.co`
    /// at mint time. Providers repeat, so seeding stops early once the
    /// attempt budget runs out rather than chasing an unreachable size.
    pub fn seeded(category: EntityCategory, size: usize, rng: &mut StdRng) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(size);
        let mut candidates: Vec<String> = Vec::with_capacity(size);
        let max_attempts = size.saturating_mul(20).max(64);

        for _ in 0..max_attempts {
            if candidates.len() >= size {
                break;
            }
            let value: String = match category {
                EntityCategory::Company => CompanyName().fake_with_rng(rng),
                EntityCategory::Url => LastName().fake_with_rng::<String, _>(rng).to_lowercase(),
                EntityCategory::Person => Name().fake_with_rng(rng),
                EntityCategory::Location => CityName().fake_with_rng(rng),
                EntityCategory::Phone => PhoneNumber().fake_with_rng(rng),
                EntityCategory::Email => SafeEmail().fake_with_rng(rng),
            };
            if seen.insert(value.clone()) {
                candidates.push(value);
            }
        }

        if candidates.len() < size {
            debug!(
                category = %category,
                requested = size,
                seeded = candidates.len(),
                "Provider could not supply the requested pool size"
            );
        }

        Self::new(candidates)
    }

    /// Number of candidates in the pool
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when the pool has no candidates at all
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The full candidate sequence, in draw order
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Draws the next unused candidate, or `None` when the pool is spent
    ///
    /// `reserved` lets the caller veto candidates for reasons the pool
    /// cannot see, such as a candidate that already appears as an
    /// original in the mapping store. The drawn value is marked used
    /// before it is returned.
    pub fn draw<F>(&mut self, reserved: F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        while self.cursor < self.candidates.len() {
            let candidate = self.candidates[self.cursor].clone();
            self.cursor += 1;
            if self.used.contains(&candidate) || reserved(&candidate) {
                continue;
            }
            self.used.insert(candidate.clone());
            return Some(candidate);
        }
        None
    }

    /// Marks a value as committed without drawing it
    ///
    /// Used for synthesized and fallback-mutated values, which never come
    /// off the cursor.
    pub fn mark_used(&mut self, value: impl Into<String>) {
        self.used.insert(value.into());
    }

    /// True when the value was already committed by this pool
    pub fn is_used(&self, value: &str) -> bool {
        self.used.contains(value)
    }

    /// Returns the current fallback counter and advances it
    pub fn next_fallback(&mut self) -> usize {
        let n = self.fallback_counter;
        self.fallback_counter += 1;
        n
    }

    /// Seed value for fallback mutation, cycled through the candidates
    pub fn fallback_seed(&self, counter: usize) -> Option<&str> {
        if self.candidates.is_empty() {
            return None;
        }
        Some(self.candidates[counter % self.candidates.len()].as_str())
    }
}

/// Seeds pools for every category
///
/// A fixed `rng_seed` makes the candidate sequences reproducible across
/// runs, which keeps regression fixtures stable.
pub fn default_pools(
    size: usize,
    rng_seed: Option<u64>,
) -> BTreeMap<EntityCategory, FakeValuePool> {
    let mut rng = match rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut pools = BTreeMap::new();
    for category in EntityCategory::ALL {
        pools.insert(category, FakeValuePool::seeded(category, size, &mut rng));
    }
    pools
}

/// Loads pools from a JSON pool file of the form `{"category": ["value", …]}`
///
/// Keys that don't name a known category are skipped with a warning so a
/// pool file carrying extra classes stays usable.
pub fn load_pools(path: &Path) -> Result<BTreeMap<EntityCategory, FakeValuePool>> {
    let contents = std::fs::read_to_string(path)?;
    let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(&contents)?;

    let mut pools = BTreeMap::new();
    for (key, candidates) in raw {
        match key.parse::<EntityCategory>() {
            Ok(category) => {
                debug!(category = %category, count = candidates.len(), "Loaded pool");
                pools.insert(category, FakeValuePool::new(candidates));
            }
            Err(_) => {
                warn!(key = %key, "Skipping pool entry with unknown category");
            }
        }
    }
    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(values: &[&str]) -> FakeValuePool {
        FakeValuePool::new(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_new_drops_duplicates_keeping_order() {
        let pool = pool(&["a", "b", "a", "c", "b"]);
        assert_eq!(pool.candidates(), &["a", "b", "c"]);
    }

    #[test]
    fn test_draw_advances_through_candidates() {
        let mut pool = pool(&["a", "b", "c"]);
        assert_eq!(pool.draw(|_| false), Some("a".to_string()));
        assert_eq!(pool.draw(|_| false), Some("b".to_string()));
        assert_eq!(pool.draw(|_| false), Some("c".to_string()));
        assert_eq!(pool.draw(|_| false), None);
    }

    #[test]
    fn test_draw_skips_reserved_candidates() {
        let mut pool = pool(&["a", "b", "c"]);
        let drawn = pool.draw(|candidate| candidate == "a");
        assert_eq!(drawn, Some("b".to_string()));
        // the cursor never rewinds past a skipped candidate
        assert_eq!(pool.draw(|_| false), Some("c".to_string()));
        assert_eq!(pool.draw(|_| false), None);
    }

    #[test]
    fn test_draw_skips_externally_marked_values() {
        let mut pool = pool(&["a", "b"]);
        pool.mark_used("a");
        assert_eq!(pool.draw(|_| false), Some("b".to_string()));
    }

    #[test]
    fn test_fallback_counter_is_monotonic() {
        let mut pool = pool(&["a"]);
        assert_eq!(pool.next_fallback(), 0);
        assert_eq!(pool.next_fallback(), 1);
        assert_eq!(pool.next_fallback(), 2);
    }

    #[test]
    fn test_fallback_seed_cycles() {
        let pool = pool(&["a", "b"]);
        assert_eq!(pool.fallback_seed(0), Some("a"));
        assert_eq!(pool.fallback_seed(1), Some("b"));
        assert_eq!(pool.fallback_seed(2), Some("a"));
        assert_eq!(FakeValuePool::new(vec![]).fallback_seed(0), None);
    }

    #[test]
    fn test_seeded_pool_respects_size_and_uniqueness() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = FakeValuePool::seeded(EntityCategory::Company, 50, &mut rng);
        assert!(pool.len() <= 50);
        assert!(!pool.is_empty());
        let unique: HashSet<&String> = pool.candidates().iter().collect();
        assert_eq!(unique.len(), pool.len());
    }

    #[test]
    fn test_seeded_pools_are_reproducible() {
        let first = default_pools(20, Some(42));
        let second = default_pools(20, Some(42));
        for category in EntityCategory::ALL {
            assert_eq!(
                first[&category].candidates(),
                second[&category].candidates()
            );
        }
    }

    #[test]
    fn test_url_pool_holds_lowercase_tokens() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = FakeValuePool::seeded(EntityCategory::Url, 20, &mut rng);
        for token in pool.candidates() {
            assert_eq!(token, &token.to_lowercase());
            assert!(!token.contains("://"));
        }
    }

    #[test]
    fn test_load_pools_skips_unknown_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.json");
        std::fs::write(
            &path,
            r#"{"company": ["Acme", "Globex"], "blood_type": ["A", "B"]}"#,
        )
        .unwrap();

        let pools = load_pools(&path).unwrap();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[&EntityCategory::Company].len(), 2);
    }
}
