//! Fake value generator
//!
//! Produces unique, category-appropriate replacement values: sequential
//! pool draws for most categories, composed addresses for URLs, and a
//! bounded deterministic mutation path once a pool runs dry. Minted
//! values never collide with earlier mints or with values the mapping
//! store already knows on either side.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::pool::FakeValuePool;
use crate::core::store::MappingStore;
use crate::domain::category::EntityCategory;
use crate::domain::errors::CloakError;
use crate::domain::result::Result;

/// Tuning knobs for the generator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Resampling budget for URL synthesis before falling back to mutation
    pub synthesis_retries: usize,
    /// Upper bound on the fallback counter; exceeding it is a hard error
    pub fallback_ceiling: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            synthesis_retries: 16,
            fallback_ceiling: 100_000,
        }
    }
}

/// Mints replacement values against a set of category pools
pub struct FakeValueGenerator {
    pools: BTreeMap<EntityCategory, FakeValuePool>,
    rng: StdRng,
    settings: GeneratorSettings,
}

impl FakeValueGenerator {
    /// Creates a generator over the given pools
    ///
    /// A fixed `rng_seed` pins URL synthesis sampling, making whole runs
    /// reproducible together with seeded pools.
    pub fn new(
        pools: BTreeMap<EntityCategory, FakeValuePool>,
        settings: GeneratorSettings,
        rng_seed: Option<u64>,
    ) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            pools,
            rng,
            settings,
        }
    }

    /// True when the category has a non-empty pool
    pub fn has_pool(&self, category: EntityCategory) -> bool {
        self.pools
            .get(&category)
            .map_or(false, |pool| !pool.is_empty())
    }

    /// Mints a fresh fake for the category
    ///
    /// The caller records the returned value into the store in the same
    /// `&mut` engine call; the generator only guarantees the value is
    /// unused at the moment it is returned.
    pub fn mint(&mut self, category: EntityCategory, store: &MappingStore) -> Result<String> {
        if !self.pools.contains_key(&category) {
            return Err(CloakError::Configuration(format!(
                "No fake value pool configured for category '{category}'"
            )));
        }

        if category == EntityCategory::Url {
            if let Some(url) = self.synthesize_url(store) {
                return Ok(url);
            }
        } else if let Some(drawn) = self
            .pools
            .get_mut(&category)
            .and_then(|pool| pool.draw(|candidate| store.is_known(category, candidate)))
        {
            return Ok(drawn);
        }

        self.fallback(category, store)
    }

    /// Composes `https://{a}.{b}.co` from two sampled pool tokens
    ///
    /// Returns `None` once the resampling budget is spent or the pool is
    /// too small to sample from; the caller then takes the mutation path.
    fn synthesize_url(&mut self, store: &MappingStore) -> Option<String> {
        let pool = self.pools.get_mut(&EntityCategory::Url)?;
        if pool.len() < 2 {
            return None;
        }

        for _ in 0..self.settings.synthesis_retries {
            let picks: Vec<String> = pool
                .candidates()
                .choose_multiple(&mut self.rng, 2)
                .cloned()
                .collect();
            let url = format!("https://{}.{}.co", picks[0], picks[1]);
            if !pool.is_used(&url) && !store.is_known(EntityCategory::Url, &url) {
                pool.mark_used(url.clone());
                return Some(url);
            }
        }
        debug!("URL synthesis budget spent, switching to fallback mutation");
        None
    }

    /// Deterministic mutation path once the pool is spent
    ///
    /// Each counter value yields a distinct string, so the loop can only
    /// stall on collisions with already-committed values, and the ceiling
    /// turns a pathological stall into an explicit error.
    fn fallback(&mut self, category: EntityCategory, store: &MappingStore) -> Result<String> {
        let pool = self
            .pools
            .get_mut(&category)
            .ok_or_else(|| CloakError::Configuration(format!(
                "No fake value pool configured for category '{category}'"
            )))?;

        loop {
            let counter = pool.next_fallback();
            if counter >= self.settings.fallback_ceiling {
                return Err(CloakError::FakeValueExhausted {
                    category,
                    attempts: counter,
                });
            }
            let seed = match pool.fallback_seed(counter) {
                Some(seed) => seed.to_string(),
                None => {
                    return Err(CloakError::FakeValueExhausted {
                        category,
                        attempts: counter,
                    });
                }
            };
            let candidate = mutate(category, &seed, counter);
            if !pool.is_used(&candidate) && !store.is_known(category, &candidate) {
                pool.mark_used(candidate.clone());
                return Ok(candidate);
            }
        }
    }
}

/// Applies the category's mutation shape to a seed value
fn mutate(category: EntityCategory, seed: &str, counter: usize) -> String {
    match category {
        EntityCategory::Company => format!("{seed} Group {counter}"),
        EntityCategory::Email => match seed.split_once('@') {
            Some((local, domain)) => format!("{local}{counter}@{domain}"),
            None => format!("{seed}{counter}"),
        },
        EntityCategory::Phone => format!("{seed}-{counter}"),
        EntityCategory::Url => format!("https://{seed}.co.{}", alpha_suffix(counter)),
        EntityCategory::Person | EntityCategory::Location => format!("{seed} {counter}"),
    }
}

/// Base-26 alphabetic rendering of the counter, two letters minimum
///
/// Produces the country-code-style progression `aa`, `ab`, …, `az`, `ba`.
fn alpha_suffix(counter: usize) -> String {
    let mut digits: Vec<u8> = Vec::new();
    let mut n = counter;
    loop {
        digits.push((n % 26) as u8);
        n /= 26;
        if n == 0 {
            break;
        }
    }
    while digits.len() < 2 {
        digits.push(0);
    }
    digits
        .iter()
        .rev()
        .map(|d| (b'a' + d) as char)
        .collect()
}
