use super::EvolutionManager;
use crate::species::population_cap;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;
use wildlands_data::Animal;

/// Social score above which both partners count as highly social.
const SOCIAL_PAIR_ABOVE: f64 = 0.6;
const SOCIAL_MISMATCH_ABOVE: f64 = 0.3;

/// Breeding cooldown key: one species plus an unordered pair of individuals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PairKey {
    pub species: String,
    pub first: Uuid,
    pub second: Uuid,
}

impl PairKey {
    #[must_use]
    pub fn new(species: &str, a: Uuid, b: Uuid) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            species: species.to_string(),
            first,
            second,
        }
    }
}

impl EvolutionManager {
    /// Population cap for `animal`'s species. Species missing from the catalog get a cap
    /// computed from the animal's own fields.
    #[must_use]
    pub fn population_cap_for(&self, animal: &Animal) -> usize {
        self.population_caps.get(&animal.name).copied().unwrap_or_else(|| {
            population_cap(
                animal.conservation_status,
                animal.predator_pressure,
                animal.reproduction_rate,
            )
        })
    }

    /// Remaining breeding cooldown of a pair, zero if none.
    #[must_use]
    pub fn breeding_cooldown(&self, a: &Animal, b: &Animal) -> f64 {
        self.breeding_cooldowns
            .get(&PairKey::new(&a.name, a.id, b.id))
            .copied()
            .unwrap_or(0.0)
    }

    /// Age below which `animal` cannot breed.
    #[must_use]
    pub fn maturity_threshold(&self, animal: &Animal) -> f64 {
        self.config.min_breeding_age * (1.0 - animal.maturity_score * 0.2)
    }

    /// Probability that an eligible pair breeds on this check.
    #[must_use]
    pub fn reproduction_probability(&self, a: &Animal, b: &Animal) -> f64 {
        let generation_factor = 1.0 / (a.generation_time / 100.0).max(0.5);
        let social_compatibility =
            if a.social_score > SOCIAL_PAIR_ABOVE && b.social_score > SOCIAL_PAIR_ABOVE {
                1.3
            } else if (a.social_score - b.social_score).abs() > SOCIAL_MISMATCH_ABOVE {
                0.7
            } else {
                1.0
            };
        let env_modifier = 1.0 - self.environmental_pressure * a.predator_pressure;
        self.config.base_reproduction_chance
            * a.reproduction_rate
            * generation_factor
            * social_compatibility
            * env_modifier
    }

    /// Decides whether `a` and `b` breed now. A positive decision puts the pair on cooldown.
    pub fn should_reproduce<R: Rng>(
        &mut self,
        a: &Animal,
        b: &Animal,
        current_population: usize,
        rng: &mut R,
    ) -> bool {
        if a.name != b.name || a.id == b.id {
            return false;
        }
        if current_population >= self.population_cap_for(a) {
            return false;
        }
        if self.breeding_cooldown(a, b) > 0.0 {
            return false;
        }
        // Both parents are held to the first parent's maturity threshold.
        let threshold = self.maturity_threshold(a);
        if a.age < threshold || b.age < threshold {
            return false;
        }

        let probability = self.reproduction_probability(a, b);
        if rng.gen::<f64>() >= probability {
            return false;
        }

        self.breeding_cooldowns
            .insert(PairKey::new(&a.name, a.id, b.id), self.config.breeding_cooldown);
        tracing::debug!(
            species = %a.name,
            probability,
            cooldown = self.config.breeding_cooldown,
            "Breeding approved"
        );
        true
    }

    /// Decays every pair cooldown by `cooldown_decay_rate * dt`, dropping expired ones.
    pub fn decay_breeding_cooldowns(&mut self, dt: f64) {
        let decay = self.config.cooldown_decay_rate * dt;
        self.breeding_cooldowns.retain(|_, remaining| {
            *remaining -= decay;
            *remaining > 0.0
        });
    }

    #[must_use]
    pub fn active_breeding_cooldowns(&self) -> usize {
        self.breeding_cooldowns.len()
    }
}
