//! Environment factors, trait weights and gene fitness.

use serde::Serialize;
use std::collections::BTreeMap;
use wildlands_data::{Animal, GeneKind};

/// Ambient temperature above which the environment counts as hot.
const HOT_ABOVE: f64 = 25.0;
const COLD_BELOW: f64 = 10.0;
const HUMID_ABOVE: f64 = 0.7;
const DRY_BELOW: f64 = 0.3;
const HIGH_PREDATION_ABOVE: f64 = 0.5;
/// Population-to-cap ratio above which competition is high.
const CROWDED_ABOVE: f64 = 0.7;
const SCARCE_FOOD_BELOW: f64 = 0.4;

/// Weight of predation's contribution to defensive genes.
pub const PREDATION_WEIGHT_FACTOR: f64 = 2.0;
/// Flat fitness bonus of defensive genes under high predation.
pub const PREDATION_DEFENSE_BONUS: f64 = 1.0;
/// Per-unit-value fitness bonus of defensive genes under high predation.
pub const PREDATION_VALUE_BONUS: f64 = 0.5;
pub const MIN_GENE_FITNESS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Hot,
    Cold,
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    High,
    Low,
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Temperature,
    Humidity,
    Predation,
    Competition,
    Food,
}

/// Coarse two-level reading of the environment a parent lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EnvironmentFactors {
    pub temperature: Temperature,
    pub humidity: Level,
    pub predation: Level,
    pub competition: Level,
    pub food: Level,
}

impl EnvironmentFactors {
    /// Reads the factors off `animal`'s ambient conditions and its species' crowding.
    #[must_use]
    pub fn for_animal(animal: &Animal, population: usize, cap: usize) -> Self {
        let ambient = &animal.ambient;
        let temperature = match ambient.temperature {
            Some(t) if t > HOT_ABOVE => Temperature::Hot,
            Some(t) if t < COLD_BELOW => Temperature::Cold,
            _ => Temperature::Normal,
        };
        let humidity = match ambient.humidity {
            Some(h) if h > HUMID_ABOVE => Level::High,
            Some(h) if h < DRY_BELOW => Level::Low,
            _ => Level::Normal,
        };
        let predation = if animal.predator_pressure > HIGH_PREDATION_ABOVE {
            Level::High
        } else {
            Level::Low
        };
        let competition = if population as f64 / cap.max(1) as f64 > CROWDED_ABOVE {
            Level::High
        } else {
            Level::Low
        };
        let food = match ambient.food_availability {
            None => Level::Normal,
            Some(f) if f < SCARCE_FOOD_BELOW => Level::Low,
            Some(_) => Level::High,
        };
        Self {
            temperature,
            humidity,
            predation,
            competition,
            food,
        }
    }

    #[must_use]
    pub fn high_predation(&self) -> bool {
        self.predation == Level::High
    }

    /// Signed pressure each factor's current level exerts.
    #[must_use]
    pub fn effect(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Temperature => match self.temperature {
                Temperature::Hot => 0.2,
                Temperature::Cold => 0.15,
                Temperature::Normal => 0.0,
            },
            Factor::Humidity => match self.humidity {
                Level::High => 0.1,
                Level::Low => 0.15,
                Level::Normal => 0.0,
            },
            Factor::Predation => match self.predation {
                Level::High => 0.5,
                Level::Low => -0.1,
                Level::Normal => 0.0,
            },
            Factor::Competition => match self.competition {
                Level::High => 0.3,
                Level::Low => -0.05,
                Level::Normal => 0.0,
            },
            Factor::Food => match self.food {
                Level::Low => 0.25,
                Level::High => -0.1,
                Level::Normal => 0.0,
            },
        }
    }

    /// Factors with a non-zero effect, paired with that effect.
    pub fn active(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        [
            Factor::Temperature,
            Factor::Humidity,
            Factor::Predation,
            Factor::Competition,
            Factor::Food,
        ]
        .into_iter()
        .map(|f| (f, self.effect(f)))
        .filter(|(_, effect)| *effect != 0.0)
    }
}

/// How much a trait matters for fighting and for staying alive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitWeights {
    pub combat: f64,
    pub survival: f64,
}

impl TraitWeights {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.combat + self.survival
    }
}

#[must_use]
pub fn trait_weights(kind: GeneKind) -> TraitWeights {
    let (combat, survival) = match kind {
        GeneKind::AttackMultiplier => (0.4, 0.1),
        GeneKind::ArmorRating => (0.3, 0.3),
        GeneKind::AgilityScore => (0.3, 0.3),
        GeneKind::StaminaRating => (0.2, 0.4),
        GeneKind::SocialScore => (0.1, 0.3),
        GeneKind::MaturityScore => (0.0, 0.2),
    };
    TraitWeights { combat, survival }
}

#[must_use]
pub fn base_mutation_rate(kind: GeneKind) -> f64 {
    match kind {
        GeneKind::AttackMultiplier => 0.2,
        GeneKind::ArmorRating => 0.25,
        GeneKind::AgilityScore => 0.25,
        GeneKind::StaminaRating => 0.2,
        GeneKind::SocialScore => 0.15,
        GeneKind::MaturityScore => 0.1,
    }
}

/// Fitness of one parent's copy of a gene under `factors`.
///
/// Under high predation the defensive traits get a doubled predation weight, a flat
/// bonus, a value-proportional bonus and a final `(1 + value)` multiplier, so high
/// defensive values compound across generations.
#[must_use]
pub fn calculate_gene_fitness(kind: GeneKind, value: f64, factors: &EnvironmentFactors) -> f64 {
    let weights = trait_weights(kind);
    let defended = kind.is_defensive() && factors.high_predation();
    let mut fitness = 1.0;
    for (factor, effect) in factors.active() {
        let mut contribution = weights.total() * effect;
        if defended && factor == Factor::Predation {
            contribution *= PREDATION_WEIGHT_FACTOR;
            contribution += PREDATION_DEFENSE_BONUS + PREDATION_VALUE_BONUS * value;
        }
        fitness += contribution;
    }
    if defended {
        fitness *= 1.0 + value;
    }
    fitness.max(MIN_GENE_FITNESS)
}

/// Per-trait mutation probabilities for one offspring.
///
/// `status_modifier` comes from the species' conservation status and `boost` holds any
/// predator/prey multipliers currently active for the species.
#[must_use]
pub fn adaptive_mutation_rates(
    factors: &EnvironmentFactors,
    status_modifier: f64,
    boost: &BTreeMap<GeneKind, f64>,
) -> BTreeMap<GeneKind, f64> {
    let env_scale: f64 = factors
        .active()
        .map(|(_, effect)| 1.0 + effect.abs() * 0.1)
        .product();

    GeneKind::ALL
        .into_iter()
        .map(|kind| {
            let weights = trait_weights(kind);
            let env_need: f64 = factors
                .active()
                .map(|(_, effect)| weights.total() * effect)
                .sum();
            let rate = base_mutation_rate(kind)
                * status_modifier
                * env_scale
                * boost.get(&kind).copied().unwrap_or(1.0)
                * (1.0 + env_need);
            (kind, rate.clamp(0.0, 1.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high_predation() -> EnvironmentFactors {
        EnvironmentFactors {
            predation: Level::High,
            ..Default::default()
        }
    }

    #[test]
    fn test_neutral_environment_has_unit_fitness() {
        let factors = EnvironmentFactors::default();
        assert_eq!(factors.active().count(), 0);
        for kind in GeneKind::ALL {
            assert_eq!(calculate_gene_fitness(kind, 1.0, &factors), 1.0);
        }
    }

    #[test]
    fn test_predation_stacks_on_defensive_genes() {
        let factors = high_predation();
        // (1 + 0.6*0.5*2 + 1.0 + 0.5*1.2) * (1 + 1.2)
        let expected = (1.0 + 0.6 + 1.0 + 0.6) * 2.2;
        let armor = calculate_gene_fitness(GeneKind::ArmorRating, 1.2, &factors);
        assert!((armor - expected).abs() < 1e-9);

        let attack = calculate_gene_fitness(GeneKind::AttackMultiplier, 1.2, &factors);
        assert!((attack - 1.25).abs() < 1e-9);
        assert!(
            calculate_gene_fitness(GeneKind::ArmorRating, 1.5, &factors)
                > calculate_gene_fitness(GeneKind::ArmorRating, 1.0, &factors)
        );
    }

    #[test]
    fn test_fitness_floor() {
        let factors = EnvironmentFactors {
            predation: Level::Low,
            competition: Level::Low,
            food: Level::High,
            ..Default::default()
        };
        assert!(calculate_gene_fitness(GeneKind::StaminaRating, 0.1, &factors) >= MIN_GENE_FITNESS);
    }

    #[test]
    fn test_factors_from_ambient() {
        let record: wildlands_data::SpeciesRecord =
            serde_json::from_str(r#"{"name":"Fox","predator_pressure":0.8}"#).unwrap();
        let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(1);
        let mut fox = crate::lifecycle::create_animal(&record, &mut rng);
        fox.ambient.temperature = Some(31.0);
        fox.ambient.food_availability = Some(0.2);

        let factors = EnvironmentFactors::for_animal(&fox, 90, 100);
        assert_eq!(factors.temperature, Temperature::Hot);
        assert_eq!(factors.humidity, Level::Normal);
        assert_eq!(factors.predation, Level::High);
        assert_eq!(factors.competition, Level::High);
        assert_eq!(factors.food, Level::Low);
    }

    #[test]
    fn test_mutation_rates_are_probabilities() {
        let factors = EnvironmentFactors {
            temperature: Temperature::Hot,
            predation: Level::High,
            competition: Level::High,
            food: Level::Low,
            ..Default::default()
        };
        let boost: BTreeMap<GeneKind, f64> = [(GeneKind::ArmorRating, 1.8)].into_iter().collect();
        let rates = adaptive_mutation_rates(&factors, 2.0, &boost);
        assert_eq!(rates.len(), GeneKind::ALL.len());
        assert!(rates.values().all(|r| (0.0..=1.0).contains(r)));
        assert!(rates[&GeneKind::ArmorRating] > rates[&GeneKind::MaturityScore]);
    }

    #[test]
    fn test_neutral_rates_match_base() {
        let rates = adaptive_mutation_rates(&EnvironmentFactors::default(), 1.0, &BTreeMap::new());
        for kind in GeneKind::ALL {
            assert!((rates[&kind] - base_mutation_rate(kind)).abs() < 1e-12);
        }
    }
}
