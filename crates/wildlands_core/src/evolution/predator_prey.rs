use super::EvolutionManager;
use crate::history::{RollingWindow, SHORT_HISTORY_CAP};
use rand::Rng;
use serde::Serialize;
use wildlands_data::{Animal, CombatTrait, GeneKind, TerrainType};

const LOW_SUCCESS: f64 = 0.3;
const HIGH_SUCCESS: f64 = 0.7;
const ADAPTATION_STEP: f64 = 0.1;
/// Adaptation level a species needs before its live genomes start drifting.
const ADAPTATION_GATE: f64 = 0.3;
const MAX_NUDGE: f64 = 0.05;
const TAG_CHANCE: f64 = 0.2;
const PACK_SOCIAL_ABOVE: f64 = 0.6;
const ESCAPE_AGILITY_ABOVE: f64 = 1.2;

/// Mutation multipliers for predators that keep failing their hunts.
pub const PREDATOR_BOOST: [(GeneKind, f64); 3] = [
    (GeneKind::AttackMultiplier, 1.5),
    (GeneKind::AgilityScore, 1.3),
    (GeneKind::StaminaRating, 1.2),
];

/// Mutation multipliers for prey that keep getting caught.
pub const PREY_BOOST: [(GeneKind, f64); 3] = [
    (GeneKind::ArmorRating, 1.8),
    (GeneKind::AgilityScore, 1.5),
    (GeneKind::StaminaRating, 1.3),
];

/// Ordered (predator species, prey species) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HuntKey {
    pub predator: String,
    pub prey: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HuntRecord {
    pub attempts: u32,
    pub successes: u32,
    pub recent: RollingWindow<bool>,
    /// Success rate over `recent`.
    pub success_rate: f64,
    pub predator_pressure: f64,
    pub prey_pressure: f64,
}

impl Default for HuntRecord {
    fn default() -> Self {
        Self {
            attempts: 0,
            successes: 0,
            recent: RollingWindow::new(SHORT_HISTORY_CAP),
            success_rate: 0.0,
            predator_pressure: 0.5,
            prey_pressure: 0.5,
        }
    }
}

/// Per-species co-evolution state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdaptationState {
    pub predator_adaptation: f64,
    pub prey_adaptation: f64,
    pub predator_boost: bool,
    pub prey_boost: bool,
}

impl AdaptationState {
    /// Mutation multipliers currently in force for the species.
    pub fn active_boosts(&self) -> impl Iterator<Item = (GeneKind, f64)> + '_ {
        let predator = self.predator_boost.then_some(PREDATOR_BOOST).into_iter().flatten();
        let prey = self.prey_boost.then_some(PREY_BOOST).into_iter().flatten();
        predator.chain(prey)
    }
}

impl EvolutionManager {
    /// Records one hunt and returns the pair's rolling success rate.
    pub fn record_hunt_outcome(&mut self, predator: &Animal, prey: &Animal, success: bool) -> f64 {
        let key = HuntKey {
            predator: predator.name.clone(),
            prey: prey.name.clone(),
        };
        let record = self.hunt_records.entry(key).or_default();
        record.attempts += 1;
        if success {
            record.successes += 1;
        }
        record.recent.push(success);
        record.success_rate = record.recent.rate().unwrap_or(0.0);
        let rate = record.success_rate;

        self.update_predator_prey_dynamics(&predator.name, &prey.name, rate);
        rate
    }

    /// Shifts pressures, adaptation levels and mutation boosts for a hunting pair.
    pub fn update_predator_prey_dynamics(&mut self, predator: &str, prey: &str, success_rate: f64) {
        let (predator_pressure, prey_pressure) = if success_rate < LOW_SUCCESS {
            (0.8, 0.2)
        } else if success_rate > HIGH_SUCCESS {
            (0.2, 0.8)
        } else {
            (0.5, 0.5)
        };
        if let Some(record) = self.hunt_records.get_mut(&HuntKey {
            predator: predator.to_string(),
            prey: prey.to_string(),
        }) {
            record.predator_pressure = predator_pressure;
            record.prey_pressure = prey_pressure;
        }

        let hunter = self.adaptation.entry(predator.to_string()).or_default();
        hunter.predator_adaptation =
            (hunter.predator_adaptation + ADAPTATION_STEP * (1.0 - success_rate) * 2.0).min(1.0);
        let boost = success_rate < LOW_SUCCESS;
        if boost && !hunter.predator_boost {
            tracing::info!(species = predator, success_rate, "Predator mutation boost active");
        }
        hunter.predator_boost = boost;

        let hunted = self.adaptation.entry(prey.to_string()).or_default();
        hunted.prey_adaptation =
            (hunted.prey_adaptation + ADAPTATION_STEP * success_rate * 2.0).min(1.0);
        let boost = success_rate > HIGH_SUCCESS;
        if boost && !hunted.prey_boost {
            tracing::info!(species = prey, success_rate, "Prey mutation boost active");
        }
        hunted.prey_boost = boost;
    }

    #[must_use]
    pub fn hunt_record(&self, predator: &str, prey: &str) -> Option<&HuntRecord> {
        self.hunt_records.get(&HuntKey {
            predator: predator.to_string(),
            prey: prey.to_string(),
        })
    }

    #[must_use]
    pub fn adaptation_state(&self, species: &str) -> Option<&AdaptationState> {
        self.adaptation.get(species)
    }

    /// Drifts a living animal's genome along its species' hunting adaptation and may
    /// grant a matching combat tag. Returns the tags gained.
    pub fn apply_predator_prey_adaptations<R: Rng>(
        &self,
        animal: &mut Animal,
        terrain: TerrainType,
        rng: &mut R,
    ) -> Vec<CombatTrait> {
        let Some(state) = self.adaptation.get(&animal.name) else {
            return Vec::new();
        };
        let (level, traits) = if animal.predator {
            (state.predator_adaptation, &PREDATOR_BOOST)
        } else {
            (state.prey_adaptation, &PREY_BOOST)
        };
        if level <= ADAPTATION_GATE {
            return Vec::new();
        }

        let (min, max) = (self.config.min_gene_value, self.config.max_gene_value);
        for (kind, _) in traits {
            let nudged = animal.trait_value(*kind) + rng.gen_range(0.0..=MAX_NUDGE * level);
            animal.set_trait_value(*kind, nudged.clamp(min, max));
        }

        let mut candidates = Vec::with_capacity(2);
        if animal.predator {
            if terrain.is_covered() {
                candidates.push(CombatTrait::AmbushPredator);
            }
            if animal.social_score > PACK_SOCIAL_ABOVE {
                candidates.push(CombatTrait::PackHunter);
            }
        } else {
            if terrain.is_covered() {
                candidates.push(CombatTrait::Camouflage);
            }
            if animal.agility_score > ESCAPE_AGILITY_ABOVE {
                candidates.push(CombatTrait::QuickEscape);
            }
        }

        let mut gained = Vec::new();
        for tag in candidates {
            if rng.gen::<f64>() < TAG_CHANCE && animal.combat_traits.insert(tag) {
                tracing::debug!(species = %animal.name, tag = %tag, "Hunting adaptation tag gained");
                gained.push(tag);
            }
        }
        gained
    }
}
