use super::combat_spec::CombatSpecialization;
use super::social::SocialMemory;
use super::EvolutionManager;
use crate::history::{RollingWindow, TRAIT_HISTORY_CAP};
use serde::Serialize;
use std::collections::BTreeMap;
use wildlands_data::{CombatStrategy, Formation, GeneKind, Genome, TeamRole};

/// Trait value above which an offspring counts as a specialist in that trait.
pub const SPECIALIZATION_THRESHOLD: f64 = 1.5;

/// Per-species generation bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationStats {
    /// Highest generation born so far.
    pub generation: u32,
    pub births: u64,
    pub trait_history: BTreeMap<GeneKind, RollingWindow<f64>>,
    /// Offspring born above [`SPECIALIZATION_THRESHOLD`], per trait.
    pub specialists: BTreeMap<GeneKind, u64>,
    pub population_history: RollingWindow<usize>,
}

impl Default for GenerationStats {
    fn default() -> Self {
        Self {
            generation: 0,
            births: 0,
            trait_history: GeneKind::ALL
                .into_iter()
                .map(|k| (k, RollingWindow::new(TRAIT_HISTORY_CAP)))
                .collect(),
            specialists: BTreeMap::new(),
            population_history: RollingWindow::new(TRAIT_HISTORY_CAP),
        }
    }
}

impl GenerationStats {
    pub(crate) fn record_birth(&mut self, genome: &Genome, generation: u32) {
        self.generation = self.generation.max(generation);
        self.births += 1;
        for kind in GeneKind::ALL {
            let Some(value) = genome.value(kind) else {
                continue;
            };
            self.trait_history
                .entry(kind)
                .or_insert_with(|| RollingWindow::new(TRAIT_HISTORY_CAP))
                .push(value);
            if value > SPECIALIZATION_THRESHOLD {
                *self.specialists.entry(kind).or_insert(0) += 1;
            }
        }
    }

    /// Rolling mean per trait, for traits with at least one sample.
    #[must_use]
    pub fn trait_averages(&self) -> BTreeMap<GeneKind, f64> {
        self.trait_history
            .iter()
            .filter_map(|(k, window)| window.mean().map(|m| (*k, m)))
            .collect()
    }
}

/// Serializable snapshot of everything tracked for one species.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesStats {
    pub species: String,
    pub generation: u32,
    pub births: u64,
    pub population_cap: Option<usize>,
    pub trait_averages: BTreeMap<GeneKind, f64>,
    pub specialists: BTreeMap<GeneKind, u64>,
    pub dominant_strategy: Option<CombatStrategy>,
    pub counter_strategies: BTreeMap<String, CombatStrategy>,
    pub optimal_team_size: Option<usize>,
    pub best_formation: Option<Formation>,
    pub specialized_roles: Vec<TeamRole>,
    pub predator_adaptation: f64,
    pub prey_adaptation: f64,
    /// Rolling hunt success rate against each prey species.
    pub hunt_success: BTreeMap<String, f64>,
    pub population_history: Vec<usize>,
}

impl EvolutionManager {
    /// Appends a population sample to the species' history.
    pub fn record_population(&mut self, species: &str, population: usize) {
        self.generation_stats
            .entry(species.to_string())
            .or_default()
            .population_history
            .push(population);
    }

    /// Report of the generation counter, rolling trait statistics and every
    /// co-evolution tracker for `species`.
    #[must_use]
    pub fn get_species_stats(&self, species: &str) -> SpeciesStats {
        let generation = self.generation_stats.get(species);
        let social = self.social_memory.get(species);
        let combat = self.combat_specialization.get(species);
        let adaptation = self.adaptation.get(species);

        let hunt_success = self
            .hunt_records
            .iter()
            .filter(|(key, _)| key.predator == species)
            .map(|(key, record)| (key.prey.clone(), record.success_rate))
            .collect();

        SpeciesStats {
            species: species.to_string(),
            generation: generation.map_or(0, |g| g.generation),
            births: generation.map_or(0, |g| g.births),
            population_cap: self.population_caps.get(species).copied(),
            trait_averages: generation.map(GenerationStats::trait_averages).unwrap_or_default(),
            specialists: generation.map(|g| g.specialists.clone()).unwrap_or_default(),
            dominant_strategy: combat.and_then(|c| c.dominant_strategy),
            counter_strategies: combat
                .map(|c: &CombatSpecialization| c.counter_strategies.clone())
                .unwrap_or_default(),
            optimal_team_size: social.and_then(|s| s.optimal_team_size),
            best_formation: social.and_then(|s| s.best_formation),
            specialized_roles: social
                .map(|s: &SocialMemory| s.specialized_roles.iter().copied().collect())
                .unwrap_or_default(),
            predator_adaptation: adaptation.map_or(0.0, |a| a.predator_adaptation),
            prey_adaptation: adaptation.map_or(0.0, |a| a.prey_adaptation),
            hunt_success,
            population_history: generation
                .map(|g| g.population_history.iter().copied().collect())
                .unwrap_or_default(),
        }
    }

    /// Every species with any recorded state, sorted.
    #[must_use]
    pub fn tracked_species(&self) -> Vec<String> {
        let mut species: Vec<String> = self
            .population_caps
            .keys()
            .chain(self.generation_stats.keys())
            .chain(self.social_memory.keys())
            .chain(self.combat_specialization.keys())
            .chain(self.adaptation.keys())
            .cloned()
            .collect();
        species.sort();
        species.dedup();
        species
    }
}
