//! Headless simulation world: the ECS, the terrain grid and every manager, advanced one
//! tick at a time by [`World::update`].

use crate::model::config::AppConfig;
use crate::model::species::SpeciesCatalog;
use crate::model::team::TeamRegistry;
use crate::model::terrain::TerrainGrid;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use wildlands_core::metrics::Metrics;
use wildlands_core::{CombatManager, EvolutionManager, HealthMoodSystem, SpeciesStats};
use wildlands_data::Animal;

pub mod init;
pub mod update;

pub use update::{RunSummary, TickReport};

pub struct World {
    pub config: AppConfig,
    pub tick: u64,
    /// Simulated seconds since the world was created.
    pub time: f64,
    pub ecs: hecs::World,
    pub terrain: TerrainGrid,
    pub teams: TeamRegistry,
    pub evolution: EvolutionManager,
    pub combat: CombatManager,
    pub health_mood: HealthMoodSystem,
    pub catalog: SpeciesCatalog,
    pub metrics: Metrics,
    /// Seed the run's RNG was built from.
    pub seed: u64,
    pub(crate) rng: ChaCha8Rng,
}

impl World {
    /// Living animals.
    #[must_use]
    pub fn population(&self) -> usize {
        self.ecs
            .query::<&Animal>()
            .iter()
            .filter(|(_, a)| a.is_alive())
            .count()
    }

    /// Living animals per species.
    #[must_use]
    pub fn populations(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for (_handle, animal) in self.ecs.query::<&Animal>().iter() {
            if animal.is_alive() {
                *counts.entry(animal.name.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Living animals of one species, cloned out of the ECS.
    #[must_use]
    pub fn animals_of(&self, species: &str) -> Vec<(hecs::Entity, Animal)> {
        self.ecs
            .query::<&Animal>()
            .iter()
            .filter(|(_, a)| a.is_alive() && a.name == species)
            .map(|(handle, a)| (handle, a.clone()))
            .collect()
    }

    /// Evolution statistics for every species the run has seen.
    #[must_use]
    pub fn species_report(&self) -> Vec<SpeciesStats> {
        self.evolution
            .tracked_species()
            .iter()
            .map(|species| self.evolution.get_species_stats(species))
            .collect()
    }
}
