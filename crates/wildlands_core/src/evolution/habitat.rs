use super::EvolutionManager;
use crate::terrain::optimal_terrains;
use serde::Serialize;
use std::collections::BTreeMap;
use wildlands_data::{Animal, TerrainType};

const OPTIMAL_TERRAIN_BONUS: f64 = 1.5;
const MAX_EXPOSURE_BONUS: f64 = 0.5;
/// Share of tracked time a terrain needs before it becomes a preference.
const PREFERENCE_RATIO: f64 = 0.6;
const MIN_TRACKED_SECONDS: f64 = 100.0;
const MAX_PREFERENCES: usize = 2;

/// Seconds an individual has spent on each terrain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HabitatExposure {
    pub seconds: BTreeMap<TerrainType, f64>,
    pub total: f64,
}

impl HabitatExposure {
    #[must_use]
    pub fn ratio(&self, terrain: TerrainType) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        self.seconds.get(&terrain).copied().unwrap_or(0.0) / self.total
    }
}

impl EvolutionManager {
    pub fn track_habitat_exposure(&mut self, animal: &Animal, terrain: TerrainType, dt: f64) {
        let exposure = self.habitat_exposure.entry(animal.id).or_default();
        *exposure.seconds.entry(terrain).or_insert(0.0) += dt;
        exposure.total += dt;
    }

    #[must_use]
    pub fn habitat_exposure(&self, animal: &Animal) -> Option<&HabitatExposure> {
        self.habitat_exposure.get(&animal.id)
    }

    /// Drops the exposure record of an individual that left the simulation.
    pub fn forget_animal(&mut self, animal: &Animal) {
        self.habitat_exposure.remove(&animal.id);
    }

    /// 1.0 base, x1.5 on an innately optimal terrain, plus a familiarity bonus of up to
    /// +0.5 for time already spent there.
    #[must_use]
    pub fn calculate_habitat_fitness(&self, animal: &Animal, terrain: TerrainType) -> f64 {
        let mut fitness = 1.0;
        if optimal_terrains(animal.habitat).contains(&terrain) {
            fitness *= OPTIMAL_TERRAIN_BONUS;
        }
        let seconds = self
            .habitat_exposure
            .get(&animal.id)
            .and_then(|e| e.seconds.get(&terrain))
            .copied()
            .unwrap_or(0.0);
        fitness + (seconds / self.config.habitat_exposure_scale.max(1.0)).min(MAX_EXPOSURE_BONUS)
    }

    /// Promotes a terrain the animal lives on most of the time to a persistent preference.
    /// Returns the newly promoted terrain, if any.
    pub fn evolve_habitat_preferences(&self, animal: &mut Animal) -> Option<TerrainType> {
        let exposure = self.habitat_exposure.get(&animal.id)?;
        if exposure.total < MIN_TRACKED_SECONDS {
            return None;
        }
        let (terrain, _) = exposure
            .seconds
            .iter()
            .find(|(t, _)| exposure.ratio(**t) > PREFERENCE_RATIO)?;
        let terrain = *terrain;
        if terrain == animal.habitat || animal.evolved_habitat_preference.contains(&terrain) {
            return None;
        }

        animal.evolved_habitat_preference.push(terrain);
        if animal.evolved_habitat_preference.len() > MAX_PREFERENCES {
            animal.evolved_habitat_preference.remove(0);
        }
        tracing::info!(
            species = %animal.name,
            terrain = %terrain,
            ratio = exposure.ratio(terrain),
            "Habitat preference evolved"
        );
        Some(terrain)
    }
}
