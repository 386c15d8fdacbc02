//! Evolution engine: population caps, breeding, offspring synthesis and the
//! co-evolution trackers that drift living genomes.
//!
//! All per-species state lives in one [`EvolutionManager`] built at simulation start and
//! passed to whatever needs it. Every history it keeps is a capped [`RollingWindow`], so
//! memory stays bounded over arbitrarily long runs.
//!
//! [`RollingWindow`]: crate::history::RollingWindow

pub mod breeding;
pub mod combat_spec;
pub mod fitness;
pub mod habitat;
pub mod offspring;
pub mod predator_prey;
pub mod social;
pub mod stats;

pub use breeding::PairKey;
pub use combat_spec::{CombatRecord, CombatResult, CombatSpecialization};
pub use fitness::{calculate_gene_fitness, EnvironmentFactors, Factor, Level, Temperature};
pub use habitat::HabitatExposure;
pub use offspring::Offspring;
pub use predator_prey::{AdaptationState, HuntKey, HuntRecord};
pub use social::{SocialMemory, TeamMetrics};
pub use stats::{GenerationStats, SpeciesStats};

use crate::config::EvolutionConfig;
use crate::species::{population_cap, SpeciesCatalog};
use crate::team::TeamRegistry;
use crate::terrain::TerrainLookup;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;
use wildlands_data::{Animal, Position, TerrainType};

/// Bounds of the global environmental pressure random walk.
const PRESSURE_RANGE: (f64, f64) = (0.2, 1.0);

/// World state an update pass reads and drifts.
pub struct EvolutionContext<'a> {
    pub world: &'a mut hecs::World,
    pub teams: &'a TeamRegistry,
    pub terrain: &'a dyn TerrainLookup,
}

/// What one `update` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpdateSummary {
    pub pressure_shifted: bool,
    /// Team members that went through the co-evolution hooks.
    pub animals_evolved: usize,
}

#[derive(Debug, Clone)]
pub struct EvolutionManager {
    pub config: EvolutionConfig,
    /// Global environmental pressure in `[0.2, 1.0]`; scales predation's drag on breeding.
    pub environmental_pressure: f64,
    population_caps: BTreeMap<String, usize>,
    breeding_cooldowns: BTreeMap<PairKey, f64>,
    generation_stats: BTreeMap<String, GenerationStats>,
    hunt_records: BTreeMap<HuntKey, HuntRecord>,
    adaptation: BTreeMap<String, AdaptationState>,
    social_memory: BTreeMap<String, SocialMemory>,
    combat_specialization: BTreeMap<String, CombatSpecialization>,
    habitat_exposure: HashMap<Uuid, HabitatExposure>,
    /// Simulated seconds since the last co-evolution pass.
    evolution_timer: f64,
}

impl EvolutionManager {
    /// Builds the manager and computes the population cap of every catalog species.
    #[must_use]
    pub fn new(config: EvolutionConfig, catalog: &SpeciesCatalog) -> Self {
        let population_caps = catalog
            .iter()
            .map(|record| {
                (
                    record.name.clone(),
                    population_cap(
                        record.conservation_status,
                        record.predator_pressure,
                        record.reproduction_rate,
                    ),
                )
            })
            .collect();
        Self {
            environmental_pressure: config
                .initial_environmental_pressure
                .clamp(PRESSURE_RANGE.0, PRESSURE_RANGE.1),
            config,
            population_caps,
            breeding_cooldowns: BTreeMap::new(),
            generation_stats: BTreeMap::new(),
            hunt_records: BTreeMap::new(),
            adaptation: BTreeMap::new(),
            social_memory: BTreeMap::new(),
            combat_specialization: BTreeMap::new(),
            habitat_exposure: HashMap::new(),
            evolution_timer: 0.0,
        }
    }

    #[must_use]
    pub fn population_cap(&self, species: &str) -> Option<usize> {
        self.population_caps.get(species).copied()
    }

    /// Occasionally random-walks the global environmental pressure.
    pub fn shift_environmental_pressure<R: Rng>(&mut self, rng: &mut R) -> bool {
        if rng.gen::<f64>() >= self.config.pressure_shift_chance {
            return false;
        }
        let step = self.config.pressure_shift_step;
        let previous = self.environmental_pressure;
        self.environmental_pressure = (previous + rng.gen_range(-step..=step))
            .clamp(PRESSURE_RANGE.0, PRESSURE_RANGE.1);
        tracing::info!(
            from = previous,
            to = self.environmental_pressure,
            "Environmental pressure shifted"
        );
        true
    }

    /// Per-tick entry point.
    ///
    /// Decays breeding cooldowns, may shift the environmental pressure and accumulates
    /// habitat exposure for every positioned animal. Every `evolution_interval` seconds
    /// each team's performance is recorded and its members go through the social,
    /// combat, predator-prey and habitat hooks.
    pub fn update<R: Rng>(
        &mut self,
        dt: f64,
        ctx: &mut EvolutionContext<'_>,
        rng: &mut R,
    ) -> UpdateSummary {
        let mut summary = UpdateSummary::default();
        self.decay_breeding_cooldowns(dt);
        summary.pressure_shifted = self.shift_environmental_pressure(rng);

        for (_handle, (animal, pos)) in ctx.world.query::<(&Animal, &Position)>().iter() {
            if !animal.is_alive() {
                continue;
            }
            let terrain = ctx
                .terrain
                .terrain_at(pos.x, pos.y)
                .unwrap_or(TerrainType::Grassland);
            self.track_habitat_exposure(animal, terrain, dt);
        }

        self.evolution_timer += dt;
        if self.evolution_timer < self.config.evolution_interval {
            return summary;
        }
        self.evolution_timer = 0.0;

        for team in ctx.teams.iter() {
            let Some(leader_species) = team.leader_species(ctx.world) else {
                continue;
            };
            let metrics = TeamMetrics::for_team(team, ctx.world);
            self.record_team_performance(team, ctx.world, metrics);

            for member in &team.members {
                let terrain = ctx
                    .world
                    .get::<&Position>(*member)
                    .ok()
                    .and_then(|p| ctx.terrain.terrain_at(p.x, p.y))
                    .unwrap_or(TerrainType::Grassland);
                let Ok(mut animal) = ctx.world.get::<&mut Animal>(*member) else {
                    continue;
                };
                if !animal.is_alive() {
                    continue;
                }
                self.evolve_social_structure(&mut animal, &leader_species);
                self.evolve_combat_specialization(&mut animal, rng);
                self.apply_predator_prey_adaptations(&mut animal, terrain, rng);
                self.evolve_habitat_preferences(&mut animal);
                summary.animals_evolved += 1;
            }
        }
        tracing::debug!(
            evolved = summary.animals_evolved,
            pressure = self.environmental_pressure,
            "Co-evolution pass"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::create_animal;
    use crate::terrain::TerrainGrid;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use wildlands_data::{Formation, SpeciesRecord};

    #[test]
    fn test_caps_from_catalog() {
        let catalog = SpeciesCatalog::bundled().unwrap();
        let mgr = EvolutionManager::new(EvolutionConfig::default(), &catalog);
        for record in catalog.iter() {
            let cap = mgr.population_cap(&record.name).unwrap();
            assert!((10..=200).contains(&cap));
        }
        assert_eq!(mgr.population_cap("Dodo"), None);
    }

    #[test]
    fn test_pressure_walk_stays_in_range() {
        let config = EvolutionConfig {
            pressure_shift_chance: 1.0,
            pressure_shift_step: 0.5,
            ..Default::default()
        };
        let mut mgr = EvolutionManager::new(config, &SpeciesCatalog::default());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(mgr.shift_environmental_pressure(&mut rng));
            assert!((0.2..=1.0).contains(&mgr.environmental_pressure));
        }
    }

    #[test]
    fn test_update_runs_hooks_on_interval() {
        let mut mgr = EvolutionManager::new(EvolutionConfig::default(), &SpeciesCatalog::default());
        let mut world = hecs::World::new();
        let mut teams = TeamRegistry::new(10.0);
        let grid = TerrainGrid::new(8, 8, TerrainType::Forest);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let record: SpeciesRecord = serde_json::from_str(r#"{"name":"Wolf"}"#).unwrap();
        let leader = world.spawn((create_animal(&record, &mut rng), Position::new(1.0, 1.0)));
        let id = teams
            .create_team(&mut world, leader, Formation::Defensive, 0.0)
            .unwrap();
        for _ in 0..2 {
            let member = world.spawn((create_animal(&record, &mut rng), Position::new(2.0, 2.0)));
            teams.add_member(&mut world, id, member).unwrap();
        }

        let mut ctx = EvolutionContext {
            world: &mut world,
            teams: &teams,
            terrain: &grid,
        };
        let first = mgr.update(1.0, &mut ctx, &mut rng);
        assert_eq!(first.animals_evolved, 0);
        let mut evolved = 0;
        for _ in 0..5 {
            evolved += mgr.update(1.0, &mut ctx, &mut rng).animals_evolved;
        }
        assert_eq!(evolved, 3);

        let leader_animal = world.get::<&Animal>(leader).unwrap();
        assert!(leader_animal.team_role.is_some());
        let exposure = mgr.habitat_exposure(&leader_animal).unwrap();
        assert!((exposure.seconds[&TerrainType::Forest] - 6.0).abs() < 1e-9);
        assert!(mgr.social_memory("Wolf").is_some());
    }
}
