use crate::model::config::AppConfig;
use crate::model::lifecycle;
use crate::model::species::SpeciesCatalog;
use crate::model::team::TeamRegistry;
use crate::model::terrain::TerrainGrid;
use crate::model::world::World;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;
use wildlands_core::metrics::Metrics;
use wildlands_core::{CombatManager, EvolutionManager, HealthMoodSystem};
use wildlands_data::{Animal, Formation, Position, Robot, SpeciesRecord, TerrainType};

/// Every n-th team is commanded by a robot instead of its first recruit.
const ROBOT_LED_EVERY: usize = 3;
/// Spread of a freshly formed group around its center.
const GROUP_SPREAD: f64 = 2.0;

impl World {
    /// Builds an empty world on a banded terrain grid.
    pub fn new(config: AppConfig, catalog: SpeciesCatalog) -> anyhow::Result<Self> {
        config.validate()?;
        let seed = config.simulation.seed.unwrap_or_else(rand::random);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let terrain = TerrainGrid::banded(config.simulation.width, config.simulation.height);

        tracing::info!(
            seed,
            species = catalog.len(),
            fingerprint = %config.fingerprint(),
            "World created"
        );
        Ok(Self {
            tick: 0,
            time: 0.0,
            ecs: hecs::World::new(),
            terrain,
            teams: TeamRegistry::new(config.combat.battle_cooldown),
            evolution: EvolutionManager::new(config.evolution.clone(), &catalog),
            combat: CombatManager::new(config.combat.clone()),
            health_mood: HealthMoodSystem::new(),
            catalog,
            metrics: Metrics::new(),
            seed,
            rng,
            config,
        })
    }

    /// Spawns `animals_per_species` of every catalog species near its habitat and
    /// groups them into teams of `team_size`.
    pub fn populate(&mut self) -> anyhow::Result<()> {
        let records: Vec<SpeciesRecord> = self.catalog.iter().cloned().collect();
        let mut team_count = 0;
        for record in &records {
            let center = self.habitat_position(record.habitat);
            let mut spawned = Vec::new();
            for _ in 0..self.config.simulation.animals_per_species {
                let mut animal = lifecycle::create_animal(record, &mut self.rng);
                animal.age = self
                    .rng
                    .gen_range(0.0..=self.config.evolution.min_breeding_age * 1.5);
                let pos = self.jitter(center, GROUP_SPREAD);
                spawned.push(self.spawn_animal(animal, pos));
            }

            for group in spawned.chunks(self.config.simulation.team_size) {
                if group.len() < 2 {
                    continue;
                }
                let formation = Formation::ALL
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or_default();
                let id = if team_count % ROBOT_LED_EVERY == ROBOT_LED_EVERY - 1 {
                    let robot = self.spawn_robot(&format!("Warden-{team_count}"), "Steel", center);
                    let id = self.teams.create_team(&mut self.ecs, robot, formation, self.time)?;
                    for member in group {
                        self.teams.add_member(&mut self.ecs, id, *member)?;
                    }
                    id
                } else {
                    let id = self
                        .teams
                        .create_team(&mut self.ecs, group[0], formation, self.time)?;
                    for member in &group[1..] {
                        self.teams.add_member(&mut self.ecs, id, *member)?;
                    }
                    id
                };
                tracing::debug!(team = %id, species = %record.name, size = group.len(), "Team formed");
                team_count += 1;
            }
        }
        tracing::info!(
            animals = self.population(),
            teams = self.teams.len(),
            "World populated"
        );
        Ok(())
    }

    pub fn spawn_animal(&mut self, animal: Animal, pos: Position) -> hecs::Entity {
        let pos = self.clamp_to_grid(pos);
        self.ecs.spawn((animal, pos))
    }

    pub fn spawn_robot(&mut self, name: &str, faction: &str, pos: Position) -> hecs::Entity {
        let robot = Robot {
            id: Uuid::from_u128(self.rng.gen()),
            name: name.to_string(),
            faction: faction.to_string(),
        };
        let pos = self.clamp_to_grid(pos);
        self.ecs.spawn((robot, pos))
    }

    /// Random cell of the given terrain, or a random cell anywhere if the grid has none.
    fn habitat_position(&mut self, habitat: TerrainType) -> Position {
        let (width, height) = (self.terrain.width, self.terrain.height);
        let cells: Vec<(u16, u16)> = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .filter(|(x, y)| self.terrain.get(*x, *y) == Some(habitat))
            .collect();
        match cells.choose(&mut self.rng) {
            Some((x, y)) => Position::new(f64::from(*x) + 0.5, f64::from(*y) + 0.5),
            None => Position::new(
                self.rng.gen_range(0.0..f64::from(width)),
                self.rng.gen_range(0.0..f64::from(height)),
            ),
        }
    }

    pub(crate) fn jitter(&mut self, center: Position, spread: f64) -> Position {
        let dx = self.rng.gen_range(-spread..=spread);
        let dy = self.rng.gen_range(-spread..=spread);
        self.clamp_to_grid(Position::new(center.x + dx, center.y + dy))
    }

    pub(crate) fn clamp_to_grid(&self, pos: Position) -> Position {
        let max_x = (f64::from(self.terrain.width) - 0.001).max(0.0);
        let max_y = (f64::from(self.terrain.height) - 0.001).max(0.0);
        Position::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y))
    }
}
