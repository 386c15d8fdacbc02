pub mod macros;

use wildlands_data::{
    AmbientConditions, Animal, CombatTraits, ConservationStatus, Formation, NaturalWeapon,
    Position, SpeciesRecord, TeamId, TerrainType,
};
use wildlands_lib::model::config::AppConfig;
use wildlands_lib::model::lifecycle;
use wildlands_lib::model::species::SpeciesCatalog;
use wildlands_lib::model::terrain::TerrainGrid;
use wildlands_lib::model::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type TerrainMod = Box<dyn FnOnce(&mut World)>;

/// Who commands a team spawned by the builder.
#[allow(dead_code)]
pub enum Leader {
    /// The first listed animal leads and fights.
    FirstMember,
    /// A robot of the given faction leads; every listed animal is a member.
    Robot(&'static str),
}

#[allow(dead_code)]
struct TeamSpec {
    members: Vec<usize>,
    formation: Formation,
    leader: Leader,
}

#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    catalog: SpeciesCatalog,
    animals: Vec<(Animal, Position)>,
    teams: Vec<TeamSpec>,
    terrain_mods: Vec<TerrainMod>,
    populate: bool,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.simulation.seed = Some(0);
        config.simulation.width = 32;
        config.simulation.height = 32;
        Self {
            config,
            catalog: SpeciesCatalog::default(),
            animals: Vec::new(),
            teams: Vec::new(),
            terrain_mods: Vec::new(),
            populate: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.simulation.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Uses the bundled species catalog and lets `World::populate` spawn the animals.
    pub fn with_bundled_species(mut self) -> Self {
        self.catalog = SpeciesCatalog::bundled().expect("bundled catalog parses");
        self.populate = true;
        self
    }

    pub fn with_catalog(mut self, records: Vec<SpeciesRecord>) -> Self {
        self.catalog = SpeciesCatalog::from_records(records);
        self
    }

    pub fn with_animal(mut self, animal: Animal, x: f64, y: f64) -> Self {
        self.animals.push((animal, Position::new(x, y)));
        self
    }

    /// Groups previously added animals (by insertion index) into a team.
    pub fn with_team(mut self, members: &[usize], formation: Formation, leader: Leader) -> Self {
        self.teams.push(TeamSpec {
            members: members.to_vec(),
            formation,
            leader,
        });
        self
    }

    /// Paints the whole grid with one terrain.
    pub fn with_uniform_terrain(mut self, terrain: TerrainType) -> Self {
        self.terrain_mods.push(Box::new(move |world| {
            world.terrain = TerrainGrid::new(
                world.config.simulation.width,
                world.config.simulation.height,
                terrain,
            );
        }));
        self
    }

    pub fn with_terrain(mut self, x: u16, y: u16, terrain: TerrainType) -> Self {
        self.terrain_mods.push(Box::new(move |world| {
            world.terrain.set(x, y, terrain);
        }));
        self
    }

    pub fn build(self) -> (World, Vec<hecs::Entity>, Vec<TeamId>) {
        let mut world = World::new(self.config, self.catalog).expect("valid test config");
        for modification in self.terrain_mods {
            modification(&mut world);
        }
        if self.populate {
            world.populate().expect("populate");
        }

        let handles: Vec<hecs::Entity> = self
            .animals
            .into_iter()
            .map(|(animal, pos)| world.spawn_animal(animal, pos))
            .collect();

        let mut team_ids = Vec::new();
        for spec in self.teams {
            let (leader, recruits) = match spec.leader {
                Leader::FirstMember => (handles[spec.members[0]], &spec.members[1..]),
                Leader::Robot(faction) => {
                    let anchor = world
                        .ecs
                        .get::<&Position>(handles[spec.members[0]])
                        .map(|p| *p)
                        .unwrap_or_default();
                    (world.spawn_robot("Warden", faction, anchor), &spec.members[..])
                }
            };
            let id = world
                .teams
                .create_team(&mut world.ecs, leader, spec.formation, world.time)
                .expect("create team");
            for index in recruits {
                world
                    .teams
                    .add_member(&mut world.ecs, id, handles[*index])
                    .expect("add member");
            }
            team_ids.push(id);
        }
        (world, handles, team_ids)
    }
}

/// Builds animals of a made-up species with explicit stats.
#[allow(dead_code)]
#[derive(Clone)]
pub struct AnimalBuilder {
    record: SpeciesRecord,
    age: f64,
    health: Option<f64>,
    seed: u64,
}

#[allow(dead_code)]
impl AnimalBuilder {
    pub fn new(species: &str) -> Self {
        Self {
            record: SpeciesRecord {
                name: species.to_string(),
                conservation_status: ConservationStatus::LeastConcern,
                habitat: TerrainType::Grassland,
                predator_pressure: 0.0,
                reproduction_rate: 1.0,
                generation_time: 100.0,
                max_health: 100.0,
                attack_multiplier: 1.0,
                armor_rating: 1.0,
                agility_score: 1.0,
                stamina_rating: 1.0,
                social_score: 1.0,
                maturity_score: 1.0,
                combat_traits: CombatTraits::new(),
                natural_weapons: Vec::new(),
                predator: false,
            },
            age: 0.0,
            health: None,
            seed: 0,
        }
    }

    pub fn predator(mut self) -> Self {
        self.record.predator = true;
        self
    }

    pub fn habitat(mut self, habitat: TerrainType) -> Self {
        self.record.habitat = habitat;
        self
    }

    pub fn status(mut self, status: ConservationStatus) -> Self {
        self.record.conservation_status = status;
        self
    }

    pub fn predator_pressure(mut self, pressure: f64) -> Self {
        self.record.predator_pressure = pressure;
        self
    }

    pub fn attack(mut self, value: f64) -> Self {
        self.record.attack_multiplier = value;
        self
    }

    pub fn armor(mut self, value: f64) -> Self {
        self.record.armor_rating = value;
        self
    }

    pub fn agility(mut self, value: f64) -> Self {
        self.record.agility_score = value;
        self
    }

    pub fn max_health(mut self, value: f64) -> Self {
        self.record.max_health = value;
        self
    }

    pub fn health(mut self, value: f64) -> Self {
        self.health = Some(value);
        self
    }

    pub fn age(mut self, age: f64) -> Self {
        self.age = age;
        self
    }

    pub fn weapon(mut self, weapon: NaturalWeapon) -> Self {
        self.record.natural_weapons.push(weapon);
        self
    }

    /// Distinguishes otherwise identical animals; the seed drives the UUID.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds another member of the same species.
    pub fn clone_with_seed(&self, seed: u64) -> Animal {
        self.clone().seed(seed).build()
    }

    pub fn record(&self) -> SpeciesRecord {
        self.record.clone()
    }

    pub fn build(self) -> Animal {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut animal = lifecycle::create_animal(&self.record, &mut rng);
        animal.age = self.age;
        if let Some(health) = self.health {
            animal.health = health;
        }
        animal.ambient = AmbientConditions::default();
        animal
    }
}
