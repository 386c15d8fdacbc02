use crate::model::combat::{BattleContext, BattleOutcome, BattleResult};
use crate::model::evolution::{CombatResult, EvolutionContext};
use crate::model::lifecycle;
use crate::model::terrain::{compatibility, Compatibility, TerrainLookup};
use crate::model::world::World;
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Instant;
use wildlands_core::HealthMoodSystem;
use wildlands_data::{
    AmbientConditions, Animal, CombatStrategy, Formation, Position, TeamId, TerrainType,
};

/// Distance units per second at agility 1.0.
const MOVE_SPEED: f64 = 2.0;
/// Ticks between population samples fed into the species statistics.
const CENSUS_INTERVAL: u64 = 50;
/// Share of `encounter_range` within which two animals can breed.
const BREEDING_RANGE_SHARE: f64 = 0.5;
/// Scales action deltas applied continuously from terrain.
const TERRAIN_REST_INTENSITY: f64 = 0.1;
const TERRAIN_STRAIN_INTENSITY: f64 = 0.25;

/// What happened during one tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub battles: Vec<BattleResult>,
    pub births: usize,
    pub deaths: usize,
    /// Animals that went through the co-evolution hooks.
    pub evolved: usize,
}

/// Typical readings of a terrain, used as an animal's ambient conditions.
fn ambient_for(terrain: TerrainType) -> AmbientConditions {
    let (temperature, humidity, food) = match terrain {
        TerrainType::Desert => (35.0, 0.15, 0.3),
        TerrainType::Savanna => (28.0, 0.35, 0.5),
        TerrainType::Grassland => (20.0, 0.5, 0.7),
        TerrainType::Forest => (16.0, 0.7, 0.8),
        TerrainType::ForestEdge => (18.0, 0.6, 0.75),
        TerrainType::Hills => (12.0, 0.5, 0.6),
        TerrainType::WoodedHills => (13.0, 0.6, 0.65),
        TerrainType::Mountain => (4.0, 0.4, 0.35),
        TerrainType::Aquatic => (18.0, 0.95, 0.6),
        TerrainType::Wetland => (20.0, 0.85, 0.7),
        TerrainType::Beach => (24.0, 0.75, 0.5),
    };
    AmbientConditions {
        temperature: Some(temperature),
        humidity: Some(humidity),
        food_availability: Some(food),
    }
}

/// Best compatibility over the animal's habitat and evolved preferences.
fn best_compatibility(animal: &Animal, terrain: TerrainType) -> Compatibility {
    let mut best = Compatibility::Harmful;
    for habitat in animal.preferred_terrains() {
        match compatibility(habitat, terrain) {
            Compatibility::Optimal => return Compatibility::Optimal,
            Compatibility::Survivable => best = Compatibility::Survivable,
            Compatibility::Harmful => {}
        }
    }
    best
}

/// First living member of a team, cloned.
fn representative(world: &hecs::World, members: &[hecs::Entity]) -> Option<Animal> {
    members
        .iter()
        .filter_map(|m| world.get::<&Animal>(*m).ok())
        .find(|a| a.is_alive())
        .map(|a| (*a).clone())
}

impl World {
    /// Advances the simulation by one tick.
    ///
    /// Moves animals, applies terrain effects to their vitals, runs the evolution and
    /// combat managers, resolves battles between teams in range, breeds adjacent
    /// eligible pairs and finally clears out the dead.
    pub fn update(&mut self) -> anyhow::Result<TickReport> {
        let started = Instant::now();
        let dt = self.config.simulation.dt;
        self.tick += 1;
        self.time += dt;
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };

        self.pass_movement(dt);
        self.pass_vitals(dt);

        let summary = {
            let mut ctx = EvolutionContext {
                world: &mut self.ecs,
                teams: &self.teams,
                terrain: &self.terrain,
            };
            self.evolution.update(dt, &mut ctx, &mut self.rng)
        };
        report.evolved = summary.animals_evolved;

        let wounded = self.combat.update(dt, &mut self.ecs);
        if !wounded.is_empty() {
            self.metrics.add_to_counter("casualties", wounded.len() as u64);
        }

        self.pass_battles(&mut report)?;
        report.births = self.pass_breeding()?;
        report.deaths = self.pass_cleanup();

        if self.tick % CENSUS_INTERVAL == 0 {
            for (species, count) in self.populations() {
                self.evolution.record_population(&species, count);
            }
        }

        self.metrics
            .record_tick(started.elapsed(), self.population(), self.teams.len());
        Ok(report)
    }

    /// Teams that are not holding a defensive line close on the nearest other team;
    /// loners wander.
    fn pass_movement(&mut self, dt: f64) {
        let centroids: Vec<(TeamId, Position, Formation)> = self
            .teams
            .iter()
            .filter_map(|team| {
                self.teams
                    .get_average_position(&self.ecs, team.id)
                    .map(|p| (team.id, p, team.formation))
            })
            .collect();
        let targets: HashMap<TeamId, Position> = centroids
            .iter()
            .map(|(id, own, formation)| {
                let nearest = centroids
                    .iter()
                    .filter(|(other, ..)| other != id)
                    .min_by(|a, b| own.distance(&a.1).total_cmp(&own.distance(&b.1)))
                    .map(|(_, p, _)| *p);
                let target = match (formation, nearest) {
                    (Formation::Defensive, _) | (_, None) => *own,
                    (_, Some(enemy)) => enemy,
                };
                (*id, target)
            })
            .collect();

        let max_x = (f64::from(self.terrain.width) - 0.001).max(0.0);
        let max_y = (f64::from(self.terrain.height) - 0.001).max(0.0);
        for (_handle, (animal, pos)) in self.ecs.query_mut::<(&Animal, &mut Position)>() {
            if !animal.is_alive() {
                continue;
            }
            let step = animal.agility_score * dt * MOVE_SPEED;
            let (dx, dy) = match animal.team.and_then(|t| targets.get(&t)) {
                Some(target) => {
                    let distance = pos.distance(target);
                    if distance > f64::EPSILON {
                        ((target.x - pos.x) / distance, (target.y - pos.y) / distance)
                    } else {
                        (0.0, 0.0)
                    }
                }
                None => (0.0, 0.0),
            };
            let jitter_x: f64 = self.rng.gen_range(-1.0..=1.0);
            let jitter_y: f64 = self.rng.gen_range(-1.0..=1.0);
            pos.x = (pos.x + (dx + jitter_x) * step).clamp(0.0, max_x);
            pos.y = (pos.y + (dy + jitter_y) * step).clamp(0.0, max_y);
        }
    }

    /// Ages every animal, refreshes its ambient readings and applies terrain comfort or
    /// strain to health and mood.
    fn pass_vitals(&mut self, dt: f64) {
        for (_handle, (animal, pos)) in self.ecs.query_mut::<(&mut Animal, &Position)>() {
            if !animal.is_alive() {
                continue;
            }
            animal.age += dt;
            let terrain = self
                .terrain
                .terrain_at(pos.x, pos.y)
                .unwrap_or(TerrainType::Grassland);
            animal.ambient = ambient_for(terrain);

            let (hp, mood) = match best_compatibility(animal, terrain) {
                Compatibility::Optimal => self
                    .health_mood
                    .apply_action("rest", dt * TERRAIN_REST_INTENSITY),
                Compatibility::Survivable => (0.0, 0.0),
                Compatibility::Harmful => self
                    .health_mood
                    .apply_action("flee", dt * TERRAIN_STRAIN_INTENSITY),
            };
            let (health, mood) = HealthMoodSystem::clamp_vitals(
                animal.health + hp,
                animal.mood + mood,
                animal.max_health,
                animal.max_mood,
            );
            animal.health = health;
            animal.mood = mood;
        }
    }

    /// Resolves at most one battle per team per tick between ready teams in range.
    fn pass_battles(&mut self, report: &mut TickReport) -> anyhow::Result<()> {
        let ids = self.teams.ids();
        let range = self.config.simulation.encounter_range;
        let mut engaged: BTreeSet<TeamId> = BTreeSet::new();

        for (i, first) in ids.iter().enumerate() {
            for second in &ids[i + 1..] {
                if engaged.contains(first) || engaged.contains(second) {
                    continue;
                }
                if !self.teams.is_ready_for_battle(*first, self.time)
                    || !self.teams.is_ready_for_battle(*second, self.time)
                {
                    continue;
                }
                let (Some(a), Some(b)) = (
                    self.teams.get_average_position(&self.ecs, *first),
                    self.teams.get_average_position(&self.ecs, *second),
                ) else {
                    continue;
                };
                if a.distance(&b) > range {
                    continue;
                }

                let sides = [*first, *second].map(|id| {
                    let team = self.teams.get(id);
                    (
                        id,
                        team.map(|t| t.formation).unwrap_or_default(),
                        team.and_then(|t| representative(&self.ecs, &t.members)),
                    )
                });
                let result = {
                    let mut ctx = BattleContext {
                        world: &mut self.ecs,
                        teams: &mut self.teams,
                        terrain: Some(&self.terrain),
                        now: self.time,
                    };
                    self.combat
                        .resolve_battle(&mut ctx, *first, *second, &mut self.rng)?
                };
                engaged.insert(*first);
                engaged.insert(*second);
                self.record_battle(&result, &sides);
                report.battles.push(result);
            }
        }
        Ok(())
    }

    /// Feeds a battle outcome into the metrics, the evolution trackers and the
    /// fighters' moods.
    fn record_battle(&mut self, result: &BattleResult, sides: &[(TeamId, Formation, Option<Animal>); 2]) {
        let results = match &result.outcome {
            BattleOutcome::Avoided => {
                self.metrics.increment_counter("battles_avoided");
                return;
            }
            BattleOutcome::Draw { .. } => {
                self.metrics.increment_counter("draws");
                [CombatResult::Draw, CombatResult::Draw]
            }
            BattleOutcome::Victory { winner, .. } => {
                if *winner == sides[0].0 {
                    [CombatResult::Win, CombatResult::Loss]
                } else {
                    [CombatResult::Loss, CombatResult::Win]
                }
            }
        };
        self.metrics.increment_counter("battles");
        self.metrics
            .add_to_counter("casualties", result.outcome.casualties().len() as u64);

        for (index, (id, formation, fighter)) in sides.iter().enumerate() {
            let (opponent_side, own_result) = (&sides[1 - index], results[index]);
            if let (Some(me), Some(them)) = (fighter, &opponent_side.2) {
                self.evolution.record_combat_outcome(
                    &me.name,
                    &them.name,
                    CombatStrategy::from(*formation),
                    own_result,
                );
                if me.predator && !them.predator {
                    self.evolution
                        .record_hunt_outcome(me, them, own_result == CombatResult::Win);
                }
            }

            let action = match own_result {
                CombatResult::Win => "hunt_success",
                CombatResult::Loss => "hunt_failure",
                CombatResult::Draw => "flee",
            };
            let (_, mood) = self.health_mood.apply_action(action, 1.0);
            let members = self.teams.get(*id).map(|t| t.members.clone()).unwrap_or_default();
            for member in members {
                if let Ok(mut animal) = self.ecs.get::<&mut Animal>(member) {
                    animal.mood = (animal.mood + mood).clamp(0.0, animal.max_mood);
                }
            }
        }
    }

    /// Breeds adjacent same-species pairs and spawns their young next to the first parent.
    /// Each animal breeds at most once per tick.
    fn pass_breeding(&mut self) -> anyhow::Result<usize> {
        let range = self.config.simulation.encounter_range * BREEDING_RANGE_SHARE;
        let animals: Vec<(hecs::Entity, Animal, Position)> = self
            .ecs
            .query::<(&Animal, &Position)>()
            .iter()
            .filter(|(_, (a, _))| a.is_alive())
            .map(|(handle, (a, p))| (handle, a.clone(), *p))
            .collect();
        let mut populations = self.populations();
        let mut bred: HashSet<hecs::Entity> = HashSet::new();
        let mut newborns = Vec::new();

        for (i, (first, a, pa)) in animals.iter().enumerate() {
            for (second, b, pb) in &animals[i + 1..] {
                if bred.contains(first) || bred.contains(second) {
                    continue;
                }
                if a.name != b.name || pa.distance(pb) > range {
                    continue;
                }
                let population = populations.get(&a.name).copied().unwrap_or(0);
                if !self.evolution.should_reproduce(a, b, population, &mut self.rng) {
                    continue;
                }

                let (mut mother, mut father) = (a.clone(), b.clone());
                let offspring =
                    self.evolution
                        .create_offspring(&mut mother, &mut father, population, &mut self.rng)?;
                let (_, mood) = self.health_mood.apply_action("mate", 1.0);
                for (handle, parent) in [(*first, &mother), (*second, &father)] {
                    if let Ok(mut animal) = self.ecs.get::<&mut Animal>(handle) {
                        animal.genome = parent.genome.clone();
                        animal.mood = (animal.mood + mood).clamp(0.0, animal.max_mood);
                    }
                }

                let child = lifecycle::create_newborn(&mother, offspring, &mut self.rng);
                tracing::debug!(species = %child.name, generation = child.generation, "Birth");
                newborns.push((child, *pa));
                bred.insert(*first);
                bred.insert(*second);
                *populations.entry(a.name.clone()).or_insert(0) += 1;
            }
        }

        let births = newborns.len();
        for (child, near) in newborns {
            let pos = self.jitter(near, 1.0);
            self.spawn_animal(child, pos);
        }
        if births > 0 {
            self.metrics.add_to_counter("births", births as u64);
        }
        Ok(births)
    }

    /// Drops the dead from their teams, disbands emptied teams and despawns the bodies.
    fn pass_cleanup(&mut self) -> usize {
        let disbanded = self.teams.prune(&mut self.ecs);
        if !disbanded.is_empty() {
            tracing::debug!(teams = ?disbanded, "Teams disbanded");
        }

        let dead: Vec<(hecs::Entity, Animal)> = self
            .ecs
            .query::<&Animal>()
            .iter()
            .filter(|(_, a)| !a.is_alive())
            .map(|(handle, a)| (handle, a.clone()))
            .collect();
        for (handle, animal) in &dead {
            self.evolution.forget_animal(animal);
            let _ = self.ecs.despawn(*handle);
        }

        let mut orphaned_leaders = Vec::new();
        let leaders: BTreeSet<hecs::Entity> = self.teams.iter().map(|t| t.leader).collect();
        for (handle, _robot) in self.ecs.query::<&wildlands_data::Robot>().iter() {
            if !leaders.contains(&handle) {
                orphaned_leaders.push(handle);
            }
        }
        for handle in orphaned_leaders {
            let _ = self.ecs.despawn(handle);
        }
        dead.len()
    }

    /// Runs `ticks` updates and returns the totals.
    pub fn run(&mut self, ticks: u64) -> anyhow::Result<RunSummary> {
        let mut summary = RunSummary::default();
        for _ in 0..ticks {
            let report = self.update()?;
            summary.ticks += 1;
            summary.births += report.births;
            summary.deaths += report.deaths;
            for battle in &report.battles {
                *summary
                    .outcomes
                    .entry(battle.outcome.as_str().to_string())
                    .or_insert(0) += 1;
            }
            if self.population() == 0 {
                tracing::warn!(tick = self.tick, "Every animal has died");
                break;
            }
        }
        Ok(summary)
    }
}

/// Totals over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub births: usize,
    pub deaths: usize,
    /// Battles per outcome (`avoided`, `draw`, `victory`).
    pub outcomes: BTreeMap<String, usize>,
}
