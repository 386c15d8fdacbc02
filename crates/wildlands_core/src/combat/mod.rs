//! Team battles.
//!
//! [`CombatManager::resolve_battle`] turns two teams' stats, tags, weapons, terrain and
//! formations into a strength score each, rolls whether the fight happens at all, and
//! applies the outcome to the members' health and the teams' records. Ability cooldowns
//! and combat statuses persist between battles and are advanced by
//! [`CombatManager::update`].

pub mod damage;
pub mod tables;

pub use damage::Casualty;
pub use tables::{CombatStatus, StatusDefinition, TerrainModifier, TraitAbility};

use crate::config::CombatConfig;
use crate::error::{CoreError, Result};
use crate::team::{Team, TeamRegistry};
use crate::terrain::TerrainLookup;
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tables::{
    animal_habitat_modifier, formation_strength, status_definition, trait_ability,
    trait_terrain_bonus, weapon_damage_bonus, TEAM_SYNERGY_BONUS,
};
use wildlands_data::{Animal, CombatTrait, Formation, NaturalWeapon, Position, TeamId, TerrainType};

/// Random spread applied to each side's strength.
const STRENGTH_ROLL: (f64, f64) = (0.9, 1.3);
/// Health share below which a wounded member stops losing strength.
const MIN_HEALTH_FACTOR: f64 = 0.5;
const AGGRESSIVE_BATTLE_CHANCE: f64 = 1.0;
const DEFENSIVE_BATTLE_CHANCE: f64 = 0.6;

/// World state a battle reads and mutates.
pub struct BattleContext<'a> {
    pub world: &'a mut hecs::World,
    pub teams: &'a mut TeamRegistry,
    /// Without a grid every battle is fought on grassland.
    pub terrain: Option<&'a dyn TerrainLookup>,
    /// Simulated time, stamped as `last_battle` on both teams.
    pub now: f64,
}

/// Which side a strength comparison favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Draw,
    FirstWins,
    SecondWins,
}

/// Draw when the gap is under `draw_threshold` of the weaker side, else the stronger wins.
#[must_use]
pub fn decide_outcome(first: f64, second: f64, draw_threshold: f64) -> Decision {
    if (first - second).abs() < draw_threshold * first.min(second) {
        Decision::Draw
    } else if first > second {
        Decision::FirstWins
    } else {
        Decision::SecondWins
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BattleOutcome {
    Avoided,
    Draw {
        team1_casualties: Vec<Casualty>,
        team2_casualties: Vec<Casualty>,
    },
    Victory {
        winner: TeamId,
        loser: TeamId,
        winner_name: String,
        loser_name: String,
        loser_casualties: Vec<Casualty>,
    },
}

impl BattleOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avoided => "avoided",
            Self::Draw { .. } => "draw",
            Self::Victory { .. } => "victory",
        }
    }

    /// Every member killed, on either side.
    #[must_use]
    pub fn casualties(&self) -> Vec<&Casualty> {
        match self {
            Self::Avoided => Vec::new(),
            Self::Draw {
                team1_casualties,
                team2_casualties,
            } => team1_casualties.iter().chain(team2_casualties).collect(),
            Self::Victory {
                loser_casualties, ..
            } => loser_casualties.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleResult {
    #[serde(flatten)]
    pub outcome: BattleOutcome,
    pub terrain: TerrainType,
    pub team1_strength: f64,
    pub team2_strength: f64,
    pub narrative: String,
}

impl BattleResult {
    #[must_use]
    pub fn is_avoided(&self) -> bool {
        self.outcome == BattleOutcome::Avoided
    }
}

/// A team's summed strength and the abilities it would fire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStrength {
    pub total: f64,
    pub abilities: Vec<(hecs::Entity, CombatTrait)>,
}

#[derive(Debug, Clone, Default)]
pub struct CombatManager {
    pub config: CombatConfig,
    /// Seconds until each entity's ability can fire again.
    cooldowns: HashMap<hecs::Entity, BTreeMap<CombatTrait, f64>>,
    /// Seconds left on each entity's active statuses.
    statuses: HashMap<hecs::Entity, BTreeMap<CombatStatus, f64>>,
}

impl CombatManager {
    #[must_use]
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            cooldowns: HashMap::new(),
            statuses: HashMap::new(),
        }
    }

    /// Whether `entity` can fire the ability of `tag` right now.
    #[must_use]
    pub fn ability_ready(&self, entity: hecs::Entity, tag: CombatTrait) -> bool {
        self.cooldowns
            .get(&entity)
            .and_then(|c| c.get(&tag))
            .map_or(true, |remaining| *remaining <= 0.0)
    }

    #[must_use]
    pub fn cooldown_remaining(&self, entity: hecs::Entity, tag: CombatTrait) -> f64 {
        self.cooldowns
            .get(&entity)
            .and_then(|c| c.get(&tag))
            .copied()
            .unwrap_or(0.0)
    }

    fn status_strength(&self, entity: hecs::Entity) -> f64 {
        self.statuses.get(&entity).map_or(1.0, |active| {
            active
                .keys()
                .map(|s| status_definition(*s).strength)
                .product()
        })
    }

    /// Sums the fighting strength of a team's living members on `terrain`.
    #[must_use]
    pub fn team_strength(&self, world: &hecs::World, team: &Team, terrain: TerrainType) -> TeamStrength {
        let fighters: Vec<(hecs::Entity, Animal)> = team
            .members
            .iter()
            .filter_map(|m| world.get::<&Animal>(*m).ok().map(|a| (*m, (*a).clone())))
            .filter(|(_, a)| a.is_alive())
            .collect();

        let mut shared: BTreeMap<CombatTrait, usize> = BTreeMap::new();
        for (_, animal) in &fighters {
            for tag in animal.combat_traits.iter() {
                *shared.entry(tag).or_default() += 1;
            }
        }

        let mut strength = TeamStrength::default();
        for (entity, animal) in &fighters {
            let mut value = animal.attack_multiplier * animal_habitat_modifier(animal, terrain);
            for tag in animal.combat_traits.iter() {
                value *= trait_terrain_bonus(tag, terrain);
                let Some(ability) = trait_ability(tag) else {
                    continue;
                };
                if !self.ability_ready(*entity, tag) {
                    continue;
                }
                value *= ability.damage_multiplier;
                if ability.team_bonus && shared.get(&tag).is_some_and(|n| *n > 1) {
                    value *= TEAM_SYNERGY_BONUS;
                }
                strength.abilities.push((*entity, tag));
            }
            value *= weapon_damage_bonus(&animal.natural_weapons);
            value *= animal.health_ratio().max(MIN_HEALTH_FACTOR);
            value *= self.status_strength(*entity);
            strength.total += value;
        }
        strength
    }

    /// Probability that two teams actually engage.
    #[must_use]
    pub fn battle_chance(&self, first: &Team, second: &Team) -> f64 {
        let mut chance = self.config.base_battle_chance;
        if first.size().abs_diff(second.size()) > self.config.size_gap_threshold {
            chance *= self.config.size_gap_penalty;
        }
        let formations = (first.formation, second.formation);
        if formations.0 == Formation::Aggressive || formations.1 == Formation::Aggressive {
            chance = AGGRESSIVE_BATTLE_CHANCE;
        } else if formations == (Formation::Defensive, Formation::Defensive) {
            chance = DEFENSIVE_BATTLE_CHANCE;
        }
        chance
    }

    fn battle_terrain(ctx: &BattleContext<'_>, team: &Team) -> TerrainType {
        team.members
            .first()
            .and_then(|m| ctx.world.get::<&Position>(*m).ok().map(|p| *p))
            .and_then(|p| ctx.terrain.and_then(|t| t.terrain_at(p.x, p.y)))
            .unwrap_or(TerrainType::Grassland)
    }

    fn fire_abilities(&mut self, abilities: &[(hecs::Entity, CombatTrait)]) {
        for (entity, tag) in abilities {
            let Some(ability) = trait_ability(*tag) else {
                continue;
            };
            self.cooldowns
                .entry(*entity)
                .or_default()
                .insert(*tag, ability.cooldown);
            if let Some(status) = ability.status {
                self.start_status(*entity, status);
            }
        }
    }

    /// Bleeding from claws or fangs and poison from venom on every surviving loser.
    fn inflict_wounds(&mut self, world: &hecs::World, winners: &Team, losers: &Team) {
        let weapons: Vec<NaturalWeapon> = winners
            .members
            .iter()
            .filter_map(|m| world.get::<&Animal>(*m).ok())
            .filter(|a| a.is_alive())
            .flat_map(|a| a.natural_weapons.clone())
            .collect();
        let mut wounds = Vec::new();
        if weapons
            .iter()
            .any(|w| matches!(w, NaturalWeapon::Claws | NaturalWeapon::Fangs))
        {
            wounds.push(CombatStatus::Bleeding);
        }
        if weapons.contains(&NaturalWeapon::Venom) {
            wounds.push(CombatStatus::Poisoned);
        }
        for member in &losers.members {
            for wound in &wounds {
                self.start_status(*member, *wound);
            }
        }
    }

    /// Resolves one encounter between two teams.
    ///
    /// An avoided battle (either side empty, or the engagement roll failing) leaves every
    /// team, animal and cooldown untouched.
    pub fn resolve_battle<R: Rng>(
        &mut self,
        ctx: &mut BattleContext<'_>,
        first: TeamId,
        second: TeamId,
        rng: &mut R,
    ) -> Result<BattleResult> {
        let team1 = ctx.teams.get(first).ok_or(CoreError::UnknownTeam(first))?.clone();
        let team2 = ctx.teams.get(second).ok_or(CoreError::UnknownTeam(second))?.clone();
        let terrain = Self::battle_terrain(ctx, &team1);
        let name1 = team1.display_name(ctx.world);
        let name2 = team2.display_name(ctx.world);

        let strength1 = self.team_strength(ctx.world, &team1, terrain);
        let strength2 = self.team_strength(ctx.world, &team2, terrain);
        let s1 = strength1.total
            * formation_strength(team1.formation)
            * rng.gen_range(STRENGTH_ROLL.0..=STRENGTH_ROLL.1);
        let s2 = strength2.total
            * formation_strength(team2.formation)
            * rng.gen_range(STRENGTH_ROLL.0..=STRENGTH_ROLL.1);

        let avoided = |narrative: String| BattleResult {
            outcome: BattleOutcome::Avoided,
            terrain,
            team1_strength: s1,
            team2_strength: s2,
            narrative,
        };
        if team1.members.is_empty() || team2.members.is_empty() {
            return Ok(avoided(format!("{name1} and {name2} found no one to fight")));
        }
        let chance = self.battle_chance(&team1, &team2);
        if rng.gen::<f64>() > chance {
            tracing::info!(team1 = %first, team2 = %second, chance, "Battle avoided");
            return Ok(avoided(format!("{name1} and {name2} avoided battle on {terrain}")));
        }

        self.fire_abilities(&strength1.abilities);
        self.fire_abilities(&strength2.abilities);

        let outcome = match decide_outcome(s1, s2, self.config.draw_threshold) {
            Decision::Draw => {
                let range = self.config.draw_damage;
                let team = ctx.teams.get_mut(first).ok_or(CoreError::UnknownTeam(first))?;
                let team1_casualties = self.apply_team_damage(ctx.world, team, range, terrain, rng);
                team.battle_stats.members_lost += team1_casualties.len() as u32;
                let team = ctx.teams.get_mut(second).ok_or(CoreError::UnknownTeam(second))?;
                let team2_casualties = self.apply_team_damage(ctx.world, team, range, terrain, rng);
                team.battle_stats.members_lost += team2_casualties.len() as u32;
                BattleOutcome::Draw {
                    team1_casualties,
                    team2_casualties,
                }
            }
            decision => {
                let (winner, loser, winner_name, loser_name) = if decision == Decision::FirstWins {
                    (first, second, name1.clone(), name2.clone())
                } else {
                    (second, first, name2.clone(), name1.clone())
                };
                let range = self.config.defeat_damage;
                let team = ctx.teams.get_mut(loser).ok_or(CoreError::UnknownTeam(loser))?;
                let loser_casualties = self.apply_team_damage(ctx.world, team, range, terrain, rng);
                team.battle_stats.losses += 1;
                team.battle_stats.members_lost += loser_casualties.len() as u32;
                let losers = team.clone();

                let team = ctx.teams.get_mut(winner).ok_or(CoreError::UnknownTeam(winner))?;
                team.battle_stats.wins += 1;
                let winners = team.clone();
                self.inflict_wounds(ctx.world, &winners, &losers);

                BattleOutcome::Victory {
                    winner,
                    loser,
                    winner_name,
                    loser_name,
                    loser_casualties,
                }
            }
        };

        for id in [first, second] {
            if let Some(team) = ctx.teams.get_mut(id) {
                team.last_battle = Some(ctx.now);
            }
        }

        let narrative = match &outcome {
            BattleOutcome::Victory {
                winner_name,
                loser_name,
                loser_casualties,
                ..
            } => format!(
                "{winner_name} defeated {loser_name} on {terrain}, {} fell",
                loser_casualties.len()
            ),
            BattleOutcome::Draw { .. } => {
                format!("{name1} and {name2} fought to a draw on {terrain}")
            }
            BattleOutcome::Avoided => format!("{name1} and {name2} avoided battle"),
        };
        tracing::info!(
            team1 = %first,
            team2 = %second,
            outcome = outcome.as_str(),
            %terrain,
            strength1 = s1,
            strength2 = s2,
            casualties = outcome.casualties().len(),
            "Battle resolved"
        );

        Ok(BattleResult {
            outcome,
            terrain,
            team1_strength: s1,
            team2_strength: s2,
            narrative,
        })
    }

    /// Advances ability cooldowns and combat statuses by `dt` seconds.
    ///
    /// Status damage clamps health at zero. Returns the animals this tick's statuses killed.
    pub fn update(&mut self, dt: f64, world: &mut hecs::World) -> Vec<hecs::Entity> {
        for remaining in self.cooldowns.values_mut() {
            remaining.retain(|_, seconds| {
                *seconds -= dt;
                *seconds > 0.0
            });
        }
        self.cooldowns
            .retain(|entity, remaining| !remaining.is_empty() && world.contains(*entity));

        let mut killed = Vec::new();
        self.statuses.retain(|entity, active| {
            let Ok(mut animal) = world.get::<&mut Animal>(*entity) else {
                return false;
            };
            let was_alive = animal.is_alive();
            active.retain(|status, seconds| {
                let definition = status_definition(*status);
                if definition.hp_per_second != 0.0 {
                    animal.health =
                        (animal.health + definition.hp_per_second * dt).clamp(0.0, animal.max_health);
                }
                *seconds -= dt;
                *seconds > 0.0
            });
            if was_alive && !animal.is_alive() {
                tracing::debug!(species = %animal.name, "Succumbed to wounds");
                killed.push(*entity);
            }
            !active.is_empty()
        });
        killed
    }

    /// Active statuses on `entity` with their remaining seconds.
    #[must_use]
    pub fn statuses(&self, entity: hecs::Entity) -> Vec<(CombatStatus, f64)> {
        self.statuses
            .get(&entity)
            .map(|active| active.iter().map(|(s, t)| (*s, *t)).collect())
            .unwrap_or_default()
    }
}
