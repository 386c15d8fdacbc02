use super::tables::{formation_damage, status_definition, terrain_modifier, CombatStatus};
use super::CombatManager;
use crate::team::Team;
use rand::Rng;
use serde::Serialize;
use wildlands_data::{Animal, TerrainType};

/// Damage multiplier applied when a member dodges.
const DODGE_DAMAGE: f64 = 0.5;

/// A member killed in battle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Casualty {
    #[serde(skip)]
    pub entity: hecs::Entity,
    pub name: String,
}

impl CombatManager {
    /// Combined damage-taken multiplier of the entity's active statuses.
    #[must_use]
    pub fn damage_taken_multiplier(&self, entity: hecs::Entity) -> f64 {
        self.statuses.get(&entity).map_or(1.0, |active| {
            active
                .keys()
                .map(|s| status_definition(*s).damage_taken)
                .product()
        })
    }

    /// Deals battle damage to every member of `team`.
    ///
    /// Each member takes `randint(range) * formation_damage / terrain_defense`, scaled by
    /// `2 - armor_rating` and halved on a successful dodge. Members left at zero health
    /// are removed from the team, lose their back-reference, and are returned.
    pub fn apply_team_damage<R: Rng>(
        &self,
        world: &mut hecs::World,
        team: &mut Team,
        range: [u32; 2],
        terrain: TerrainType,
        rng: &mut R,
    ) -> Vec<Casualty> {
        let (low, high) = (range[0].min(range[1]), range[0].max(range[1]));
        let defense = terrain_modifier(terrain).defense.max(1.0);
        let formation = formation_damage(team.formation);

        let mut casualties = Vec::new();
        for member in &team.members {
            let Ok(mut animal) = world.get::<&mut Animal>(*member) else {
                continue;
            };
            let base = f64::from(rng.gen_range(low..=high));
            let mut actual = base * formation / defense;
            actual *= (2.0 - animal.armor_rating).max(0.0);
            actual *= self.damage_taken_multiplier(*member);

            let dodge_chance = (animal.agility_score / 1000.0).min(self.config.max_dodge);
            if rng.gen::<f64>() < dodge_chance {
                actual *= DODGE_DAMAGE;
            }

            animal.health = (animal.health - actual).max(0.0);
            tracing::trace!(
                species = %animal.name,
                damage = actual,
                health = animal.health,
                "Battle damage"
            );
            if animal.health <= 0.0 {
                animal.team = None;
                animal.team_role = None;
                casualties.push(Casualty {
                    entity: *member,
                    name: animal.name.clone(),
                });
            }
        }

        if !casualties.is_empty() {
            team.members
                .retain(|m| casualties.iter().all(|c| c.entity != *m));
            tracing::debug!(team = %team.id, casualties = casualties.len(), "Team lost members");
        }
        casualties
    }

    /// Starts (or restarts) a combat status on an entity.
    pub fn start_status(&mut self, entity: hecs::Entity, status: CombatStatus) {
        self.statuses
            .entry(entity)
            .or_default()
            .insert(status, status_definition(status).duration);
    }

    #[must_use]
    pub fn has_status(&self, entity: hecs::Entity, status: CombatStatus) -> bool {
        self.statuses
            .get(&entity)
            .is_some_and(|active| active.contains_key(&status))
    }
}
