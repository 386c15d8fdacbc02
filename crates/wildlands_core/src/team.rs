//! Teams and the registry that owns them.
//!
//! Teams hold `hecs::Entity` handles, never the animals themselves. An animal's
//! `team` field is a non-owning back-reference kept in sync by the registry.

use crate::error::{CoreError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use wildlands_data::{Animal, BattleStats, Formation, Position, Robot, TeamId};

/// Species key used for robot-led teams in per-species statistics.
pub const ROBOT_SPECIES: &str = "Robot";

#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(skip)]
    pub leader: hecs::Entity,
    /// Fighting members, in recruitment order.
    #[serde(skip)]
    pub members: Vec<hecs::Entity>,
    pub formation: Formation,
    pub battle_stats: BattleStats,
    /// Simulated time of the last battle, if any.
    pub last_battle: Option<f64>,
    pub created_at: f64,
}

impl Team {
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Species name of the leader, or [`ROBOT_SPECIES`] for a robot leader.
    #[must_use]
    pub fn leader_species(&self, world: &hecs::World) -> Option<String> {
        if let Ok(animal) = world.get::<&Animal>(self.leader) {
            return Some(animal.name.clone());
        }
        world
            .get::<&Robot>(self.leader)
            .ok()
            .map(|_| ROBOT_SPECIES.to_string())
    }

    /// Display name: the leader's name followed by the team handle.
    #[must_use]
    pub fn display_name(&self, world: &hecs::World) -> String {
        if let Ok(robot) = world.get::<&Robot>(self.leader) {
            return format!("{} ({})", robot.name, self.id);
        }
        match self.leader_species(world) {
            Some(species) => format!("{species} pack ({})", self.id),
            None => self.id.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamRegistry {
    teams: BTreeMap<TeamId, Team>,
    next_id: u32,
    battle_cooldown: f64,
}

impl TeamRegistry {
    #[must_use]
    pub fn new(battle_cooldown: f64) -> Self {
        Self {
            teams: BTreeMap::new(),
            next_id: 0,
            battle_cooldown,
        }
    }

    /// Creates a team led by `leader`. An animal leader also becomes the first member;
    /// a robot leader commands without fighting.
    pub fn create_team(
        &mut self,
        world: &mut hecs::World,
        leader: hecs::Entity,
        formation: Formation,
        now: f64,
    ) -> Result<TeamId> {
        let leads_as_animal = match world.get::<&Animal>(leader) {
            Ok(animal) => {
                if let Some(team) = animal.team {
                    return Err(CoreError::AlreadyInTeam {
                        entity: leader,
                        team,
                    });
                }
                true
            }
            Err(_) if world.get::<&Robot>(leader).is_ok() => false,
            Err(_) => return Err(CoreError::UnknownEntity(leader)),
        };

        let id = TeamId(self.next_id);
        self.next_id += 1;
        self.teams.insert(
            id,
            Team {
                id,
                leader,
                members: Vec::new(),
                formation,
                battle_stats: BattleStats::default(),
                last_battle: None,
                created_at: now,
            },
        );
        if leads_as_animal {
            self.add_member(world, id, leader)?;
        }
        tracing::debug!(team = %id, formation = %formation, "Team created");
        Ok(id)
    }

    /// Recruits an animal. Fails if it already belongs to a team.
    pub fn add_member(
        &mut self,
        world: &mut hecs::World,
        id: TeamId,
        entity: hecs::Entity,
    ) -> Result<()> {
        let team = self.teams.get_mut(&id).ok_or(CoreError::UnknownTeam(id))?;
        let mut animal = world
            .get::<&mut Animal>(entity)
            .map_err(|_| CoreError::UnknownEntity(entity))?;
        if let Some(current) = animal.team {
            return Err(CoreError::AlreadyInTeam {
                entity,
                team: current,
            });
        }
        animal.team = Some(id);
        team.members.push(entity);
        Ok(())
    }

    /// Removes a member and clears its back-reference. Returns whether it was a member.
    pub fn remove_member(
        &mut self,
        world: &mut hecs::World,
        id: TeamId,
        entity: hecs::Entity,
    ) -> Result<bool> {
        let team = self.teams.get_mut(&id).ok_or(CoreError::UnknownTeam(id))?;
        let before = team.members.len();
        team.members.retain(|m| *m != entity);
        let removed = team.members.len() < before;
        if removed {
            clear_back_reference(world, entity, id);
        }
        Ok(removed)
    }

    #[must_use]
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn get_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<TeamId> {
        self.teams.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Centroid of the members' positions; `None` for an unknown or empty team.
    #[must_use]
    pub fn get_average_position(&self, world: &hecs::World, id: TeamId) -> Option<Position> {
        let team = self.teams.get(&id)?;
        let positions: Vec<Position> = team
            .members
            .iter()
            .filter_map(|m| world.get::<&Position>(*m).ok().map(|p| *p))
            .collect();
        if positions.is_empty() {
            return None;
        }
        let n = positions.len() as f64;
        Some(Position::new(
            positions.iter().map(|p| p.x).sum::<f64>() / n,
            positions.iter().map(|p| p.y).sum::<f64>() / n,
        ))
    }

    /// A team can fight when it has members and its battle cooldown has elapsed.
    #[must_use]
    pub fn is_ready_for_battle(&self, id: TeamId, now: f64) -> bool {
        self.teams.get(&id).is_some_and(|team| {
            !team.members.is_empty()
                && team
                    .last_battle
                    .map_or(true, |last| now - last >= self.battle_cooldown)
        })
    }

    /// Removes a team and clears every member's back-reference.
    pub fn disband(&mut self, world: &mut hecs::World, id: TeamId) -> Option<Team> {
        let team = self.teams.remove(&id)?;
        for member in &team.members {
            clear_back_reference(world, *member, id);
        }
        tracing::debug!(team = %id, "Team disbanded");
        Some(team)
    }

    /// Drops dead or despawned members and disbands teams left empty.
    /// Returns the disbanded team ids.
    pub fn prune(&mut self, world: &mut hecs::World) -> Vec<TeamId> {
        let mut emptied = Vec::new();
        for team in self.teams.values_mut() {
            let mut gone = Vec::new();
            team.members.retain(|m| {
                let alive = world.get::<&Animal>(*m).is_ok_and(|a| a.is_alive());
                if !alive {
                    gone.push(*m);
                }
                alive
            });
            for member in gone {
                clear_back_reference(world, member, team.id);
            }
            if team.members.is_empty() {
                emptied.push(team.id);
            }
        }
        for id in &emptied {
            self.disband(world, *id);
        }
        emptied
    }
}

fn clear_back_reference(world: &mut hecs::World, entity: hecs::Entity, id: TeamId) {
    if let Ok(mut animal) = world.get::<&mut Animal>(entity) {
        if animal.team == Some(id) {
            animal.team = None;
            animal.team_role = None;
        }
    }
}
