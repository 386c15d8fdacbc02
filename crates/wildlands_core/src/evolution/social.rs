use super::EvolutionManager;
use crate::history::{RollingWindow, SHORT_HISTORY_CAP};
use crate::team::Team;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use wildlands_data::{Animal, Formation, GeneKind, TeamRole};

/// Samples a team size needs before it can be called optimal.
const MIN_SIZE_SAMPLES: usize = 3;
/// Rolling performance above which a role counts as a species specialty.
const ROLE_SPECIALTY_ABOVE: f64 = 0.7;
const SOCIAL_NUDGE: f64 = 0.1;
const ROLE_SCORE_WEIGHT: f64 = 1.5;
const SPECIALTY_ROLE_BOOST: f64 = 1.3;
const ROLE_REINFORCEMENT: f64 = 1.02;

/// Normalized performance readings of one team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamMetrics {
    /// Win share of decided battles.
    pub combat: f64,
    /// Share of members that survived.
    pub survival: f64,
    /// Average member health fraction.
    pub resource: f64,
}

impl TeamMetrics {
    /// Reads the metrics off a team's record and its members' health.
    #[must_use]
    pub fn for_team(team: &Team, world: &hecs::World) -> Self {
        let stats = &team.battle_stats;
        let combat = if stats.battles() == 0 {
            0.5
        } else {
            f64::from(stats.wins) / f64::from(stats.battles())
        };
        let alive = team.members.len() as f64;
        let survival = if alive + f64::from(stats.members_lost) == 0.0 {
            1.0
        } else {
            alive / (alive + f64::from(stats.members_lost))
        };
        let ratios: Vec<f64> = team
            .members
            .iter()
            .filter_map(|m| world.get::<&Animal>(*m).ok().map(|a| a.health_ratio()))
            .collect();
        let resource = if ratios.is_empty() {
            0.0
        } else {
            ratios.iter().sum::<f64>() / ratios.len() as f64
        };
        Self {
            combat,
            survival,
            resource,
        }
    }

    #[must_use]
    pub fn performance(&self) -> f64 {
        self.combat * 0.4 + self.survival * 0.3 + self.resource * 0.3
    }
}

/// What a species has learned about how its teams perform.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SocialMemory {
    pub team_size_performance: BTreeMap<usize, RollingWindow<f64>>,
    pub formation_success: BTreeMap<Formation, RollingWindow<f64>>,
    pub role_performance: BTreeMap<TeamRole, RollingWindow<f64>>,
    pub optimal_team_size: Option<usize>,
    pub best_formation: Option<Formation>,
    pub specialized_roles: BTreeSet<TeamRole>,
}

impl SocialMemory {
    fn record(&mut self, size: usize, formation: Formation, roles: &[TeamRole], performance: f64) {
        self.team_size_performance
            .entry(size)
            .or_insert_with(|| RollingWindow::new(SHORT_HISTORY_CAP))
            .push(performance);
        self.formation_success
            .entry(formation)
            .or_insert_with(|| RollingWindow::new(SHORT_HISTORY_CAP))
            .push(performance);
        for role in roles {
            self.role_performance
                .entry(*role)
                .or_insert_with(|| RollingWindow::new(SHORT_HISTORY_CAP))
                .push(performance);
        }

        self.optimal_team_size = best_by_mean(
            self.team_size_performance
                .iter()
                .filter(|(_, w)| w.len() >= MIN_SIZE_SAMPLES),
        )
        .or(self.optimal_team_size);
        self.best_formation = best_by_mean(self.formation_success.iter());
        self.specialized_roles = self
            .role_performance
            .iter()
            .filter(|(_, w)| w.mean().is_some_and(|m| m > ROLE_SPECIALTY_ABOVE))
            .map(|(role, _)| *role)
            .collect();
    }
}

/// Key with the highest window mean; the first key wins ties.
fn best_by_mean<'a, K: Copy + 'a>(
    windows: impl Iterator<Item = (&'a K, &'a RollingWindow<f64>)>,
) -> Option<K> {
    let mut best: Option<(K, f64)> = None;
    for (key, window) in windows {
        let Some(mean) = window.mean() else {
            continue;
        };
        if best.map_or(true, |(_, b)| mean > b) {
            best = Some((*key, mean));
        }
    }
    best.map(|(key, _)| key)
}

impl EvolutionManager {
    /// Records a team's performance under its leader's species and returns the score.
    pub fn record_team_performance(
        &mut self,
        team: &Team,
        world: &hecs::World,
        metrics: TeamMetrics,
    ) -> Option<f64> {
        let species = team.leader_species(world)?;
        let performance = metrics.performance();
        let roles: Vec<TeamRole> = team
            .members
            .iter()
            .filter_map(|m| world.get::<&Animal>(*m).ok().and_then(|a| a.team_role))
            .collect();

        let memory = self.social_memory.entry(species.clone()).or_default();
        let previous = memory.optimal_team_size;
        memory.record(team.size(), team.formation, &roles, performance);
        if memory.optimal_team_size != previous {
            tracing::info!(
                species = %species,
                size = ?memory.optimal_team_size,
                "Optimal team size changed"
            );
        }
        Some(performance)
    }

    #[must_use]
    pub fn social_memory(&self, species: &str) -> Option<&SocialMemory> {
        self.social_memory.get(species)
    }

    /// Moves `social_score` 10% of the way toward the level suited to the optimal team
    /// size learned under `leader_species`, then settles the animal's team role.
    pub fn evolve_social_structure(&self, animal: &mut Animal, leader_species: &str) -> TeamRole {
        if let Some(size) = self
            .social_memory
            .get(leader_species)
            .and_then(|m| m.optimal_team_size)
        {
            let target = (0.5 + size as f64 / 10.0).min(1.5);
            let social = animal.social_score + (target - animal.social_score) * SOCIAL_NUDGE;
            animal.set_trait_value(
                GeneKind::SocialScore,
                social.clamp(self.config.min_gene_value, self.config.max_gene_value),
            );
        }
        self.evolve_team_role(animal, leader_species)
    }

    /// Picks the role the animal's build suits best, favoring roles the species already
    /// specializes in, and reinforces the matching trait by 2%.
    pub fn evolve_team_role(&self, animal: &mut Animal, leader_species: &str) -> TeamRole {
        let specialties = self.social_memory.get(leader_species).map(|m| &m.specialized_roles);
        let score = |role: TeamRole, kind: GeneKind| {
            let boost = if specialties.is_some_and(|s| s.contains(&role)) {
                SPECIALTY_ROLE_BOOST
            } else {
                1.0
            };
            animal.trait_value(kind) * ROLE_SCORE_WEIGHT * boost
        };

        let mut best = (TeamRole::Attacker, GeneKind::AttackMultiplier);
        let mut best_score = score(best.0, best.1);
        for candidate in [
            (TeamRole::Defender, GeneKind::ArmorRating),
            (TeamRole::Scout, GeneKind::AgilityScore),
        ] {
            let s = score(candidate.0, candidate.1);
            if s > best_score {
                best = candidate;
                best_score = s;
            }
        }

        let (role, kind) = best;
        let reinforced = (animal.trait_value(kind) * ROLE_REINFORCEMENT)
            .clamp(self.config.min_gene_value, self.config.max_gene_value);
        animal.set_trait_value(kind, reinforced);
        animal.team_role = Some(role);
        role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvolutionConfig;
    use crate::lifecycle::create_animal;
    use crate::species::SpeciesCatalog;
    use crate::team::TeamRegistry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use wildlands_data::{Position, SpeciesRecord};

    fn wolf(seed: u64) -> Animal {
        let record: SpeciesRecord =
            serde_json::from_str(r#"{"name":"Wolf","armor_rating":1.2,"social_score":0.5}"#)
                .unwrap();
        create_animal(&record, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    fn manager() -> EvolutionManager {
        EvolutionManager::new(EvolutionConfig::default(), &SpeciesCatalog::default())
    }

    #[test]
    fn test_performance_weights() {
        let metrics = TeamMetrics {
            combat: 1.0,
            survival: 0.5,
            resource: 0.0,
        };
        assert!((metrics.performance() - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_team_metrics_defaults() {
        let mut world = hecs::World::new();
        let mut teams = TeamRegistry::new(10.0);
        let leader = world.spawn((wolf(1), Position::default()));
        world.get::<&mut Animal>(leader).unwrap().health = 50.0;
        let id = teams
            .create_team(&mut world, leader, Formation::Aggressive, 0.0)
            .unwrap();
        let metrics = TeamMetrics::for_team(teams.get(id).unwrap(), &world);
        assert_eq!(metrics.combat, 0.5);
        assert_eq!(metrics.survival, 1.0);
        assert_eq!(metrics.resource, 0.5);

        let team = teams.get_mut(id).unwrap();
        team.battle_stats.wins = 3;
        team.battle_stats.losses = 1;
        team.battle_stats.members_lost = 3;
        let metrics = TeamMetrics::for_team(teams.get(id).unwrap(), &world);
        assert_eq!(metrics.combat, 0.75);
        assert_eq!(metrics.survival, 0.25);
    }

    #[test]
    fn test_optimal_size_needs_three_samples() {
        let mut memory = SocialMemory::default();
        memory.record(4, Formation::Scout, &[], 0.9);
        memory.record(4, Formation::Scout, &[], 0.9);
        assert_eq!(memory.optimal_team_size, None);
        assert_eq!(memory.best_formation, Some(Formation::Scout));
        memory.record(4, Formation::Defensive, &[TeamRole::Defender], 0.95);
        assert_eq!(memory.optimal_team_size, Some(4));
        assert_eq!(memory.best_formation, Some(Formation::Defensive));
        assert!(memory.specialized_roles.contains(&TeamRole::Defender));
    }

    #[test]
    fn test_social_memory_is_bounded() {
        let mut memory = SocialMemory::default();
        for _ in 0..50 {
            memory.record(3, Formation::Loose, &[TeamRole::Scout], 0.4);
        }
        assert_eq!(memory.team_size_performance[&3].len(), SHORT_HISTORY_CAP);
        assert_eq!(memory.role_performance[&TeamRole::Scout].len(), SHORT_HISTORY_CAP);
        assert!(memory.specialized_roles.is_empty());
    }

    #[test]
    fn test_social_score_moves_toward_target() {
        let mut mgr = manager();
        let mut memory = SocialMemory::default();
        for _ in 0..3 {
            memory.record(8, Formation::Loose, &[], 0.8);
        }
        mgr.social_memory.insert("Wolf".to_string(), memory);

        let mut animal = wolf(2);
        // target = min(1.5, 0.5 + 0.8) = 1.3; 0.5 + 0.08
        mgr.evolve_social_structure(&mut animal, "Wolf");
        assert!((animal.social_score - 0.58).abs() < 1e-9);
    }

    #[test]
    fn test_role_follows_build_and_specialty() {
        let mut mgr = manager();
        let mut animal = wolf(3);
        assert_eq!(mgr.evolve_team_role(&mut animal, "Wolf"), TeamRole::Defender);
        assert!((animal.armor_rating - 1.224).abs() < 1e-9);
        assert_eq!(animal.team_role, Some(TeamRole::Defender));

        let mut memory = SocialMemory::default();
        memory.record(4, Formation::Scout, &[TeamRole::Scout], 0.9);
        mgr.social_memory.insert("Wolf".to_string(), memory);
        let mut animal = wolf(4);
        // agility 1.0 * 1.3 beats armor 1.2
        assert_eq!(mgr.evolve_team_role(&mut animal, "Wolf"), TeamRole::Scout);
    }
}
