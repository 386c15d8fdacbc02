use super::genome::{GeneKind, Genome};
use super::species::ConservationStatus;
use super::team::{TeamId, TeamRole};
use super::terrain::TerrainType;
use super::traits::{CombatTraits, NaturalWeapon};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// World position of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Ambient readings an animal has been living under. Absent readings fall back to
/// neutral environment factors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AmbientConditions {
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity (0.0-1.0).
    pub humidity: Option<f64>,
    /// Food availability (0.0-1.0).
    pub food_availability: Option<f64>,
}

/// Robot faction leader. Leads teams but never fights or breeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: Uuid,
    pub name: String,
    pub faction: String,
}

/// Animal stat surface read and written by evolution and combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: Uuid,
    /// Species name; the grouping key for every per-species statistic.
    pub name: String,
    pub health: f64,
    pub max_health: f64,
    pub mood: f64,
    pub max_mood: f64,
    pub attack_multiplier: f64,
    pub armor_rating: f64,
    pub agility_score: f64,
    pub stamina_rating: f64,
    pub social_score: f64,
    pub maturity_score: f64,
    pub reproduction_rate: f64,
    pub generation_time: f64,
    pub predator_pressure: f64,
    pub conservation_status: ConservationStatus,
    pub habitat: TerrainType,
    pub predator: bool,
    pub combat_traits: CombatTraits,
    pub natural_weapons: Vec<NaturalWeapon>,
    pub genome: Option<Genome>,
    pub age: f64,
    pub generation: u32,
    /// Non-owning back-reference to the team this animal belongs to.
    pub team: Option<TeamId>,
    pub team_role: Option<TeamRole>,
    /// Terrains promoted by long exposure; at most two, oldest first.
    pub evolved_habitat_preference: Vec<TerrainType>,
    pub ambient: AmbientConditions,
}

impl Animal {
    #[must_use]
    pub fn trait_value(&self, kind: GeneKind) -> f64 {
        match kind {
            GeneKind::AttackMultiplier => self.attack_multiplier,
            GeneKind::ArmorRating => self.armor_rating,
            GeneKind::AgilityScore => self.agility_score,
            GeneKind::StaminaRating => self.stamina_rating,
            GeneKind::SocialScore => self.social_score,
            GeneKind::MaturityScore => self.maturity_score,
        }
    }

    /// Writes a trait to the stat field and, when present, to the matching gene.
    pub fn set_trait_value(&mut self, kind: GeneKind, value: f64) {
        let field = match kind {
            GeneKind::AttackMultiplier => &mut self.attack_multiplier,
            GeneKind::ArmorRating => &mut self.armor_rating,
            GeneKind::AgilityScore => &mut self.agility_score,
            GeneKind::StaminaRating => &mut self.stamina_rating,
            GeneKind::SocialScore => &mut self.social_score,
            GeneKind::MaturityScore => &mut self.maturity_score,
        };
        *field = value;
        if let Some(genome) = self.genome.as_mut() {
            genome.set_value(kind, value);
        }
    }

    /// Copies every trait gene present in the genome onto the stat fields.
    pub fn sync_stats_from_genome(&mut self) {
        let Some(genome) = self.genome.as_ref() else {
            return;
        };
        let values: Vec<(GeneKind, f64)> = GeneKind::ALL
            .into_iter()
            .filter_map(|k| genome.value(k).map(|v| (k, v)))
            .collect();
        for (kind, value) in values {
            self.set_trait_value(kind, value);
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        self.health / self.max_health.max(1.0)
    }

    /// Habitat plus any evolved preferences.
    pub fn preferred_terrains(&self) -> impl Iterator<Item = TerrainType> + '_ {
        std::iter::once(self.habitat).chain(self.evolved_habitat_preference.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animal() -> Animal {
        Animal {
            id: Uuid::nil(),
            name: "Wolf".to_string(),
            health: 80.0,
            max_health: 100.0,
            mood: 50.0,
            max_mood: 100.0,
            attack_multiplier: 1.2,
            armor_rating: 0.8,
            agility_score: 1.0,
            stamina_rating: 1.0,
            social_score: 0.9,
            maturity_score: 0.5,
            reproduction_rate: 1.0,
            generation_time: 100.0,
            predator_pressure: 0.2,
            conservation_status: ConservationStatus::LeastConcern,
            habitat: TerrainType::Forest,
            predator: true,
            combat_traits: CombatTraits::new(),
            natural_weapons: vec![NaturalWeapon::Fangs],
            genome: None,
            age: 0.0,
            generation: 0,
            team: None,
            team_role: None,
            evolved_habitat_preference: Vec::new(),
            ambient: AmbientConditions::default(),
        }
    }

    #[test]
    fn test_set_trait_value_updates_genome() {
        let mut wolf = animal();
        wolf.genome = Some(Genome::from_values([(GeneKind::ArmorRating, 0.8)]));
        wolf.set_trait_value(GeneKind::ArmorRating, 1.1);
        assert_eq!(wolf.armor_rating, 1.1);
        assert_eq!(
            wolf.genome.as_ref().and_then(|g| g.value(GeneKind::ArmorRating)),
            Some(1.1)
        );
    }

    #[test]
    fn test_sync_stats_from_genome() {
        let mut wolf = animal();
        wolf.genome = Some(Genome::from_values([
            (GeneKind::AttackMultiplier, 1.7),
            (GeneKind::AgilityScore, 0.4),
        ]));
        wolf.sync_stats_from_genome();
        assert_eq!(wolf.attack_multiplier, 1.7);
        assert_eq!(wolf.agility_score, 0.4);
        assert_eq!(wolf.armor_rating, 0.8);
    }

    #[test]
    fn test_preferred_terrains() {
        let mut wolf = animal();
        wolf.evolved_habitat_preference.push(TerrainType::Mountain);
        let terrains: Vec<_> = wolf.preferred_terrains().collect();
        assert_eq!(terrains, vec![TerrainType::Forest, TerrainType::Mountain]);
    }
}
