use super::terrain::TerrainType;
use super::traits::{CombatTraits, NaturalWeapon};
use serde::{Deserialize, Serialize};

/// IUCN-style conservation status of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConservationStatus {
    #[serde(rename = "Least Concern")]
    LeastConcern,
    #[serde(rename = "Near Threatened")]
    NearThreatened,
    #[serde(rename = "Vulnerable")]
    Vulnerable,
    #[serde(rename = "Endangered")]
    Endangered,
    #[serde(rename = "Critically Endangered")]
    CriticallyEndangered,
    /// Any status string the dataset does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConservationStatus {
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "least concern" => Self::LeastConcern,
            "near threatened" => Self::NearThreatened,
            "vulnerable" => Self::Vulnerable,
            "endangered" => Self::Endangered,
            "critically endangered" => Self::CriticallyEndangered,
            _ => Self::Unknown,
        }
    }
}

fn default_stat() -> f64 {
    1.0
}

fn default_health() -> f64 {
    100.0
}

fn default_generation_time() -> f64 {
    100.0
}

/// One row of the species dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    #[serde(default)]
    pub conservation_status: ConservationStatus,
    #[serde(default)]
    pub habitat: TerrainType,
    #[serde(default)]
    pub predator_pressure: f64,
    #[serde(default = "default_stat")]
    pub reproduction_rate: f64,
    #[serde(default = "default_generation_time")]
    pub generation_time: f64,
    #[serde(default = "default_health")]
    pub max_health: f64,
    #[serde(default = "default_stat")]
    pub attack_multiplier: f64,
    #[serde(default = "default_stat")]
    pub armor_rating: f64,
    #[serde(default = "default_stat")]
    pub agility_score: f64,
    #[serde(default = "default_stat")]
    pub stamina_rating: f64,
    #[serde(default = "default_stat")]
    pub social_score: f64,
    #[serde(default = "default_stat")]
    pub maturity_score: f64,
    #[serde(default)]
    pub combat_traits: CombatTraits,
    #[serde(default)]
    pub natural_weapons: Vec<NaturalWeapon>,
    /// Whether this species hunts other animals.
    #[serde(default)]
    pub predator: bool,
}
