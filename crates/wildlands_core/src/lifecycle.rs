//! Animal creation from species records and genome synthesis.

use crate::genetics::GeneLogic;
use rand::Rng;
use uuid::Uuid;
use wildlands_data::{AmbientConditions, Animal, Gene, GeneKind, Genome, SpeciesRecord};

pub const DEFAULT_MAX_MOOD: f64 = 100.0;

/// Builds a genome from an animal's current stat fields, with per-gene natural jitter.
///
/// The jitter is rolled with [`GeneLogic::mutated_value`] and only committed after the
/// result has been clamped into `[min_value, max_value]`.
pub fn synthesize_genome<R: Rng>(
    animal: &Animal,
    min_value: f64,
    max_value: f64,
    rng: &mut R,
) -> Genome {
    let mut genome = Genome::new();
    for kind in GeneKind::ALL {
        let mut gene = Gene::new(kind.as_str(), animal.trait_value(kind).clamp(min_value, max_value));
        gene.value = gene.mutated_value(rng).clamp(min_value, max_value);
        genome.insert(gene);
    }
    genome
}

/// Creates a generation-zero animal of `record`'s species. The genome is left empty
/// and gets synthesized on first breeding.
pub fn create_animal<R: Rng>(record: &SpeciesRecord, rng: &mut R) -> Animal {
    Animal {
        id: Uuid::from_u128(rng.gen()),
        name: record.name.clone(),
        health: record.max_health,
        max_health: record.max_health,
        mood: DEFAULT_MAX_MOOD * 0.7,
        max_mood: DEFAULT_MAX_MOOD,
        attack_multiplier: record.attack_multiplier,
        armor_rating: record.armor_rating,
        agility_score: record.agility_score,
        stamina_rating: record.stamina_rating,
        social_score: record.social_score,
        maturity_score: record.maturity_score,
        reproduction_rate: record.reproduction_rate,
        generation_time: record.generation_time,
        predator_pressure: record.predator_pressure,
        conservation_status: record.conservation_status,
        habitat: record.habitat,
        predator: record.predator,
        combat_traits: record.combat_traits.clone(),
        natural_weapons: record.natural_weapons.clone(),
        genome: None,
        age: 0.0,
        generation: 0,
        team: None,
        team_role: None,
        evolved_habitat_preference: Vec::new(),
        ambient: AmbientConditions::default(),
    }
}

/// Creates the newborn animal carrying an offspring's inherited state.
///
/// Species-level fields come from `parent`; traits come from the child's genome.
pub fn create_newborn<R: Rng>(
    parent: &Animal,
    offspring: crate::evolution::Offspring,
    rng: &mut R,
) -> Animal {
    let mut child = Animal {
        id: Uuid::from_u128(rng.gen()),
        health: parent.max_health,
        mood: DEFAULT_MAX_MOOD * 0.7,
        genome: Some(offspring.genome),
        combat_traits: offspring.combat_traits,
        evolved_habitat_preference: offspring.habitat_preferences,
        age: 0.0,
        generation: offspring.generation,
        team: None,
        team_role: None,
        ..parent.clone()
    };
    child.sync_stats_from_genome();
    child
}
