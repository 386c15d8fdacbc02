use common::AnimalBuilder;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wildlands_data::{CombatStrategy, ConservationStatus, GeneKind};
use wildlands_lib::model::config::EvolutionConfig;
use wildlands_lib::model::evolution::{CombatResult, EvolutionManager};
use wildlands_lib::model::lifecycle::create_newborn;
use wildlands_lib::model::species::SpeciesCatalog;

mod common;

fn manager() -> EvolutionManager {
    EvolutionManager::new(EvolutionConfig::default(), &SpeciesCatalog::default())
}

fn gene(animal: &wildlands_data::Animal, kind: GeneKind) -> f64 {
    animal
        .genome
        .as_ref()
        .and_then(|g| g.value(kind))
        .expect("genome carries every trait gene")
}

#[test]
fn test_high_predation_ratchets_defenses_over_generations() {
    let mut manager = manager();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let species = AnimalBuilder::new("Gazelle")
        .predator_pressure(0.9)
        .armor(0.6)
        .agility(0.6)
        .age(200.0);
    let mut a = species.clone_with_seed(1);
    let mut b = species.clone_with_seed(2);
    manager.ensure_genome(&mut a, &mut rng);
    manager.ensure_genome(&mut b, &mut rng);
    let start_armor = gene(&a, GeneKind::ArmorRating).max(gene(&b, GeneKind::ArmorRating));
    let start_agility = gene(&a, GeneKind::AgilityScore).max(gene(&b, GeneKind::AgilityScore));

    const GENERATIONS: i32 = 12;
    for _ in 0..GENERATIONS {
        let first = manager.create_offspring(&mut a, &mut b, 10, &mut rng).unwrap();
        let second = manager.create_offspring(&mut a, &mut b, 10, &mut rng).unwrap();
        let next_a = create_newborn(&a, first, &mut rng);
        let next_b = create_newborn(&b, second, &mut rng);
        a = next_a;
        b = next_b;
    }

    // every defended gene grows at least 5% per generation until the cap
    let floor = |start: f64| (start * 1.05f64.powi(GENERATIONS)).min(2.0) - 1e-9;
    for animal in [&a, &b] {
        assert!(gene(animal, GeneKind::ArmorRating) >= floor(start_armor));
        assert!(gene(animal, GeneKind::AgilityScore) >= floor(start_agility));
        assert!(animal.armor_rating > start_armor);
        assert_eq!(animal.generation, GENERATIONS as u32);
    }

    let stats = manager.get_species_stats("Gazelle");
    assert_eq!(stats.generation, GENERATIONS as u32);
    assert_eq!(stats.births, 2 * GENERATIONS as u64);
    assert!(stats.trait_averages[&GeneKind::ArmorRating] > start_armor);
}

#[test]
fn test_low_predation_does_not_force_defenses_up() {
    let mut manager = manager();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let species = AnimalBuilder::new("Hare").predator_pressure(0.1).armor(1.0);
    let mut a = species.clone_with_seed(1);
    let mut b = species.clone_with_seed(2);

    let mut dropped = false;
    for _ in 0..40 {
        let offspring = manager.create_offspring(&mut a, &mut b, 10, &mut rng).unwrap();
        let armor = offspring.genome.value(GeneKind::ArmorRating).unwrap();
        let parents = gene(&a, GeneKind::ArmorRating).max(gene(&b, GeneKind::ArmorRating));
        dropped |= armor < parents;
    }
    assert!(dropped, "without predation armor should be free to fall");
}

#[test]
fn test_breeding_respects_maturity_cooldown_and_cap() {
    let mut manager = manager();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let adult = AnimalBuilder::new("Otter").age(500.0);
    let a = adult.clone_with_seed(1);
    let b = adult.clone_with_seed(2);
    let juvenile = AnimalBuilder::new("Otter").age(1.0).seed(3).build();
    let stranger = AnimalBuilder::new("Heron").age(500.0).seed(4).build();

    assert!(!manager.should_reproduce(&a, &juvenile, 5, &mut rng));
    assert!(!manager.should_reproduce(&a, &stranger, 5, &mut rng));
    assert!(!manager.should_reproduce(&a, &a, 5, &mut rng));
    let cap = manager.population_cap_for(&a);
    assert!(!manager.should_reproduce(&a, &b, cap, &mut rng));

    let mut approved = false;
    for _ in 0..200 {
        if manager.should_reproduce(&a, &b, 5, &mut rng) {
            approved = true;
            break;
        }
    }
    assert!(approved);
    // the pair is now cooling down in either order
    assert!(manager.breeding_cooldown(&b, &a) > 0.0);
    assert!(!manager.should_reproduce(&b, &a, 5, &mut rng));

    manager.decay_breeding_cooldowns(10.0);
    assert_eq!(manager.active_breeding_cooldowns(), 0);
}

#[test]
fn test_endangered_species_have_lower_caps() {
    let manager = manager();
    let sparrow = AnimalBuilder::new("Sparrow").build();
    let rare = AnimalBuilder::new("Kakapo")
        .status(ConservationStatus::CriticallyEndangered)
        .build();
    assert!(manager.population_cap_for(&rare) < manager.population_cap_for(&sparrow));
}

#[test]
fn test_failed_hunts_boost_predator_and_successes_boost_prey() {
    let mut manager = manager();
    let wolf = AnimalBuilder::new("Wolf").predator().build();
    let deer = AnimalBuilder::new("Deer").build();

    for _ in 0..5 {
        manager.record_hunt_outcome(&wolf, &deer, false);
    }
    let record = manager.hunt_record("Wolf", "Deer").unwrap();
    assert_eq!(record.attempts, 5);
    assert_eq!(record.success_rate, 0.0);
    assert!(manager.adaptation_state("Wolf").unwrap().predator_boost);
    assert!(!manager.adaptation_state("Deer").unwrap().prey_boost);

    for _ in 0..20 {
        manager.record_hunt_outcome(&wolf, &deer, true);
    }
    assert!(!manager.adaptation_state("Wolf").unwrap().predator_boost);
    assert!(manager.adaptation_state("Deer").unwrap().prey_boost);
    let stats = manager.get_species_stats("Wolf");
    assert!(stats.hunt_success["Deer"] > 0.7);
}

#[test]
fn test_repeated_wins_establish_dominant_and_counter_strategies() {
    let mut manager = manager();
    for _ in 0..12 {
        manager.record_combat_outcome("Badger", "Fox", CombatStrategy::Aggressive, CombatResult::Win);
    }
    manager.record_combat_outcome("Badger", "Fox", CombatStrategy::Defensive, CombatResult::Loss);

    let stats = manager.get_species_stats("Badger");
    assert_eq!(stats.dominant_strategy, Some(CombatStrategy::Aggressive));
    assert_eq!(
        stats.counter_strategies.get("Fox"),
        Some(&CombatStrategy::Aggressive)
    );
}
