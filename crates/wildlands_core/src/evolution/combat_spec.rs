use super::EvolutionManager;
use crate::history::{RollingWindow, COMBAT_HISTORY_CAP};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use wildlands_data::{Animal, CombatStrategy, CombatTrait, GeneKind};

/// Wins a species needs before a dominant strategy is inferred.
const DOMINANT_AFTER_WINS: u32 = 5;
const DOMINANT_SHARE: f64 = 0.4;
const COUNTER_MIN_ENCOUNTERS: u32 = 3;
const COUNTER_SHARE: f64 = 0.5;
const STRATEGY_NUDGE: f64 = 0.03;
const SYNERGY_BONUS: f64 = 0.02;
const BALANCED_BONUS: f64 = 0.01;
const SPECIALTY_TAG_CHANCE: f64 = 0.1;
const SPECIALTY_TAG_ABOVE: f64 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatResult {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatRecord {
    pub opponent: String,
    pub strategy: CombatStrategy,
    pub result: CombatResult,
}

/// Combat experience of one species.
#[derive(Debug, Clone, Serialize)]
pub struct CombatSpecialization {
    pub wins_by_strategy: BTreeMap<CombatStrategy, u32>,
    pub losses_by_opponent: BTreeMap<String, u32>,
    pub encounters: BTreeMap<String, u32>,
    /// Winning strategies against each opponent species.
    pub wins_against: BTreeMap<String, BTreeMap<CombatStrategy, u32>>,
    pub history: RollingWindow<CombatRecord>,
    pub dominant_strategy: Option<CombatStrategy>,
    pub counter_strategies: BTreeMap<String, CombatStrategy>,
}

impl Default for CombatSpecialization {
    fn default() -> Self {
        Self {
            wins_by_strategy: BTreeMap::new(),
            losses_by_opponent: BTreeMap::new(),
            encounters: BTreeMap::new(),
            wins_against: BTreeMap::new(),
            history: RollingWindow::new(COMBAT_HISTORY_CAP),
            dominant_strategy: None,
            counter_strategies: BTreeMap::new(),
        }
    }
}

impl CombatSpecialization {
    #[must_use]
    pub fn total_wins(&self) -> u32 {
        self.wins_by_strategy.values().sum()
    }
}

/// Strategy with the most wins among those holding more than `share` of `counts`.
fn leading_strategy(counts: &BTreeMap<CombatStrategy, u32>, share: f64) -> Option<CombatStrategy> {
    let total: u32 = counts.values().sum();
    if total == 0 {
        return None;
    }
    counts
        .iter()
        .filter(|(_, n)| f64::from(**n) / f64::from(total) > share)
        .max_by_key(|(_, n)| **n)
        .map(|(s, _)| *s)
}

impl EvolutionManager {
    /// Records one fight of `species` against `opponent` fought with `strategy`.
    pub fn record_combat_outcome(
        &mut self,
        species: &str,
        opponent: &str,
        strategy: CombatStrategy,
        result: CombatResult,
    ) {
        let spec = self
            .combat_specialization
            .entry(species.to_string())
            .or_default();

        let encounters = spec.encounters.entry(opponent.to_string()).or_insert(0);
        *encounters += 1;
        let encounters = *encounters;
        match result {
            CombatResult::Win => {
                *spec.wins_by_strategy.entry(strategy).or_insert(0) += 1;
                *spec
                    .wins_against
                    .entry(opponent.to_string())
                    .or_default()
                    .entry(strategy)
                    .or_insert(0) += 1;
            }
            CombatResult::Loss => {
                *spec
                    .losses_by_opponent
                    .entry(opponent.to_string())
                    .or_insert(0) += 1;
            }
            CombatResult::Draw => {}
        }
        spec.history.push(CombatRecord {
            opponent: opponent.to_string(),
            strategy,
            result,
        });

        // Recomputed on every check: a lead that dissolves clears the dominant strategy.
        if spec.total_wins() > DOMINANT_AFTER_WINS {
            let dominant = leading_strategy(&spec.wins_by_strategy, DOMINANT_SHARE);
            if dominant != spec.dominant_strategy {
                tracing::info!(species, strategy = ?dominant, "Dominant combat strategy changed");
                spec.dominant_strategy = dominant;
            }
        }

        if encounters >= COUNTER_MIN_ENCOUNTERS {
            if let Some(counter) = spec
                .wins_against
                .get(opponent)
                .and_then(|wins| leading_strategy(wins, COUNTER_SHARE))
            {
                if spec.counter_strategies.insert(opponent.to_string(), counter) != Some(counter) {
                    tracing::info!(species, opponent, strategy = ?counter, "Counter strategy found");
                }
            }
        }
    }

    #[must_use]
    pub fn combat_specialization(&self, species: &str) -> Option<&CombatSpecialization> {
        self.combat_specialization.get(species)
    }

    /// Drifts attack, armor and agility along the species' dominant strategy, applies
    /// build synergies and may grant a matching tag. Returns the tag gained.
    pub fn evolve_combat_specialization<R: Rng>(
        &self,
        animal: &mut Animal,
        rng: &mut R,
    ) -> Option<CombatTrait> {
        let (min, max) = (self.config.min_gene_value, self.config.max_gene_value);
        let scale = |animal: &mut Animal, kind: GeneKind, factor: f64| {
            let value = (animal.trait_value(kind) * factor).clamp(min, max);
            animal.set_trait_value(kind, value);
        };

        let dominant = self
            .combat_specialization
            .get(&animal.name)
            .and_then(|s| s.dominant_strategy);
        match dominant {
            Some(CombatStrategy::Aggressive) => {
                scale(animal, GeneKind::AttackMultiplier, 1.0 + STRATEGY_NUDGE);
                scale(animal, GeneKind::ArmorRating, 1.0 - STRATEGY_NUDGE);
            }
            Some(CombatStrategy::Defensive) => {
                scale(animal, GeneKind::ArmorRating, 1.0 + STRATEGY_NUDGE);
                scale(animal, GeneKind::AttackMultiplier, 1.0 - STRATEGY_NUDGE);
            }
            Some(CombatStrategy::Evasive) => {
                scale(animal, GeneKind::AgilityScore, 1.0 + STRATEGY_NUDGE);
            }
            None => {}
        }

        let (attack, armor, agility) = (
            animal.attack_multiplier,
            animal.armor_rating,
            animal.agility_score,
        );
        let balanced = |v: f64| (0.9..=1.3).contains(&v);
        if armor > 1.3 && agility < 0.8 {
            scale(animal, GeneKind::ArmorRating, 1.0 + SYNERGY_BONUS);
        }
        if attack > 1.3 && armor < 0.8 {
            scale(animal, GeneKind::AttackMultiplier, 1.0 + SYNERGY_BONUS);
        }
        if agility > 1.3 && attack > 0.9 && attack < 1.3 {
            scale(animal, GeneKind::AgilityScore, 1.0 + SYNERGY_BONUS);
        }
        if balanced(attack) && balanced(armor) && balanced(agility) {
            for kind in [
                GeneKind::AttackMultiplier,
                GeneKind::ArmorRating,
                GeneKind::AgilityScore,
            ] {
                scale(animal, kind, 1.0 + BALANCED_BONUS);
            }
        }

        if rng.gen::<f64>() >= SPECIALTY_TAG_CHANCE {
            return None;
        }
        let candidates: Vec<CombatTrait> = [
            (animal.attack_multiplier, CombatTrait::Berserker),
            (animal.armor_rating, CombatTrait::ThickHide),
            (animal.agility_score, CombatTrait::QuickReflexes),
        ]
        .into_iter()
        .filter(|(value, tag)| *value > SPECIALTY_TAG_ABOVE && !animal.combat_traits.contains(*tag))
        .map(|(_, tag)| tag)
        .collect();
        let tag = *candidates.choose(rng)?;
        if animal.combat_traits.insert(tag) {
            tracing::debug!(species = %animal.name, tag = %tag, "Combat specialty tag gained");
            Some(tag)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvolutionConfig;
    use crate::lifecycle::create_animal;
    use crate::species::SpeciesCatalog;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use wildlands_data::SpeciesRecord;

    fn manager() -> EvolutionManager {
        EvolutionManager::new(EvolutionConfig::default(), &SpeciesCatalog::default())
    }

    fn animal(json: &str) -> Animal {
        let record: SpeciesRecord = serde_json::from_str(json).unwrap();
        create_animal(&record, &mut ChaCha8Rng::seed_from_u64(1))
    }

    #[test]
    fn test_dominant_strategy_needs_more_than_five_wins() {
        let mut mgr = manager();
        for _ in 0..5 {
            mgr.record_combat_outcome("Wolf", "Deer", CombatStrategy::Aggressive, CombatResult::Win);
        }
        assert_eq!(mgr.combat_specialization("Wolf").unwrap().dominant_strategy, None);
        mgr.record_combat_outcome("Wolf", "Deer", CombatStrategy::Aggressive, CombatResult::Win);
        assert_eq!(
            mgr.combat_specialization("Wolf").unwrap().dominant_strategy,
            Some(CombatStrategy::Aggressive)
        );
    }

    #[test]
    fn test_no_dominant_strategy_without_clear_share() {
        let mut mgr = manager();
        for strategy in CombatStrategy::ALL.into_iter().cycle().take(9) {
            mgr.record_combat_outcome("Wolf", "Deer", strategy, CombatResult::Win);
        }
        assert_eq!(mgr.combat_specialization("Wolf").unwrap().dominant_strategy, None);
    }

    #[test]
    fn test_dominant_strategy_clears_when_lead_dissolves() {
        let mut mgr = manager();
        let sequence = [
            CombatStrategy::Aggressive,
            CombatStrategy::Defensive,
            CombatStrategy::Evasive,
        ];
        for (i, strategy) in sequence.into_iter().cycle().take(9).enumerate() {
            mgr.record_combat_outcome("Wolf", "Deer", strategy, CombatResult::Win);
            if i == 6 {
                // 3 of 7 wins aggressive
                assert_eq!(
                    mgr.combat_specialization("Wolf").unwrap().dominant_strategy,
                    Some(CombatStrategy::Aggressive)
                );
            }
        }
        assert_eq!(mgr.combat_specialization("Wolf").unwrap().dominant_strategy, None);
    }

    #[test]
    fn test_dominant_strategy_is_the_largest_share() {
        let mut mgr = manager();
        for _ in 0..7 {
            mgr.record_combat_outcome("Wolf", "Deer", CombatStrategy::Aggressive, CombatResult::Win);
        }
        for _ in 0..8 {
            mgr.record_combat_outcome("Wolf", "Deer", CombatStrategy::Evasive, CombatResult::Win);
        }
        let spec = mgr.combat_specialization("Wolf").unwrap();
        assert_eq!(spec.dominant_strategy, Some(CombatStrategy::Evasive));
        assert_eq!(spec.counter_strategies.get("Deer"), Some(&CombatStrategy::Evasive));
    }

    #[test]
    fn test_counter_strategy_per_opponent() {
        let mut mgr = manager();
        mgr.record_combat_outcome("Wolf", "Bear", CombatStrategy::Evasive, CombatResult::Win);
        mgr.record_combat_outcome("Wolf", "Bear", CombatStrategy::Aggressive, CombatResult::Loss);
        assert!(mgr.combat_specialization("Wolf").unwrap().counter_strategies.is_empty());
        mgr.record_combat_outcome("Wolf", "Bear", CombatStrategy::Evasive, CombatResult::Win);

        let spec = mgr.combat_specialization("Wolf").unwrap();
        assert_eq!(spec.counter_strategies.get("Bear"), Some(&CombatStrategy::Evasive));
        assert_eq!(spec.losses_by_opponent.get("Bear"), Some(&1));
        assert_eq!(spec.history.len(), 3);
    }

    #[test]
    fn test_history_is_capped() {
        let mut mgr = manager();
        for _ in 0..30 {
            mgr.record_combat_outcome("Wolf", "Deer", CombatStrategy::Defensive, CombatResult::Draw);
        }
        assert_eq!(
            mgr.combat_specialization("Wolf").unwrap().history.len(),
            COMBAT_HISTORY_CAP
        );
    }

    #[test]
    fn test_aggressive_specialization_trades_armor_for_attack() {
        let mut mgr = manager();
        for _ in 0..6 {
            mgr.record_combat_outcome("Wolf", "Deer", CombatStrategy::Aggressive, CombatResult::Win);
        }
        let mut wolf = animal(r#"{"name":"Wolf","attack_multiplier":1.5,"armor_rating":1.5,"agility_score":1.0}"#);
        let mut never = StepRng::new(u64::MAX, 0);
        assert_eq!(mgr.evolve_combat_specialization(&mut wolf, &mut never), None);
        assert!((wolf.attack_multiplier - 1.545).abs() < 1e-9);
        assert!((wolf.armor_rating - 1.455).abs() < 1e-9);
    }

    #[test]
    fn test_synergies() {
        let mgr = manager();
        let mut never = StepRng::new(u64::MAX, 0);

        let mut tank = animal(r#"{"name":"Rhino","armor_rating":1.5,"agility_score":0.5}"#);
        mgr.evolve_combat_specialization(&mut tank, &mut never);
        assert!((tank.armor_rating - 1.53).abs() < 1e-9);

        let mut balanced = animal(r#"{"name":"Dog"}"#);
        mgr.evolve_combat_specialization(&mut balanced, &mut never);
        assert!((balanced.attack_multiplier - 1.01).abs() < 1e-9);
        assert!((balanced.armor_rating - 1.01).abs() < 1e-9);
        assert!((balanced.agility_score - 1.01).abs() < 1e-9);
    }

    #[test]
    fn test_specialty_tag_requires_high_stat() {
        let mgr = manager();
        let mut always = StepRng::new(0, 0);
        let mut plain = animal(r#"{"name":"Dog"}"#);
        assert_eq!(mgr.evolve_combat_specialization(&mut plain, &mut always), None);

        let mut brute = animal(r#"{"name":"Bear","attack_multiplier":1.8}"#);
        assert_eq!(
            mgr.evolve_combat_specialization(&mut brute, &mut always),
            Some(CombatTrait::Berserker)
        );
        assert!(brute.combat_traits.contains(CombatTrait::Berserker));
    }
}
