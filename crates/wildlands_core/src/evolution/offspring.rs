use super::fitness::{adaptive_mutation_rates, calculate_gene_fitness, EnvironmentFactors, Level, Temperature};
use super::EvolutionManager;
use crate::error::Result;
use crate::genetics::GenomeLogic;
use crate::lifecycle::synthesize_genome;
use crate::species::population_factors;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use wildlands_data::{Animal, CombatTrait, CombatTraits, Gene, GeneKind, Genome, TerrainType};

/// Share of genes picked by fitness rather than uniformly.
const FITNESS_SELECTION_SHARE: f64 = 0.7;
const BASE_VARIATION: f64 = 0.15;
const DEFENSIVE_VARIATION: (f64, f64) = (0.05, 0.30);
const MUTATION_SHIFT: f64 = 0.4;
const DEFENSIVE_MUTATION_SHIFT: (f64, f64) = (0.1, 0.5);
const NEW_TRAIT_CHANCE: f64 = 0.1;
/// A new tag is only considered while the inherited set is smaller than this.
const NEW_TRAIT_BELOW: usize = 2;
const MAX_HABITAT_PREFERENCES: usize = 2;

/// Everything a newborn inherits from its parents.
#[derive(Debug, Clone, Serialize)]
pub struct Offspring {
    pub genome: Genome,
    pub combat_traits: CombatTraits,
    pub habitat_preferences: Vec<TerrainType>,
    pub generation: u32,
    pub environment: EnvironmentFactors,
}

impl EvolutionManager {
    /// Synthesizes a genome for a parent that has none.
    pub fn ensure_genome<R: Rng>(&self, animal: &mut Animal, rng: &mut R) {
        if animal.genome.as_ref().is_some_and(|g| !g.is_empty()) {
            return;
        }
        let genome = synthesize_genome(
            animal,
            self.config.min_gene_value,
            self.config.max_gene_value,
            rng,
        );
        animal.genome = Some(genome);
    }

    /// Per-gene mutation multipliers from active predator/prey boosts for `species`.
    fn mutation_boost(&self, species: &str) -> std::collections::BTreeMap<GeneKind, f64> {
        let mut boost = std::collections::BTreeMap::new();
        if let Some(state) = self.adaptation.get(species) {
            for (kind, factor) in state.active_boosts() {
                *boost.entry(kind).or_insert(1.0) *= factor;
            }
        }
        boost
    }

    /// Creates the inherited state of a child of `parent1` and `parent2`.
    ///
    /// Parents without a genome get one synthesized first, so the genome errors of
    /// crossover are unreachable from here unless a caller hands in a bare genome.
    pub fn create_offspring<R: Rng>(
        &mut self,
        parent1: &mut Animal,
        parent2: &mut Animal,
        population: usize,
        rng: &mut R,
    ) -> Result<Offspring> {
        self.ensure_genome(parent1, rng);
        self.ensure_genome(parent2, rng);

        let cap = self.population_cap_for(parent1);
        let factors = EnvironmentFactors::for_animal(parent1, population, cap);
        let status_modifier = population_factors(parent1.conservation_status).mutation_rate;
        let rates =
            adaptive_mutation_rates(&factors, status_modifier, &self.mutation_boost(&parent1.name));

        let empty = Genome::new();
        let g1 = parent1.genome.as_ref().unwrap_or(&empty);
        let g2 = parent2.genome.as_ref().unwrap_or(&empty);
        let genome = self.cross_genomes(g1, g2, &factors, &rates, rng)?;

        let combat_traits = inherit_combat_traits(parent1, parent2, &factors, rng);
        let habitat_preferences = inherit_habitat_preferences(parent1, parent2);
        let generation = parent1.generation.max(parent2.generation) + 1;

        self.generation_stats
            .entry(parent1.name.clone())
            .or_default()
            .record_birth(&genome, generation);

        tracing::debug!(
            species = %parent1.name,
            generation,
            traits = %combat_traits,
            predation = ?factors.predation,
            "Offspring created"
        );

        Ok(Offspring {
            genome,
            combat_traits,
            habitat_preferences,
            generation,
            environment: factors,
        })
    }

    /// Environment-weighted crossover of two genomes.
    ///
    /// The uniform crossover supplies the diversity pick; the rest of the genes come from
    /// the fitter parent, weighted by relative fitness. Under high predation armor and
    /// agility always take the larger parent value and only vary upward.
    pub fn cross_genomes<R: Rng>(
        &self,
        g1: &Genome,
        g2: &Genome,
        factors: &EnvironmentFactors,
        rates: &std::collections::BTreeMap<GeneKind, f64>,
        rng: &mut R,
    ) -> Result<Genome> {
        let diverse = g1.crossover_with_rng(g2, rng)?;
        let (min, max) = (self.config.min_gene_value, self.config.max_gene_value);

        let mut child = Genome::new();
        for (name, gene) in &diverse.genes {
            let Some(kind) = GeneKind::from_name(name) else {
                child.insert(gene.clone());
                continue;
            };
            let v1 = g1.get(name).map_or(gene.value, |g| g.value);
            let v2 = g2.get(name).map_or(v1, |g| g.value);
            let defended = kind.is_defensive() && factors.high_predation();

            let mut value = if defended {
                v1.max(v2)
            } else if rng.gen::<f64>() < FITNESS_SELECTION_SHARE {
                let f1 = calculate_gene_fitness(kind, v1, factors);
                let f2 = calculate_gene_fitness(kind, v2, factors);
                if rng.gen::<f64>() < f1 / (f1 + f2) {
                    v1
                } else {
                    v2
                }
            } else {
                gene.value
            };
            value = value.clamp(min, max);

            let variation = if defended {
                rng.gen_range(DEFENSIVE_VARIATION.0..=DEFENSIVE_VARIATION.1)
            } else {
                rng.gen_range(-BASE_VARIATION..=BASE_VARIATION)
            };
            value = (value * (1.0 + variation)).clamp(min, max);

            let rate = rates.get(&kind).copied().unwrap_or(gene.mutation_rate);
            if rng.gen::<f64>() < rate {
                let shift = if defended {
                    rng.gen_range(DEFENSIVE_MUTATION_SHIFT.0..=DEFENSIVE_MUTATION_SHIFT.1)
                } else {
                    rng.gen_range(-MUTATION_SHIFT..=MUTATION_SHIFT)
                };
                value = (value * (1.0 + shift)).clamp(min, max);
            }

            child.insert(Gene {
                name: name.clone(),
                value,
                mutation_rate: rate,
                mutation_range: gene.mutation_range,
            });
        }
        Ok(child)
    }
}

/// Union of both parents' tags, plus an occasional tag suited to the environment.
fn inherit_combat_traits<R: Rng>(
    parent1: &Animal,
    parent2: &Animal,
    factors: &EnvironmentFactors,
    rng: &mut R,
) -> CombatTraits {
    let mut traits = parent1.combat_traits.union(&parent2.combat_traits);
    if traits.len() < NEW_TRAIT_BELOW && rng.gen::<f64>() < NEW_TRAIT_CHANCE {
        let mut candidates = Vec::new();
        match factors.temperature {
            Temperature::Hot => candidates.push(CombatTrait::HeatAdapted),
            Temperature::Cold => candidates.push(CombatTrait::ColdAdapted),
            Temperature::Normal => {}
        }
        if factors.predation == Level::High {
            candidates.push(CombatTrait::AmbushPredator);
        }
        if factors.competition == Level::High {
            candidates.push(CombatTrait::PackHunter);
        }
        candidates.retain(|t| !traits.contains(*t));
        if let Some(tag) = candidates.choose(rng) {
            traits.insert(*tag);
        }
    }
    traits
}

/// Both parents' evolved preferences, de-duplicated, keeping the most recent two.
fn inherit_habitat_preferences(parent1: &Animal, parent2: &Animal) -> Vec<TerrainType> {
    let mut merged: Vec<TerrainType> = Vec::new();
    for terrain in parent1
        .evolved_habitat_preference
        .iter()
        .chain(&parent2.evolved_habitat_preference)
    {
        if !merged.contains(terrain) {
            merged.push(*terrain);
        }
    }
    let excess = merged.len().saturating_sub(MAX_HABITAT_PREFERENCES);
    merged.drain(..excess);
    merged
}
