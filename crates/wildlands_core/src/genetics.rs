//! Mutation and crossover behavior for genes and genomes.

use rand::Rng;
use wildlands_data::{Gene, GeneKind, Genome, GenomeError, GenomeSide};

/// Trait defining mutation behavior for a single gene.
pub trait GeneLogic {
    /// Rolls a mutation without touching the gene.
    ///
    /// With probability `mutation_rate` the result is
    /// `max(0, value * (1 + U(-mutation_range, mutation_range)))`, otherwise `value`.
    fn mutated_value<R: Rng>(&self, rng: &mut R) -> f64;

    /// Rolls a mutation and stores the result.
    fn mutate<R: Rng>(&mut self, rng: &mut R) -> f64;
}

impl GeneLogic for Gene {
    fn mutated_value<R: Rng>(&self, rng: &mut R) -> f64 {
        if rng.gen::<f64>() < self.mutation_rate {
            let range = self.mutation_range.abs();
            let shift = rng.gen_range(-range..=range);
            (self.value * (1.0 + shift)).max(0.0)
        } else {
            self.value
        }
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R) -> f64 {
        self.value = self.mutated_value(rng);
        self.value
    }
}

/// Trait defining the genetic interface for animal genomes.
pub trait GenomeLogic {
    /// Uniform crossover. The child carries exactly the receiver's gene names; genes
    /// present in both parents are picked 50/50, every gene is an independent copy.
    fn crossover_with_rng<R: Rng>(&self, other: &Genome, rng: &mut R) -> Result<Genome, GenomeError>;

    /// Clamps every gene value into `[min, max]`.
    fn clamp_values(&mut self, min: f64, max: f64);

    /// Mean absolute difference over the six trait genes both genomes carry.
    fn distance(&self, other: &Genome) -> f64;
}

impl GenomeLogic for Genome {
    fn crossover_with_rng<R: Rng>(&self, other: &Genome, rng: &mut R) -> Result<Genome, GenomeError> {
        if self.is_empty() {
            return Err(GenomeError::EmptyGenome {
                side: GenomeSide::Receiver,
            });
        }
        if other.is_empty() {
            return Err(GenomeError::EmptyGenome {
                side: GenomeSide::Partner,
            });
        }

        let mut child = Genome::new();
        for (name, gene) in &self.genes {
            let inherited = match other.get(name) {
                Some(partner_gene) if !rng.gen_bool(0.5) => partner_gene.clone(),
                _ => gene.clone(),
            };
            child.insert(inherited);
        }
        Ok(child)
    }

    fn clamp_values(&mut self, min: f64, max: f64) {
        for gene in self.genes.values_mut() {
            gene.value = gene.value.clamp(min, max);
        }
    }

    fn distance(&self, other: &Genome) -> f64 {
        let diffs: Vec<f64> = GeneKind::ALL
            .into_iter()
            .filter_map(|k| Some((self.value(k)? - other.value(k)?).abs()))
            .collect();
        if diffs.is_empty() {
            return 0.0;
        }
        diffs.iter().sum::<f64>() / diffs.len() as f64
    }
}
