use super::error::GenomeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default per-gene mutation probability.
pub const DEFAULT_MUTATION_RATE: f64 = 0.1;
/// Default per-gene relative mutation magnitude.
pub const DEFAULT_MUTATION_RANGE: f64 = 0.2;

fn default_mutation_rate() -> f64 {
    DEFAULT_MUTATION_RATE
}

fn default_mutation_range() -> f64 {
    DEFAULT_MUTATION_RANGE
}

/// The six evolvable traits every animal genome carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GeneKind {
    AttackMultiplier,
    ArmorRating,
    AgilityScore,
    StaminaRating,
    SocialScore,
    MaturityScore,
}

impl GeneKind {
    pub const ALL: [GeneKind; 6] = [
        GeneKind::AttackMultiplier,
        GeneKind::ArmorRating,
        GeneKind::AgilityScore,
        GeneKind::StaminaRating,
        GeneKind::SocialScore,
        GeneKind::MaturityScore,
    ];

    /// Gene key used inside a [`Genome`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AttackMultiplier => "attack_multiplier",
            Self::ArmorRating => "armor_rating",
            Self::AgilityScore => "agility_score",
            Self::StaminaRating => "stamina_rating",
            Self::SocialScore => "social_score",
            Self::MaturityScore => "maturity_score",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Armor and agility: the traits predation pushes upward.
    #[must_use]
    pub fn is_defensive(self) -> bool {
        matches!(self, Self::ArmorRating | Self::AgilityScore)
    }
}

impl std::fmt::Display for GeneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named trait value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    /// Trait name, fixed for the gene's lifetime.
    pub name: String,
    pub value: f64,
    /// Probability that a mutation roll changes the value.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Relative magnitude of a mutation (value moves by up to +/- this fraction).
    #[serde(default = "default_mutation_range")]
    pub mutation_range: f64,
}

impl Gene {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            mutation_rate: DEFAULT_MUTATION_RATE,
            mutation_range: DEFAULT_MUTATION_RANGE,
        }
    }

    #[must_use]
    pub fn with_rates(mut self, mutation_rate: f64, mutation_range: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self.mutation_range = mutation_range;
        self
    }
}

/// A named collection of genes, exclusively owned by one animal.
///
/// Genes are keyed by name in a `BTreeMap` so iteration order (and therefore every seeded
/// crossover) is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub genes: BTreeMap<String, Gene>,
}

impl Genome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_genes(genes: impl IntoIterator<Item = Gene>) -> Self {
        Self {
            genes: genes.into_iter().map(|g| (g.name.clone(), g)).collect(),
        }
    }

    /// Builds a genome holding the six trait genes with the given values.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = (GeneKind, f64)>) -> Self {
        Self::from_genes(
            values
                .into_iter()
                .map(|(kind, value)| Gene::new(kind.as_str(), value)),
        )
    }

    pub fn insert(&mut self, gene: Gene) -> Option<Gene> {
        self.genes.insert(gene.name.clone(), gene)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Gene> {
        self.genes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Gene> {
        self.genes.get_mut(name)
    }

    #[must_use]
    pub fn value(&self, kind: GeneKind) -> Option<f64> {
        self.genes.get(kind.as_str()).map(|g| g.value)
    }

    /// Overwrites a trait value, inserting the gene when absent.
    pub fn set_value(&mut self, kind: GeneKind, value: f64) {
        match self.genes.get_mut(kind.as_str()) {
            Some(gene) => gene.value = value,
            None => {
                self.insert(Gene::new(kind.as_str(), value));
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.genes.keys().map(String::as_str)
    }

    /// Parses a genome from untyped JSON, rejecting anything that is not one.
    pub fn from_json(json: &str) -> Result<Self, GenomeError> {
        let genome: Genome = serde_json::from_str(json)?;
        if let Some((key, gene)) = genome.genes.iter().find(|(k, g)| **k != g.name) {
            return Err(GenomeError::NameMismatch {
                key: key.clone(),
                name: gene.name.clone(),
            });
        }
        Ok(genome)
    }

    pub fn to_json(&self) -> Result<String, GenomeError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_defaults() {
        let gene = Gene::new("attack_multiplier", 1.2);
        assert_eq!(gene.mutation_rate, 0.1);
        assert_eq!(gene.mutation_range, 0.2);
    }

    #[test]
    fn test_set_value_inserts_missing_gene() {
        let mut genome = Genome::new();
        genome.set_value(GeneKind::ArmorRating, 1.4);
        assert_eq!(genome.value(GeneKind::ArmorRating), Some(1.4));
        genome.set_value(GeneKind::ArmorRating, 0.9);
        assert_eq!(genome.len(), 1);
        assert_eq!(genome.value(GeneKind::ArmorRating), Some(0.9));
    }

    #[test]
    fn test_from_json_rejects_non_genome() {
        assert!(matches!(
            Genome::from_json("[1, 2, 3]"),
            Err(GenomeError::Malformed(_))
        ));
        assert!(Genome::from_json("\"attack\"").is_err());
    }

    #[test]
    fn test_from_json_rejects_mismatched_key() {
        let json = r#"{"genes":{"a":{"name":"b","value":1.0}}}"#;
        assert!(matches!(
            Genome::from_json(json),
            Err(GenomeError::NameMismatch { .. })
        ));
    }

    #[test]
    fn test_json_fills_default_rates() {
        let json = r#"{"genes":{"a":{"name":"a","value":1.5}}}"#;
        let genome = Genome::from_json(json).unwrap();
        let gene = genome.get("a").unwrap();
        assert_eq!(gene.value, 1.5);
        assert_eq!(gene.mutation_rate, DEFAULT_MUTATION_RATE);
    }

    #[test]
    fn test_gene_kind_names_round_trip() {
        for kind in GeneKind::ALL {
            assert_eq!(GeneKind::from_name(kind.as_str()), Some(kind));
        }
        assert!(GeneKind::ArmorRating.is_defensive());
        assert!(!GeneKind::SocialScore.is_defensive());
    }
}
