//! Error types for genome validation.

use thiserror::Error;

/// Which side of a crossover carried the invalid genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenomeSide {
    /// The genome `crossover` was called on.
    Receiver,
    /// The genome passed as the crossover partner.
    Partner,
}

impl std::fmt::Display for GenomeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Receiver => write!(f, "receiver"),
            Self::Partner => write!(f, "partner"),
        }
    }
}

/// Errors raised by the genome layer.
///
/// These indicate caller bugs and are never absorbed silently.
#[derive(Error, Debug)]
pub enum GenomeError {
    /// A genome with zero genes took part in a crossover.
    #[error("cannot cross over an empty genome ({side})")]
    EmptyGenome { side: GenomeSide },

    /// Untyped input was not a genome.
    #[error("not a genome: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A gene was stored under a key that differs from its own name.
    #[error("gene keyed as `{key}` is named `{name}`")]
    NameMismatch { key: String, name: String },
}
