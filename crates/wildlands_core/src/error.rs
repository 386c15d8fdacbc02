//! Error types for wildlands_core.

use thiserror::Error;
use wildlands_data::{GenomeError, TeamId};

/// Main error type for core simulation operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Genome validation failures propagate unchanged.
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// A handle no longer refers to a live animal.
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(hecs::Entity),

    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    /// An entity is already a member of another team.
    #[error("Entity {entity:?} already belongs to {team}")]
    AlreadyInTeam { entity: hecs::Entity, team: TeamId },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
