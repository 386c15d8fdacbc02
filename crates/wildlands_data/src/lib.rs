//! Core data structures for the Wildlands simulation.
//!
//! Everything in this crate is plain serde-derived state. Behavior (mutation, crossover,
//! combat, evolution) lives in `wildlands_core` and is attached through logic traits.

pub mod data;

pub use data::entity::{AmbientConditions, Animal, Position, Robot};
pub use data::error::{GenomeError, GenomeSide};
pub use data::genome::{Gene, GeneKind, Genome, DEFAULT_MUTATION_RANGE, DEFAULT_MUTATION_RATE};
pub use data::species::{ConservationStatus, SpeciesRecord};
pub use data::team::{BattleStats, CombatStrategy, Formation, TeamId, TeamRole};
pub use data::terrain::TerrainType;
pub use data::traits::{CombatTrait, CombatTraits, NaturalWeapon, MAX_COMBAT_TRAITS};
