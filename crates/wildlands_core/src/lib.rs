//! # Wildlands Core
//!
//! The ecosystem simulation engine for Wildlands: gene-level inheritance, per-species
//! evolution under environmental pressure, and team battles on typed terrain.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Genome mutation and crossover (`GeneLogic`, `GenomeLogic`)
//! - Health and mood bookkeeping for creatures
//! - Breeding eligibility, offspring synthesis and population caps
//! - Co-evolution trackers (habitat, predator-prey, social, combat)
//! - Team battle resolution with terrain, formations, abilities and statuses
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! Plain data lives in `wildlands_data`; behavior is attached here through logic traits
//! and manager structs. Entities are `hecs` entities carrying an `Animal` (or `Robot`)
//! and a `Position`; teams hold entity handles in a [`team::TeamRegistry`]. Every random
//! decision takes an explicit `Rng`, so a seeded `ChaCha8Rng` reproduces a whole run.
//!
//! ## Example
//!
//! ```
//! use wildlands_core::genetics::GenomeLogic;
//! use wildlands_data::{GeneKind, Genome};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mother = Genome::from_values([(GeneKind::ArmorRating, 1.4)]);
//! let father = Genome::from_values([(GeneKind::ArmorRating, 0.6)]);
//!
//! let child = mother.crossover_with_rng(&father, &mut rng).unwrap();
//! let armor = child.value(GeneKind::ArmorRating).unwrap();
//! assert!(armor == 1.4 || armor == 0.6);
//! ```

/// Team battle resolution, combat tables and statuses
pub mod combat;
/// Configuration management for simulation parameters
pub mod config;
/// Error types
pub mod error;
/// Per-species evolution engine and co-evolution trackers
pub mod evolution;
/// Gene mutation and genome crossover
pub mod genetics;
/// Health and mood state, status effects and resource needs
pub mod health_mood;
/// Bounded rolling histories
pub mod history;
/// Animal creation and genome synthesis
pub mod lifecycle;
/// Metrics collection and structured logging
pub mod metrics;
/// Species catalog and population caps
pub mod species;
/// Teams and the team registry
pub mod team;
/// Terrain lookup and habitat compatibility
pub mod terrain;

pub use combat::{BattleContext, BattleOutcome, BattleResult, CombatManager};
pub use error::{CoreError, Result};
pub use evolution::{EvolutionContext, EvolutionManager, Offspring, SpeciesStats};
pub use health_mood::HealthMoodSystem;
pub use team::{Team, TeamRegistry};
