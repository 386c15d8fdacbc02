//! Core data structures for the Wildlands simulation.

pub mod entity;
pub mod error;
pub mod genome;
pub mod species;
pub mod team;
pub mod terrain;
pub mod traits;
