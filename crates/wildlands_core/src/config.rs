//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Tunable rates and thresholds live here; the fixed
//! lookup tables (terrain modifiers, trait weights, conservation factors) are
//! static data in the modules that consume them.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impl)
//! 2. `config.toml` file (overrides defaults)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [simulation]
//! seed = 42
//! ticks = 5000
//! dt = 0.1
//!
//! [evolution]
//! min_breeding_age = 100.0
//! breeding_cooldown = 300.0
//!
//! [combat]
//! base_battle_chance = 0.95
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Simulation driver configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: Option<u64>,
    pub ticks: u64,
    /// Seconds of simulated time per tick.
    pub dt: f64,
    pub width: u16,
    pub height: u16,
    pub animals_per_species: usize,
    pub team_size: usize,
    /// Distance at which two teams meet, or two animals can breed.
    pub encounter_range: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ticks: 2000,
            dt: 0.1,
            width: 64,
            height: 64,
            animals_per_species: 8,
            team_size: 4,
            encounter_range: 6.0,
        }
    }
}

/// Breeding, mutation and co-evolution tuning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    pub min_breeding_age: f64,
    pub base_reproduction_chance: f64,
    /// Cooldown (in cooldown units) set on a pair after a successful breeding check.
    pub breeding_cooldown: f64,
    /// Cooldown units removed per second of simulated time.
    pub cooldown_decay_rate: f64,
    pub initial_environmental_pressure: f64,
    pub pressure_shift_chance: f64,
    pub pressure_shift_step: f64,
    pub min_gene_value: f64,
    pub max_gene_value: f64,
    /// Seconds of simulated time between co-evolution passes over team members.
    pub evolution_interval: f64,
    /// Seconds on a terrain that earn the full habitat familiarity bonus.
    pub habitat_exposure_scale: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            min_breeding_age: 100.0,
            base_reproduction_chance: 0.1,
            breeding_cooldown: 300.0,
            cooldown_decay_rate: 60.0,
            initial_environmental_pressure: 0.5,
            pressure_shift_chance: 0.001,
            pressure_shift_step: 0.1,
            min_gene_value: 0.1,
            max_gene_value: 2.0,
            evolution_interval: 5.0,
            habitat_exposure_scale: 200.0,
        }
    }
}

/// Battle resolution tuning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CombatConfig {
    pub base_battle_chance: f64,
    /// Battle chance multiplier when team sizes differ by more than `size_gap_threshold`.
    pub size_gap_penalty: f64,
    pub size_gap_threshold: usize,
    /// Strength gap (as a fraction of the weaker side) under which a battle is a draw.
    pub draw_threshold: f64,
    pub draw_damage: [u32; 2],
    pub defeat_damage: [u32; 2],
    pub max_dodge: f64,
    /// Seconds a team rests after a battle before it can fight again.
    pub battle_cooldown: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_battle_chance: 0.95,
            size_gap_penalty: 0.8,
            size_gap_threshold: 3,
            draw_threshold: 0.2,
            draw_damage: [15, 35],
            defeat_damage: [30, 70],
            max_dodge: 0.3,
            battle_cooldown: 10.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub evolution: EvolutionConfig,
    pub combat: CombatConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Simulation validation
        anyhow::ensure!(
            self.simulation.dt > 0.0 && self.simulation.dt <= 0.1,
            "Tick length must be in (0.0, 0.1]"
        );
        anyhow::ensure!(self.simulation.width > 0, "World width must be positive");
        anyhow::ensure!(self.simulation.height > 0, "World height must be positive");
        anyhow::ensure!(
            self.simulation.width <= 1000 && self.simulation.height <= 1000,
            "World too large (max 1000x1000)"
        );
        anyhow::ensure!(self.simulation.team_size > 0, "Team size must be positive");
        anyhow::ensure!(
            self.simulation.encounter_range >= 0.0,
            "Encounter range must be non-negative"
        );

        // Evolution validation
        anyhow::ensure!(
            self.evolution.min_breeding_age >= 0.0,
            "Minimum breeding age must be non-negative"
        );
        anyhow::ensure!(
            self.evolution.base_reproduction_chance >= 0.0
                && self.evolution.base_reproduction_chance <= 1.0,
            "Base reproduction chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.evolution.breeding_cooldown >= 0.0 && self.evolution.cooldown_decay_rate >= 0.0,
            "Breeding cooldowns must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.evolution.initial_environmental_pressure),
            "Environmental pressure must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.evolution.pressure_shift_chance),
            "Pressure shift chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.evolution.min_gene_value > 0.0
                && self.evolution.min_gene_value < self.evolution.max_gene_value,
            "Gene bounds must satisfy 0 < min < max"
        );
        anyhow::ensure!(
            self.evolution.evolution_interval > 0.0,
            "Evolution interval must be positive"
        );
        anyhow::ensure!(
            self.evolution.habitat_exposure_scale > 0.0,
            "Habitat exposure scale must be positive"
        );

        // Combat validation
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.combat.base_battle_chance),
            "Base battle chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.combat.draw_threshold >= 0.0,
            "Draw threshold must be non-negative"
        );
        anyhow::ensure!(
            self.combat.draw_damage[0] <= self.combat.draw_damage[1]
                && self.combat.defeat_damage[0] <= self.combat.defeat_damage[1],
            "Damage ranges must be ordered [min, max]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.combat.max_dodge),
            "Max dodge must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.combat.battle_cooldown >= 0.0,
            "Battle cooldown must be non-negative"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.combat).as_bytes());
        hex::encode(hasher.finalize())
    }
}
