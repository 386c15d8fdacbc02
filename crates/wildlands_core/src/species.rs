//! Species dataset and conservation-derived population factors.

use serde::Serialize;
use wildlands_data::{ConservationStatus, SpeciesRecord};

const BUNDLED_CATALOG: &str = include_str!("../data/species.json");

pub const MIN_POPULATION_CAP: usize = 10;
pub const MAX_POPULATION_CAP: usize = 200;

/// Fixed per-status population factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationFactors {
    /// Population cap before predator/reproduction adjustments.
    pub base_cap: f64,
    /// Multiplier on offspring mutation rates; endangered species mutate harder.
    pub mutation_rate: f64,
}

#[must_use]
pub fn population_factors(status: ConservationStatus) -> PopulationFactors {
    let (base_cap, mutation_rate) = match status {
        ConservationStatus::LeastConcern => (100.0, 1.0),
        ConservationStatus::NearThreatened => (80.0, 1.2),
        ConservationStatus::Vulnerable => (60.0, 1.4),
        ConservationStatus::Endangered => (40.0, 1.7),
        ConservationStatus::CriticallyEndangered => (20.0, 2.0),
        ConservationStatus::Unknown => (50.0, 1.0),
    };
    PopulationFactors {
        base_cap,
        mutation_rate,
    }
}

/// `clamp(10, 200, round(base * (1 - predator_pressure*0.3) * (1 + reproduction_rate*0.2)))`.
#[must_use]
pub fn population_cap(
    status: ConservationStatus,
    predator_pressure: f64,
    reproduction_rate: f64,
) -> usize {
    let base = population_factors(status).base_cap;
    let raw = (base * (1.0 - predator_pressure * 0.3) * (1.0 + reproduction_rate * 0.2)).round();
    if raw.is_nan() {
        return MIN_POPULATION_CAP;
    }
    raw.clamp(MIN_POPULATION_CAP as f64, MAX_POPULATION_CAP as f64) as usize
}

/// The loaded species dataset.
#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    records: Vec<SpeciesRecord>,
}

impl SpeciesCatalog {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let records: Vec<SpeciesRecord> = serde_json::from_str(json)?;
        anyhow::ensure!(!records.is_empty(), "Species catalog is empty");
        Ok(Self { records })
    }

    /// The species dataset shipped with the crate.
    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    #[must_use]
    pub fn from_records(records: Vec<SpeciesRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SpeciesRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = SpeciesCatalog::bundled().unwrap();
        assert!(catalog.len() >= 6);
        let wolf = catalog.get("Grey Wolf").unwrap();
        assert!(wolf.predator);
        assert_eq!(wolf.conservation_status, ConservationStatus::LeastConcern);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(SpeciesCatalog::from_json("[]").is_err());
        assert!(SpeciesCatalog::from_json("{\"name\":1}").is_err());
    }

    #[test]
    fn test_population_cap_formula() {
        // 100 * (1 - 0.5*0.3) * (1 + 1.0*0.2) = 100 * 0.85 * 1.2 = 102
        assert_eq!(population_cap(ConservationStatus::LeastConcern, 0.5, 1.0), 102);
        // 20 * 1.0 * 1.0 = 20
        assert_eq!(population_cap(ConservationStatus::CriticallyEndangered, 0.0, 0.0), 20);
        assert_eq!(population_cap(ConservationStatus::Unknown, 0.0, 0.0), 50);
        // 20 * 0.7 = 14
        assert_eq!(population_cap(ConservationStatus::CriticallyEndangered, 1.0, 0.0), 14);
    }

    #[test]
    fn test_population_cap_clamps() {
        assert_eq!(
            population_cap(ConservationStatus::LeastConcern, 0.0, 50.0),
            MAX_POPULATION_CAP
        );
        assert_eq!(
            population_cap(ConservationStatus::CriticallyEndangered, 3.0, 0.0),
            MIN_POPULATION_CAP
        );
        assert_eq!(
            population_cap(ConservationStatus::Unknown, f64::NAN, 1.0),
            MIN_POPULATION_CAP
        );
    }

    #[test]
    fn test_endangered_species_mutate_harder() {
        let lc = population_factors(ConservationStatus::LeastConcern);
        let cr = population_factors(ConservationStatus::CriticallyEndangered);
        assert!(cr.mutation_rate > lc.mutation_rate);
        assert!(cr.base_cap < lc.base_cap);
    }
}
