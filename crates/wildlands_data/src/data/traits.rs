use serde::{Deserialize, Serialize};

/// Maximum number of combat tags an animal carries at once.
pub const MAX_COMBAT_TRAITS: usize = 3;

/// Known combat specialization tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatTrait {
    HeatAdapted,
    ColdAdapted,
    PackHunter,
    AmbushPredator,
    AquaticMaster,
    Berserker,
    ThickHide,
    QuickReflexes,
    Camouflage,
    QuickEscape,
}

impl CombatTrait {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeatAdapted => "heat_adapted",
            Self::ColdAdapted => "cold_adapted",
            Self::PackHunter => "pack_hunter",
            Self::AmbushPredator => "ambush_predator",
            Self::AquaticMaster => "aquatic_master",
            Self::Berserker => "berserker",
            Self::ThickHide => "thick_hide",
            Self::QuickReflexes => "quick_reflexes",
            Self::Camouflage => "camouflage",
            Self::QuickEscape => "quick_escape",
        }
    }
}

impl std::fmt::Display for CombatTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded, insertion-ordered set of combat tags. Empty means "none".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CombatTrait>", into = "Vec<CombatTrait>")]
pub struct CombatTraits(Vec<CombatTrait>);

impl From<Vec<CombatTrait>> for CombatTraits {
    fn from(tags: Vec<CombatTrait>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<CombatTraits> for Vec<CombatTrait> {
    fn from(traits: CombatTraits) -> Self {
        traits.0
    }
}

impl CombatTraits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag. Returns `false` when it is already present or the set is full.
    pub fn insert(&mut self, tag: CombatTrait) -> bool {
        if self.0.len() >= MAX_COMBAT_TRAITS || self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    #[must_use]
    pub fn contains(&self, tag: CombatTrait) -> bool {
        self.0.contains(&tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_COMBAT_TRAITS
    }

    pub fn iter(&self) -> impl Iterator<Item = CombatTrait> + '_ {
        self.0.iter().copied()
    }

    /// Tags of `self` followed by the new tags of `other`, truncated to the bound.
    #[must_use]
    pub fn union(&self, other: &CombatTraits) -> CombatTraits {
        let mut merged = self.clone();
        for tag in other.iter() {
            merged.insert(tag);
        }
        merged
    }
}

impl FromIterator<CombatTrait> for CombatTraits {
    fn from_iter<I: IntoIterator<Item = CombatTrait>>(iter: I) -> Self {
        let mut traits = CombatTraits::new();
        for tag in iter {
            traits.insert(tag);
        }
        traits
    }
}

impl std::fmt::Display for CombatTraits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        let joined: Vec<&str> = self.0.iter().map(|t| t.as_str()).collect();
        f.write_str(&joined.join(","))
    }
}

/// Natural weapon an animal fights with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaturalWeapon {
    Claws,
    Fangs,
    Horns,
    Tusks,
    Hooves,
    Beak,
    Venom,
    Tail,
}
