//! Static combat tables: terrain modifiers, trait abilities, combat statuses and
//! natural weapons.

use serde::Serialize;
use wildlands_data::{Animal, CombatTrait, Formation, NaturalWeapon, TerrainType};

/// How a terrain shapes a fight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainModifier {
    /// Divides incoming damage; never below 1.0.
    pub defense: f64,
    /// Strength multiplier of animals whose habitat has no entry in `habitat_bonus`.
    pub default_habitat: f64,
    pub habitat_bonus: &'static [(TerrainType, f64)],
}

impl TerrainModifier {
    /// Strength multiplier for an animal native to `habitat`.
    #[must_use]
    pub fn habitat_modifier(&self, habitat: TerrainType) -> f64 {
        self.habitat_bonus
            .iter()
            .find(|(h, _)| *h == habitat)
            .map_or(self.default_habitat, |(_, bonus)| *bonus)
    }
}

#[must_use]
pub fn terrain_modifier(terrain: TerrainType) -> TerrainModifier {
    use TerrainType::*;
    let (defense, default_habitat, habitat_bonus): (f64, f64, &'static [(TerrainType, f64)]) =
        match terrain {
            Grassland => (1.0, 1.0, &[(Grassland, 1.2), (Savanna, 1.1)]),
            Forest => (1.3, 0.9, &[(Forest, 1.3), (ForestEdge, 1.1), (WoodedHills, 1.1)]),
            Desert => (1.0, 0.8, &[(Desert, 1.4), (Savanna, 1.1)]),
            Mountain => (1.5, 0.8, &[(Mountain, 1.4), (Hills, 1.2)]),
            Aquatic => (1.0, 0.6, &[(Aquatic, 1.5), (Wetland, 1.2), (Beach, 1.1)]),
            Wetland => (1.1, 0.8, &[(Wetland, 1.3), (Aquatic, 1.2)]),
            ForestEdge => (1.15, 1.0, &[(ForestEdge, 1.2), (Forest, 1.15), (Grassland, 1.15)]),
            Savanna => (1.0, 1.0, &[(Savanna, 1.2), (Grassland, 1.15), (Desert, 1.1)]),
            Hills => (1.25, 0.9, &[(Hills, 1.2), (Mountain, 1.2)]),
            WoodedHills => (1.35, 0.85, &[(WoodedHills, 1.3), (Forest, 1.2), (Hills, 1.15)]),
            Beach => (1.0, 0.9, &[(Beach, 1.2), (Aquatic, 1.2)]),
        };
    TerrainModifier {
        defense,
        default_habitat,
        habitat_bonus,
    }
}

/// Strength bonus a tag gives on `terrain`.
#[must_use]
pub fn trait_terrain_bonus(tag: CombatTrait, terrain: TerrainType) -> f64 {
    use TerrainType::*;
    match (tag, terrain) {
        (CombatTrait::HeatAdapted, Desert | Savanna) => 1.3,
        (CombatTrait::ColdAdapted, Mountain) => 1.3,
        (CombatTrait::ColdAdapted, Hills) => 1.1,
        (CombatTrait::AquaticMaster, Aquatic) => 1.5,
        (CombatTrait::AquaticMaster, Wetland | Beach) => 1.2,
        (CombatTrait::AmbushPredator, t) if t.is_covered() => 1.2,
        (CombatTrait::Camouflage, t) if t.is_covered() => 1.1,
        _ => 1.0,
    }
}

/// Combat statuses inflicted or self-applied in battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStatus {
    Bleeding,
    Poisoned,
    Enraged,
    Fortified,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusDefinition {
    pub hp_per_second: f64,
    pub duration: f64,
    /// Multiplier on the carrier's fighting strength.
    pub strength: f64,
    /// Multiplier on damage the carrier takes.
    pub damage_taken: f64,
}

#[must_use]
pub fn status_definition(status: CombatStatus) -> StatusDefinition {
    let (hp_per_second, duration, strength, damage_taken) = match status {
        CombatStatus::Bleeding => (-2.0, 10.0, 1.0, 1.0),
        CombatStatus::Poisoned => (-3.0, 8.0, 0.9, 1.0),
        CombatStatus::Enraged => (0.0, 10.0, 1.2, 1.1),
        CombatStatus::Fortified => (0.0, 15.0, 1.0, 0.7),
    };
    StatusDefinition {
        hp_per_second,
        duration,
        strength,
        damage_taken,
    }
}

/// Battle ability granted by a combat tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitAbility {
    pub damage_multiplier: f64,
    /// Seconds before the ability can fire again.
    pub cooldown: f64,
    /// Status the user gains when the ability fires.
    pub status: Option<CombatStatus>,
    /// Whether teammates sharing the tag fight better together.
    pub team_bonus: bool,
}

#[must_use]
pub fn trait_ability(tag: CombatTrait) -> Option<TraitAbility> {
    let (damage_multiplier, cooldown, status, team_bonus) = match tag {
        CombatTrait::PackHunter => (1.2, 30.0, None, true),
        CombatTrait::AmbushPredator => (1.5, 45.0, None, false),
        CombatTrait::Berserker => (1.4, 40.0, Some(CombatStatus::Enraged), false),
        CombatTrait::ThickHide => (1.0, 35.0, Some(CombatStatus::Fortified), false),
        CombatTrait::AquaticMaster => (1.3, 30.0, None, false),
        CombatTrait::QuickReflexes => (1.15, 20.0, None, false),
        CombatTrait::HeatAdapted
        | CombatTrait::ColdAdapted
        | CombatTrait::Camouflage
        | CombatTrait::QuickEscape => return None,
    };
    Some(TraitAbility {
        damage_multiplier,
        cooldown,
        status,
        team_bonus,
    })
}

/// Team synergy multiplier when a team-bonus ability is shared.
pub const TEAM_SYNERGY_BONUS: f64 = 1.1;

#[must_use]
pub fn weapon_bonus(weapon: NaturalWeapon) -> f64 {
    match weapon {
        NaturalWeapon::Claws => 1.2,
        NaturalWeapon::Fangs => 1.3,
        NaturalWeapon::Horns => 1.25,
        NaturalWeapon::Tusks => 1.3,
        NaturalWeapon::Hooves => 1.1,
        NaturalWeapon::Beak => 1.1,
        NaturalWeapon::Venom => 1.4,
        NaturalWeapon::Tail => 1.05,
    }
}

const WEAPON_COMBOS: [(NaturalWeapon, NaturalWeapon, f64); 4] = [
    (NaturalWeapon::Claws, NaturalWeapon::Fangs, 1.15),
    (NaturalWeapon::Fangs, NaturalWeapon::Venom, 1.2),
    (NaturalWeapon::Horns, NaturalWeapon::Hooves, 1.1),
    (NaturalWeapon::Tusks, NaturalWeapon::Hooves, 1.1),
];

/// Best single weapon bonus times the best combo the animal completes; 1.0 unarmed.
#[must_use]
pub fn weapon_damage_bonus(weapons: &[NaturalWeapon]) -> f64 {
    let best = weapons
        .iter()
        .map(|w| weapon_bonus(*w))
        .fold(1.0, f64::max);
    let combo = WEAPON_COMBOS
        .iter()
        .filter(|(a, b, _)| weapons.contains(a) && weapons.contains(b))
        .map(|(_, _, bonus)| *bonus)
        .fold(1.0, f64::max);
    best * combo
}

/// Strength multiplier of a formation.
#[must_use]
pub fn formation_strength(formation: Formation) -> f64 {
    match formation {
        Formation::Aggressive => 1.5,
        Formation::Defensive => 0.8,
        Formation::Scout => 1.2,
        Formation::Loose => 1.0,
    }
}

/// Multiplier on damage a formation takes.
#[must_use]
pub fn formation_damage(formation: Formation) -> f64 {
    match formation {
        Formation::Aggressive => 1.3,
        Formation::Defensive => 0.7,
        Formation::Scout | Formation::Loose => 1.0,
    }
}

/// Best habitat modifier over the animal's habitat and its evolved preferences.
#[must_use]
pub fn animal_habitat_modifier(animal: &Animal, terrain: TerrainType) -> f64 {
    let table = terrain_modifier(terrain);
    animal
        .preferred_terrains()
        .map(|h| table.habitat_modifier(h))
        .fold(f64::MIN, f64::max)
}
