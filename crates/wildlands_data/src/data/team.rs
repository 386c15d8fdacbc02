use serde::{Deserialize, Serialize};

/// Handle of a team inside the team registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "team-{}", self.0)
    }
}

/// Team-wide tactical stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    Aggressive,
    Defensive,
    Scout,
    /// No declared stance; neutral multipliers.
    #[default]
    Loose,
}

impl Formation {
    pub const ALL: [Formation; 4] = [
        Formation::Aggressive,
        Formation::Defensive,
        Formation::Scout,
        Formation::Loose,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Defensive => "defensive",
            Self::Scout => "scout",
            Self::Loose => "loose",
        }
    }
}

impl std::fmt::Display for Formation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role an animal fills inside its team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Attacker,
    Defender,
    Scout,
}

impl TeamRole {
    pub const ALL: [TeamRole; 3] = [TeamRole::Attacker, TeamRole::Defender, TeamRole::Scout];
}

/// Fighting approach recorded for combat specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStrategy {
    Aggressive,
    Defensive,
    Evasive,
}

impl CombatStrategy {
    pub const ALL: [CombatStrategy; 3] = [
        CombatStrategy::Aggressive,
        CombatStrategy::Defensive,
        CombatStrategy::Evasive,
    ];
}

impl From<Formation> for CombatStrategy {
    fn from(formation: Formation) -> Self {
        match formation {
            Formation::Aggressive | Formation::Loose => Self::Aggressive,
            Formation::Defensive => Self::Defensive,
            Formation::Scout => Self::Evasive,
        }
    }
}

/// Win/loss record of a team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    pub wins: u32,
    pub losses: u32,
    pub members_lost: u32,
}

impl BattleStats {
    #[must_use]
    pub fn battles(&self) -> u32 {
        self.wins + self.losses
    }
}
