use serde::{Deserialize, Serialize};

/// Terrain tag of a world cell. Also used as an animal's native habitat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    /// Open plains.
    #[default]
    Grassland,
    Forest,
    Desert,
    Mountain,
    /// Open water.
    Aquatic,
    Wetland,
    /// Transition between forest and grassland.
    ForestEdge,
    /// Transition between grassland and desert.
    Savanna,
    /// Transition between grassland and mountain.
    Hills,
    /// Transition between forest and mountain.
    WoodedHills,
    /// Transition between land and water.
    Beach,
}

impl TerrainType {
    pub const ALL: [TerrainType; 11] = [
        TerrainType::Grassland,
        TerrainType::Forest,
        TerrainType::Desert,
        TerrainType::Mountain,
        TerrainType::Aquatic,
        TerrainType::Wetland,
        TerrainType::ForestEdge,
        TerrainType::Savanna,
        TerrainType::Hills,
        TerrainType::WoodedHills,
        TerrainType::Beach,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grassland => "grassland",
            Self::Forest => "forest",
            Self::Desert => "desert",
            Self::Mountain => "mountain",
            Self::Aquatic => "aquatic",
            Self::Wetland => "wetland",
            Self::ForestEdge => "forest_edge",
            Self::Savanna => "savanna",
            Self::Hills => "hills",
            Self::WoodedHills => "wooded_hills",
            Self::Beach => "beach",
        }
    }

    #[must_use]
    pub fn is_transition(self) -> bool {
        matches!(
            self,
            Self::ForestEdge | Self::Savanna | Self::Hills | Self::WoodedHills | Self::Beach
        )
    }

    /// Dense cover where ambushers and camouflaged prey do well.
    #[must_use]
    pub fn is_covered(self) -> bool {
        matches!(
            self,
            Self::Forest | Self::ForestEdge | Self::WoodedHills | Self::Wetland
        )
    }
}

impl std::fmt::Display for TerrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
