//! Terrain lookup and habitat compatibility.

use serde::{Deserialize, Serialize};
pub use wildlands_data::TerrainType;

/// World-grid collaborator: terrain by world coordinate.
pub trait TerrainLookup {
    /// Terrain at `(x, y)`, or `None` outside the known world.
    fn terrain_at(&self, x: f64, y: f64) -> Option<TerrainType>;
}

/// How well an animal copes with a terrain relative to its habitat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compatibility {
    Optimal,
    Survivable,
    Harmful,
}

/// Terrains an animal of `habitat` thrives in.
#[must_use]
pub fn optimal_terrains(habitat: TerrainType) -> &'static [TerrainType] {
    use TerrainType::*;
    match habitat {
        Grassland => &[Grassland, Savanna, ForestEdge],
        Forest => &[Forest, ForestEdge, WoodedHills],
        Desert => &[Desert, Savanna],
        Mountain => &[Mountain, Hills, WoodedHills],
        Aquatic => &[Aquatic, Beach, Wetland],
        Wetland => &[Wetland, Aquatic, Beach],
        ForestEdge => &[ForestEdge, Forest, Grassland],
        Savanna => &[Savanna, Grassland, Desert],
        Hills => &[Hills, Mountain, Grassland],
        WoodedHills => &[WoodedHills, Forest, Hills],
        Beach => &[Beach, Aquatic, Grassland],
    }
}

/// Terrains that actively hurt an animal of `habitat`.
fn harmful_terrains(habitat: TerrainType) -> &'static [TerrainType] {
    use TerrainType::*;
    match habitat {
        Aquatic => &[Desert, Mountain, Hills, Savanna],
        Wetland => &[Desert, Mountain],
        Desert | Savanna => &[Aquatic, Wetland],
        Forest | WoodedHills => &[Aquatic, Desert],
        Mountain | Hills => &[Aquatic, Wetland],
        Grassland | ForestEdge => &[Aquatic],
        Beach => &[Desert, Mountain],
    }
}

#[must_use]
pub fn compatibility(habitat: TerrainType, terrain: TerrainType) -> Compatibility {
    if optimal_terrains(habitat).contains(&terrain) {
        Compatibility::Optimal
    } else if harmful_terrains(habitat).contains(&terrain) {
        Compatibility::Harmful
    } else {
        Compatibility::Survivable
    }
}

/// Rectangular terrain grid with one tag per integer cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    pub width: u16,
    pub height: u16,
    cells: Vec<TerrainType>,
}

impl TerrainGrid {
    #[must_use]
    pub fn new(width: u16, height: u16, fill: TerrainType) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width as usize * height as usize],
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn set(&mut self, x: u16, y: u16, terrain: TerrainType) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = terrain;
        }
    }

    /// Fills the inclusive rectangle `(x0, y0)..=(x1, y1)`, clipped to the grid.
    pub fn fill_rect(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, terrain: TerrainType) {
        for y in y0..=y1.min(self.height.saturating_sub(1)) {
            for x in x0..=x1.min(self.width.saturating_sub(1)) {
                self.set(x, y, terrain);
            }
        }
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<TerrainType> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Banded landscape: water on the west edge, then wetland, grassland, forest,
    /// hills and mountains to the east, with a desert strip in the south.
    #[must_use]
    pub fn banded(width: u16, height: u16) -> Self {
        use TerrainType::*;
        let bands = [
            Aquatic, Beach, Wetland, Grassland, Savanna, Grassland, ForestEdge, Forest,
            WoodedHills, Hills, Mountain,
        ];
        let mut grid = Self::new(width, height, Grassland);
        for x in 0..width {
            let band = bands[x as usize * bands.len() / width.max(1) as usize];
            for y in 0..height {
                let terrain = if y >= height - height / 5 && matches!(band, Grassland | Savanna) {
                    Desert
                } else {
                    band
                };
                grid.set(x, y, terrain);
            }
        }
        grid
    }
}

impl TerrainLookup for TerrainGrid {
    fn terrain_at(&self, x: f64, y: f64) -> Option<TerrainType> {
        if x < 0.0 || y < 0.0 || !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.get(x.floor() as u16, y.floor() as u16)
    }
}
