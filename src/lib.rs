pub mod model;

use crate::model::config::AppConfig;
use crate::model::species::SpeciesCatalog;
use crate::model::world::World;

/// Builds a populated world from `config` and the bundled species catalog.
pub fn bootstrap(config: AppConfig) -> anyhow::Result<World> {
    let catalog = SpeciesCatalog::bundled()?;
    let mut world = World::new(config, catalog)?;
    world.populate()?;
    Ok(world)
}
