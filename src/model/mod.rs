pub mod config {
    pub use wildlands_core::config::*;
}
pub mod combat {
    pub use wildlands_core::combat::*;
}
pub mod evolution {
    pub use wildlands_core::evolution::*;
}
pub mod lifecycle {
    pub use wildlands_core::lifecycle::*;
}
pub mod species {
    pub use wildlands_core::species::*;
}
pub mod team {
    pub use wildlands_core::team::*;
}
pub mod terrain {
    pub use wildlands_core::terrain::*;
}

pub mod world;
