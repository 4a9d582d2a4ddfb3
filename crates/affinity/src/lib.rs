#![forbid(unsafe_code)]

//! `affinity` scores how alike the members of a roster are and lays the result out as a
//! force-directed graph, without drawing anything.
//!
//! - [`affinity_core`] (re-exported at the root): entities, weights, the scorer and the
//!   session reducer.
//! - [`otter`]: the layout engine.
//! - [`graph`]: turns a session into layout graph data.
//! - [`Explorer`]: keeps a session and a live engine in step.

pub mod error;
pub mod explorer;
pub mod graph;
pub mod seed;

pub use affinity_core::{
    Action, AffinityConfig, Catalog, Contributions, Department, DepartmentKey, Dimension, Entity,
    EntityKey, Interest, InterestCategory, InterestKey, Location, LocationKey, Mutation,
    Population, RankRow, Roster, Scorer, Session, Weights, rank,
};
pub use error::{Error, Result};
pub use explorer::{Explorer, ExplorerOptions, ViewStatus};
pub use graph::{Coloring, GraphOptions, project};
pub use seed::{SeedOptions, generate};

pub use affinity_core;
pub use otter;

/// Reads the typed sections the umbrella crate understands from `config`.
pub fn explorer_options(config: &AffinityConfig) -> Result<ExplorerOptions> {
    Ok(ExplorerOptions {
        graph: config.section("graph")?,
        forces: config.section("forces")?,
        simulation: config.section("simulation")?,
    })
}

/// A config holding every section the workspace reads, each filled with its defaults.
///
/// Configuration files are merged over this with [`AffinityConfig::deep_merge`].
pub fn default_config() -> Result<AffinityConfig> {
    let mut config = AffinityConfig::default();
    config.set_section("weights", &Weights::default())?;
    config.set_section("graph", &GraphOptions::default())?;
    config.set_section("forces", &otter::ForceOptions::default())?;
    config.set_section("simulation", &otter::SimulationOptions::default())?;
    config.set_section("seed", &SeedOptions::default())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_reads_back_as_defaults() {
        let config = default_config().unwrap();
        assert_eq!(config.weights().unwrap(), Weights::default());
        assert_eq!(
            config.section::<SeedOptions>("seed").unwrap(),
            SeedOptions::default()
        );
        let options = explorer_options(&config).unwrap();
        assert_eq!(options.graph, GraphOptions::default());
        assert_eq!(options.forces, otter::ForceOptions::default());
        assert_eq!(options.simulation, otter::SimulationOptions::default());
    }
}
