#![forbid(unsafe_code)]

//! Entity roster, weighted similarity scoring and session state (headless).
//!
//! The [`Population`] keeps connections symmetric, the [`Scorer`] turns a pair of entities into
//! a similarity in `[0, 1]` under the current [`Weights`], and the [`Session`] applies
//! [`Action`]s and rebuilds the scorer after every change.

pub mod config;
pub mod entity;
pub mod error;
pub mod population;
pub mod rank;
pub mod score;
pub mod session;
pub mod weights;

pub use config::AffinityConfig;
pub use entity::{
    Catalog, Department, DepartmentKey, Entity, EntityKey, Interest, InterestCategory,
    InterestKey, Location, LocationKey,
};
pub use error::{Error, Result};
pub use population::{Mutation, Population, Roster};
pub use rank::{RankRow, rank};
pub use score::{Contributions, Scorer};
pub use session::{Action, Session};
pub use weights::{Dimension, Weights};
