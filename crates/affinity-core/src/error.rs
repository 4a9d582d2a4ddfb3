use crate::entity::{DepartmentKey, EntityKey, InterestKey, LocationKey};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Similarity needs at least two entities, population has {size}")]
    PopulationTooSmall { size: usize },

    #[error(
        "Similarity normalizer is degenerate (maximum = {maximum}); enable a weight whose dimension is non-empty"
    )]
    DegenerateNormalizer { maximum: f64 },

    #[error("Entity {key} cannot be compared with itself")]
    SelfComparison { key: EntityKey },

    #[error("Unknown entity: {key}")]
    UnknownEntity { key: EntityKey },

    #[error("Unknown department: {key}")]
    UnknownDepartment { key: DepartmentKey },

    #[error("Unknown interest: {key}")]
    UnknownInterest { key: InterestKey },

    #[error("Unknown location: {key}")]
    UnknownLocation { key: LocationKey },

    #[error("Entity {key} cannot be connected to itself")]
    SelfConnection { key: EntityKey },

    #[error("Connection {from} -> {to} has no reverse edge")]
    AsymmetricConnection { from: EntityKey, to: EntityKey },

    #[error("Duplicate entity key: {key}")]
    DuplicateEntity { key: EntityKey },

    #[error("Invalid {dimension} weight {value}: weights must be finite and non-negative")]
    InvalidWeight { dimension: String, value: f64 },

    #[error("Unknown weight dimension: {name}")]
    UnknownDimension { name: String },

    #[error("Invalid configuration at `{path}`: {message}")]
    InvalidConfig { path: String, message: String },
}
