use crate::graph::{LinkKey, NodeId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("link {link} references an unknown node: {missing}")]
    MissingEndpoint { link: LinkKey, missing: NodeId },

    #[error("graph contains the node {id} more than once")]
    DuplicateNode { id: NodeId },

    #[error("graph contains the link {link} more than once")]
    DuplicateLink { link: LinkKey },

    #[error("link {link} connects a node to itself")]
    SelfLink { link: LinkKey },

    #[error("non-finite {field} for {subject}")]
    NonFinite { subject: String, field: &'static str },

    #[error("simulation produced a non-finite position for node {id} at tick {tick}")]
    NonFinitePosition { id: NodeId, tick: u64 },

    #[error("unknown node: {id}")]
    UnknownNode { id: NodeId },

    #[error(
        "simulation cannot converge: alpha target {alpha_target} is not below alpha min {alpha_min}"
    )]
    NeverConverges { alpha_target: f64, alpha_min: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
