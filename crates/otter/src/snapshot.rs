use crate::graph::{LinkKey, NodeId};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkPosition {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub visible: bool,
}

/// Positions of every live node and link after a tick.
///
/// Keyed by the same stable ids the simulation diffs on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub alpha: f64,
    pub nodes: IndexMap<NodeId, NodePosition>,
    pub links: IndexMap<LinkKey, LinkPosition>,
}

impl Snapshot {
    /// Links a renderer should draw.
    pub fn visible_links(&self) -> impl Iterator<Item = (&LinkKey, &LinkPosition)> {
        self.links.iter().filter(|(_, l)| l.visible)
    }
}
