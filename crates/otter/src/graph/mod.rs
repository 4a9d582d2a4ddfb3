use crate::error::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Stable node identity. Diffing, snapshots and hit testing all key on this value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Stable link identity: the ordered pair of endpoint ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
    pub source: NodeId,
    pub target: NodeId,
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=>{}", self.source, self.target)
    }
}

// Serialized as `"source=>target"` so snapshots can use it as a JSON object key.
impl Serialize for LinkKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub id: NodeId,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Permanent pin. Physics never moves a node that carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Point>,
}

impl NodeSpec {
    pub const DEFAULT_RADIUS: f64 = 5.0;

    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            radius: Self::DEFAULT_RADIUS,
            label: None,
            color: None,
            fixed: None,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn pinned_at(mut self, x: f64, y: f64) -> Self {
        self.fixed = Some(Point::new(x, y));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSpec {
    pub source: NodeId,
    pub target: NodeId,
    pub strength: f64,
    /// Whether a renderer should draw the link. Invisible links still shape the layout.
    pub visible: bool,
}

impl LinkSpec {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            strength: 1.0,
            visible: true,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn key(&self) -> LinkKey {
        LinkKey {
            source: self.source,
            target: self.target,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<NodeSpec>,
    pub links: Vec<LinkSpec>,
}

impl GraphData {
    pub fn new(nodes: Vec<NodeSpec>, links: Vec<LinkSpec>) -> Self {
        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        let mut node_exists: FxHashSet<NodeId> = FxHashSet::default();
        for n in &self.nodes {
            if !node_exists.insert(n.id) {
                return Err(Error::DuplicateNode { id: n.id });
            }
            if !n.radius.is_finite() || n.radius < 0.0 {
                return Err(Error::NonFinite {
                    subject: format!("node {}", n.id),
                    field: "radius",
                });
            }
            if n.fixed.is_some_and(|p| !p.is_finite()) {
                return Err(Error::NonFinite {
                    subject: format!("node {}", n.id),
                    field: "fixed position",
                });
            }
        }

        let mut link_exists: FxHashSet<LinkKey> = FxHashSet::default();
        for l in &self.links {
            let key = l.key();
            for endpoint in [l.source, l.target] {
                if !node_exists.contains(&endpoint) {
                    return Err(Error::MissingEndpoint {
                        link: key,
                        missing: endpoint,
                    });
                }
            }
            if l.source == l.target {
                return Err(Error::SelfLink { link: key });
            }
            if !link_exists.insert(key) {
                return Err(Error::DuplicateLink { link: key });
            }
            if !l.strength.is_finite() {
                return Err(Error::NonFinite {
                    subject: format!("link {key}"),
                    field: "strength",
                });
            }
        }
        Ok(())
    }
}
