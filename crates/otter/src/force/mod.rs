//! Composable forces. Each force caches its per-node/per-link parameters in `initialize` and
//! contributes velocity (or, for centering, position) adjustments in `apply`.

use crate::error::{Error, Result};
use crate::graph::{LinkSpec, NodeSpec, Point};
use crate::rng::XorShift64Star;
use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod axis;
mod center;
mod collide;
mod link;
mod many_body;

pub use axis::{Axis, AxisForce};
pub use center::CenterForce;
pub use collide::CollideForce;
pub use link::LinkForce;
pub use many_body::ManyBodyForce;

pub type Vec2 = na::Vector2<f64>;

pub type NodeFn = dyn Fn(&NodeSpec) -> f64 + Send + Sync;
pub type LinkFn = dyn Fn(&LinkSpec, &NodeSpec, &NodeSpec) -> f64 + Send + Sync;

/// A force parameter: either one value for every element or a function of the element.
pub enum Param<F: ?Sized> {
    Constant(f64),
    Computed(Arc<F>),
}

pub type NodeParam = Param<NodeFn>;
pub type LinkParam = Param<LinkFn>;

impl<F: ?Sized> Clone for Param<F> {
    fn clone(&self) -> Self {
        match self {
            Param::Constant(v) => Param::Constant(*v),
            Param::Computed(f) => Param::Computed(Arc::clone(f)),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Param<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Param::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<F: ?Sized> From<f64> for Param<F> {
    fn from(value: f64) -> Self {
        Param::Constant(value)
    }
}

impl NodeParam {
    pub fn computed(f: impl Fn(&NodeSpec) -> f64 + Send + Sync + 'static) -> Self {
        Param::Computed(Arc::new(f))
    }

    pub fn eval(&self, node: &NodeSpec) -> f64 {
        match self {
            Param::Constant(v) => *v,
            Param::Computed(f) => f(node),
        }
    }

    pub(crate) fn eval_all(&self, nodes: &[NodeSpec], what: &'static str) -> Result<Vec<f64>> {
        nodes
            .iter()
            .map(|n| {
                let v = self.eval(n);
                if v.is_finite() {
                    Ok(v)
                } else {
                    Err(Error::NonFinite {
                        subject: format!("node {}", n.id),
                        field: what,
                    })
                }
            })
            .collect()
    }
}

impl LinkParam {
    pub fn computed(
        f: impl Fn(&LinkSpec, &NodeSpec, &NodeSpec) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Param::Computed(Arc::new(f))
    }

    pub fn eval(&self, link: &LinkSpec, source: &NodeSpec, target: &NodeSpec) -> f64 {
        match self {
            Param::Constant(v) => *v,
            Param::Computed(f) => f(link, source, target),
        }
    }
}

/// Per-node physical state owned by the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Transient pin (drag); takes precedence over `anchor`.
    pub pin: Option<Vec2>,
    /// Permanent pin copied from `NodeSpec::fixed`.
    pub anchor: Option<Vec2>,
}

impl Body {
    pub fn fixed(&self) -> Option<Vec2> {
        self.pin.or(self.anchor)
    }

    /// Position as seen by a renderer: pins take precedence over the free coordinates.
    pub fn visible_pos(&self) -> Vec2 {
        self.fixed().unwrap_or(self.pos)
    }
}

/// Link endpoints resolved to indices into the simulation's node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedLink {
    pub source: usize,
    pub target: usize,
}

/// The set of forces a simulation applies each tick. `None` disables a force.
#[derive(Debug, Clone, Default)]
pub struct Forces {
    pub center: Option<CenterForce>,
    pub many_body: Option<ManyBodyForce>,
    pub collide: Option<CollideForce>,
    pub link: Option<LinkForce>,
    pub x: Option<AxisForce>,
    pub y: Option<AxisForce>,
}

impl Forces {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_center(mut self, force: CenterForce) -> Self {
        self.center = Some(force);
        self
    }

    pub fn with_many_body(mut self, force: ManyBodyForce) -> Self {
        self.many_body = Some(force);
        self
    }

    pub fn with_collide(mut self, force: CollideForce) -> Self {
        self.collide = Some(force);
        self
    }

    pub fn with_link(mut self, force: LinkForce) -> Self {
        self.link = Some(force);
        self
    }

    pub fn with_axes(mut self, x: AxisForce, y: AxisForce) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Where new nodes are spawned: the centering target, or the origin.
    pub fn origin(&self) -> Point {
        self.center
            .as_ref()
            .map(|c| Point::new(c.x, c.y))
            .unwrap_or_default()
    }

    pub(crate) fn initialize(
        &mut self,
        nodes: &[NodeSpec],
        links: &[LinkSpec],
        resolved: &[ResolvedLink],
    ) -> Result<()> {
        if let Some(f) = self.many_body.as_mut() {
            f.initialize(nodes)?;
        }
        if let Some(f) = self.collide.as_mut() {
            f.initialize(nodes)?;
        }
        if let Some(f) = self.link.as_mut() {
            f.initialize(nodes, links, resolved)?;
        }
        if let Some(f) = self.x.as_mut() {
            f.initialize(nodes)?;
        }
        if let Some(f) = self.y.as_mut() {
            f.initialize(nodes)?;
        }
        Ok(())
    }

    pub(crate) fn apply(
        &mut self,
        bodies: &mut [Body],
        resolved: &[ResolvedLink],
        alpha: f64,
        rng: &mut XorShift64Star,
    ) {
        if let Some(f) = self.center.as_ref() {
            f.apply(bodies);
        }
        if let Some(f) = self.many_body.as_ref() {
            f.apply(bodies, alpha, rng);
        }
        if let Some(f) = self.collide.as_ref() {
            f.apply(bodies, rng);
        }
        if let Some(f) = self.link.as_ref() {
            f.apply(bodies, resolved, alpha, rng);
        }
        if let Some(f) = self.x.as_ref() {
            f.apply(bodies, alpha);
        }
        if let Some(f) = self.y.as_ref() {
            f.apply(bodies, alpha);
        }
    }
}

/// Serializable description of a force set, used by configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceOptions {
    pub center: bool,
    pub charge: Option<f64>,
    pub collide: Option<CollideOptions>,
    pub link: Option<LinkOptions>,
    pub axis: Option<AxisOptions>,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            center: true,
            charge: Some(ManyBodyForce::DEFAULT_STRENGTH),
            collide: Some(CollideOptions::default()),
            link: Some(LinkOptions::default()),
            axis: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollideOptions {
    /// Added to each node's radius to form its collision radius.
    pub radius_margin: f64,
    pub strength: f64,
    pub iterations: usize,
}

impl Default for CollideOptions {
    fn default() -> Self {
        Self {
            radius_margin: 3.0,
            strength: 1.0,
            iterations: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkOptions {
    pub distance: f64,
    pub iterations: usize,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            distance: LinkForce::DEFAULT_DISTANCE,
            iterations: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisOptions {
    pub strength_x: f64,
    pub strength_y: f64,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            strength_x: AxisForce::DEFAULT_STRENGTH,
            strength_y: AxisForce::DEFAULT_STRENGTH,
        }
    }
}

impl ForceOptions {
    /// Builds the force set for a drawing surface centered on `center`.
    pub fn build(&self, center: Point) -> Forces {
        let mut forces = Forces::none();
        if self.center {
            forces.center = Some(CenterForce::new(center.x, center.y));
        }
        if let Some(strength) = self.charge {
            forces.many_body = Some(ManyBodyForce::new().with_strength(strength));
        }
        if let Some(c) = &self.collide {
            let margin = c.radius_margin;
            forces.collide = Some(
                CollideForce::new()
                    .with_radius(NodeParam::computed(move |n| n.radius + margin))
                    .with_strength(c.strength)
                    .with_iterations(c.iterations),
            );
        }
        if let Some(l) = &self.link {
            forces.link = Some(
                LinkForce::new()
                    .with_distance(l.distance)
                    .with_iterations(l.iterations),
            );
        }
        if let Some(a) = &self.axis {
            forces.x = Some(AxisForce::new(Axis::X, center.x).with_strength(a.strength_x));
            forces.y = Some(AxisForce::new(Axis::Y, center.y).with_strength(a.strength_y));
        }
        forces
    }
}
