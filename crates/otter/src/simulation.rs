use crate::error::{Error, Result};
use crate::force::{Body, Forces, ResolvedLink, Vec2};
use crate::graph::{GraphData, LinkKey, LinkSpec, NodeId, NodeSpec, Point};
use crate::rng::XorShift64Star;
use crate::snapshot::{LinkPosition, NodePosition, Snapshot};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Spacing of the phyllotaxis spiral new nodes are spawned on.
const INITIAL_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationOptions {
    pub alpha: f64,
    pub alpha_min: f64,
    /// Per-tick decay; `None` derives the d3 default `1 - alpha_min^(1/300)`.
    pub alpha_decay: Option<f64>,
    pub alpha_target: f64,
    pub velocity_decay: f64,
    /// Alpha floor applied when an update changes the topology.
    pub reheat_alpha: f64,
    /// Pointer hit radius for drag and hover hit testing.
    pub hit_radius: f64,
    pub random_seed: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: None,
            alpha_target: 0.0,
            velocity_decay: 0.4,
            reheat_alpha: 0.3,
            hit_radius: 10.0,
            random_seed: 0,
        }
    }
}

impl SimulationOptions {
    pub fn resolved_alpha_decay(&self) -> f64 {
        self.alpha_decay
            .unwrap_or_else(|| 1.0 - self.alpha_min.powf(1.0 / 300.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Running,
    /// Alpha has decayed below `alpha_min`; ticking would no longer visibly move anything.
    Converged,
}

/// Physical state of one node, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    pub position: Point,
    pub velocity: Point,
    /// Effective pin: the transient drag pin, else the node's permanent pin.
    pub fixed: Option<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    pub links_added: usize,
    pub links_removed: usize,
    /// Link parameters (strength/visibility) changed for retained links.
    pub links_changed: usize,
}

impl UpdateReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.links_added == 0
            && self.links_removed == 0
            && self.links_changed == 0
    }
}

pub struct Simulation {
    options: SimulationOptions,
    alpha: f64,
    alpha_decay: f64,
    alpha_target: f64,
    forces: Forces,
    nodes: Vec<NodeSpec>,
    bodies: Vec<Body>,
    index: IndexMap<NodeId, usize>,
    links: Vec<LinkSpec>,
    resolved: Vec<ResolvedLink>,
    ticks: u64,
    spawned: usize,
    rng: XorShift64Star,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("alpha", &self.alpha)
            .field("alpha_target", &self.alpha_target)
            .field("nodes", &self.nodes.len())
            .field("links", &self.links.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}

fn to_vec(p: Point) -> Vec2 {
    Vec2::new(p.x, p.y)
}

fn to_point(v: Vec2) -> Point {
    Point::new(v.x, v.y)
}

impl Simulation {
    pub fn new(data: GraphData, forces: Forces, options: SimulationOptions) -> Result<Self> {
        data.validate()?;
        let mut sim = Self {
            alpha: options.alpha,
            alpha_decay: options.resolved_alpha_decay(),
            alpha_target: options.alpha_target,
            rng: XorShift64Star::new(options.random_seed),
            options,
            forces,
            nodes: Vec::new(),
            bodies: Vec::new(),
            index: IndexMap::new(),
            links: Vec::new(),
            resolved: Vec::new(),
            ticks: 0,
            spawned: 0,
        };
        sim.rebuild(data, FxHashMap::default())?;
        Ok(sim)
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_min(&self) -> f64 {
        self.options.alpha_min
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target;
    }

    /// Raises alpha to at least `floor`, resuming motion after convergence.
    pub fn reheat(&mut self, floor: f64) {
        if self.alpha < floor {
            tracing::debug!(from = self.alpha, to = floor, "reheating simulation");
            self.alpha = floor;
        }
    }

    pub fn state(&self) -> SimulationState {
        if self.alpha < self.options.alpha_min {
            SimulationState::Converged
        } else {
            SimulationState::Running
        }
    }

    /// Converged and not being pulled back up by a non-zero alpha target.
    pub fn is_idle(&self) -> bool {
        self.state() == SimulationState::Converged && self.alpha_target < self.options.alpha_min
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    pub fn links(&self) -> &[LinkSpec] {
        &self.links
    }

    pub fn forces(&self) -> &Forces {
        &self.forces
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<NodeState> {
        let &i = self.index.get(&id)?;
        let b = &self.bodies[i];
        Some(NodeState {
            position: to_point(b.pos),
            velocity: to_point(b.vel),
            fixed: b.fixed().map(to_point),
        })
    }

    /// Render position: the pin if any, else the free coordinates.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        let &i = self.index.get(&id)?;
        Some(to_point(self.bodies[i].visible_pos()))
    }

    /// Replaces the force set, re-evaluating every cached parameter.
    pub fn set_forces(&mut self, mut forces: Forces) -> Result<()> {
        forces.initialize(&self.nodes, &self.links, &self.resolved)?;
        self.forces = forces;
        Ok(())
    }

    /// Advances one integration step. A tick that would leave a non-finite position is
    /// discarded and the previous state kept.
    pub fn tick(&mut self) -> Result<()> {
        let alpha = self.alpha + (self.alpha_target - self.alpha) * self.alpha_decay;
        let mut bodies = self.bodies.clone();
        self.forces
            .apply(&mut bodies, &self.resolved, alpha, &mut self.rng);

        let keep = 1.0 - self.options.velocity_decay;
        for b in bodies.iter_mut() {
            match b.fixed() {
                Some(p) => {
                    b.pos = p;
                    b.vel = Vec2::zeros();
                }
                None => {
                    b.vel *= keep;
                    b.pos += b.vel;
                }
            }
        }

        if let Some(i) = bodies
            .iter()
            .position(|b| !(b.pos.x.is_finite() && b.pos.y.is_finite()))
        {
            return Err(Error::NonFinitePosition {
                id: self.nodes[i].id,
                tick: self.ticks + 1,
            });
        }
        self.alpha = alpha;
        self.bodies = bodies;
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, alpha = self.alpha, "tick");
        Ok(())
    }

    pub fn tick_n(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Fails with [`Error::NeverConverges`] when the alpha target keeps alpha at or above
    /// `alpha_min`.
    pub fn ensure_converges(&self) -> Result<()> {
        if self.alpha_target >= self.options.alpha_min {
            return Err(Error::NeverConverges {
                alpha_target: self.alpha_target,
                alpha_min: self.options.alpha_min,
            });
        }
        Ok(())
    }

    /// Ticks until alpha drops below `alpha_min`, returning the number of ticks taken.
    pub fn run_to_convergence(&mut self) -> Result<usize> {
        self.ensure_converges()?;
        let mut n = 0;
        while self.alpha >= self.options.alpha_min {
            self.tick()?;
            n += 1;
        }
        Ok(n)
    }

    /// Sets a transient pin that overrides physics until [`Simulation::unpin`].
    pub fn pin(&mut self, id: NodeId, at: Point) -> Result<()> {
        if !at.is_finite() {
            return Err(Error::NonFinite {
                subject: format!("node {id}"),
                field: "pin position",
            });
        }
        let i = self.idx(id)?;
        self.bodies[i].pin = Some(to_vec(at));
        Ok(())
    }

    /// Releases the transient pin; a permanent pin from `NodeSpec::fixed` stays in place.
    pub fn unpin(&mut self, id: NodeId) -> Result<()> {
        let i = self.idx(id)?;
        let b = &mut self.bodies[i];
        if let Some(p) = b.pin.take() {
            // Resume from where the pin held the node, not from the stale free position.
            b.pos = p;
            b.vel = Vec2::zeros();
        }
        Ok(())
    }

    /// Nearest node whose visible position lies within `radius` of `(x, y)`.
    pub fn find(&self, x: f64, y: f64, radius: f64) -> Option<NodeId> {
        let pointer = Vec2::new(x, y);
        let mut best: Option<(f64, NodeId)> = None;
        let limit = radius * radius;
        for (spec, b) in self.nodes.iter().zip(&self.bodies) {
            let d2 = (b.visible_pos() - pointer).norm_squared();
            if d2 < limit && best.is_none_or(|(bd, _)| d2 < bd) {
                best = Some((d2, spec.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Diffs `data` against the current topology by stable id.
    ///
    /// Retained nodes keep position and velocity exactly; new nodes are spawned; removed nodes
    /// are dropped with their state. On error nothing is modified.
    pub fn update(&mut self, data: GraphData) -> Result<UpdateReport> {
        data.validate()?;

        let mut report = UpdateReport::default();
        let mut retained: FxHashMap<NodeId, Body> = FxHashMap::default();
        let incoming: rustc_hash::FxHashSet<NodeId> = data.nodes.iter().map(|n| n.id).collect();
        for (spec, body) in self.nodes.iter().zip(&self.bodies) {
            if incoming.contains(&spec.id) {
                retained.insert(spec.id, *body);
            } else {
                report.removed.push(spec.id);
            }
        }
        report.added = data
            .nodes
            .iter()
            .filter(|n| !retained.contains_key(&n.id))
            .map(|n| n.id)
            .collect();

        let previous: FxHashMap<LinkKey, &LinkSpec> =
            self.links.iter().map(|l| (l.key(), l)).collect();
        for l in &data.links {
            match previous.get(&l.key()) {
                None => report.links_added += 1,
                Some(old) if *old != l => report.links_changed += 1,
                Some(_) => {}
            }
        }
        report.links_removed = self.links.len() + report.links_added - data.links.len();

        self.rebuild(data, retained)?;

        if !report.is_noop() {
            self.reheat(self.options.reheat_alpha);
        }
        tracing::debug!(
            added = report.added.len(),
            removed = report.removed.len(),
            links_added = report.links_added,
            links_removed = report.links_removed,
            links_changed = report.links_changed,
            "simulation updated"
        );
        Ok(report)
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut nodes = IndexMap::with_capacity(self.nodes.len());
        for (spec, b) in self.nodes.iter().zip(&self.bodies) {
            let p = b.visible_pos();
            nodes.insert(spec.id, NodePosition { x: p.x, y: p.y });
        }
        let mut links = IndexMap::with_capacity(self.links.len());
        for (spec, r) in self.links.iter().zip(&self.resolved) {
            let s = self.bodies[r.source].visible_pos();
            let t = self.bodies[r.target].visible_pos();
            links.insert(
                spec.key(),
                LinkPosition {
                    x1: s.x,
                    y1: s.y,
                    x2: t.x,
                    y2: t.y,
                    visible: spec.visible,
                },
            );
        }
        Snapshot {
            tick: self.ticks,
            alpha: self.alpha,
            nodes,
            links,
        }
    }

    fn idx(&self, id: NodeId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(Error::UnknownNode { id })
    }

    /// Installs a validated graph, reusing `retained` bodies by id.
    fn rebuild(&mut self, data: GraphData, mut retained: FxHashMap<NodeId, Body>) -> Result<()> {
        let origin = to_vec(self.forces.origin());
        let mut bodies = Vec::with_capacity(data.nodes.len());
        let mut index = IndexMap::with_capacity(data.nodes.len());
        let mut spawned = self.spawned;
        for (i, spec) in data.nodes.iter().enumerate() {
            let anchor = spec.fixed.map(to_vec);
            let body = match retained.remove(&spec.id) {
                Some(mut b) => {
                    b.anchor = anchor;
                    b
                }
                None => {
                    let pos = anchor.unwrap_or_else(|| origin + phyllotaxis(spawned));
                    spawned += 1;
                    Body {
                        pos,
                        vel: Vec2::zeros(),
                        pin: None,
                        anchor,
                    }
                }
            };
            bodies.push(body);
            index.insert(spec.id, i);
        }

        let resolved: Vec<ResolvedLink> = data
            .links
            .iter()
            .map(|l| ResolvedLink {
                source: index[&l.source],
                target: index[&l.target],
            })
            .collect();

        // Nothing is committed until every force parameter has evaluated.
        let mut forces = self.forces.clone();
        forces.initialize(&data.nodes, &data.links, &resolved)?;

        self.forces = forces;
        self.nodes = data.nodes;
        self.links = data.links;
        self.bodies = bodies;
        self.index = index;
        self.resolved = resolved;
        self.spawned = spawned;
        Ok(())
    }
}

/// `i`-th point of a golden-angle spiral: evenly spread, no two slots coincide.
fn phyllotaxis(i: usize) -> Vec2 {
    let angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
    let a = i as f64 * angle;
    Vec2::new(r * a.cos(), r * a.sin())
}
