use super::{Body, NodeParam};
use crate::error::Result;
use crate::graph::NodeSpec;
use crate::rng::XorShift64Star;

/// Pushes overlapping nodes apart to their non-overlapping separation.
///
/// Overlap is measured on predicted positions (`pos + vel`) and the correction is split between
/// the pair by squared radius, so small nodes yield to large ones.
#[derive(Debug, Clone)]
pub struct CollideForce {
    pub radius: NodeParam,
    pub strength: f64,
    pub iterations: usize,
    radii: Vec<f64>,
}

impl Default for CollideForce {
    fn default() -> Self {
        Self::new()
    }
}

impl CollideForce {
    pub fn new() -> Self {
        Self {
            radius: NodeParam::computed(|n| n.radius),
            strength: 1.0,
            iterations: 1,
            radii: Vec::new(),
        }
    }

    pub fn with_radius(mut self, radius: impl Into<NodeParam>) -> Self {
        self.radius = radius.into();
        self
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub(crate) fn initialize(&mut self, nodes: &[NodeSpec]) -> Result<()> {
        self.radii = self.radius.eval_all(nodes, "collision radius")?;
        Ok(())
    }

    pub(crate) fn apply(&self, bodies: &mut [Body], rng: &mut XorShift64Star) {
        let n = bodies.len();
        for _ in 0..self.iterations {
            for i in 0..n {
                let ri = self.radii[i];
                let ri2 = ri * ri;
                let pi = bodies[i].pos + bodies[i].vel;
                for j in (i + 1)..n {
                    let rj = self.radii[j];
                    let r = ri + rj;
                    let pj = bodies[j].pos + bodies[j].vel;
                    let mut d = pi - pj;
                    let mut l = d.norm_squared();
                    if l >= r * r {
                        continue;
                    }
                    if d.x == 0.0 {
                        d.x = rng.jiggle();
                        l += d.x * d.x;
                    }
                    if d.y == 0.0 {
                        d.y = rng.jiggle();
                        l += d.y * d.y;
                    }
                    let len = l.sqrt();
                    d *= (r - len) / len * self.strength;
                    let rj2 = rj * rj;
                    let share = rj2 / (ri2 + rj2);
                    bodies[i].vel += d * share;
                    bodies[j].vel -= d * (1.0 - share);
                }
            }
        }
    }
}
