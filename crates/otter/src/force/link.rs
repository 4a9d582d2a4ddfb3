use super::{Body, LinkParam, ResolvedLink};
use crate::error::{Error, Result};
use crate::graph::{LinkSpec, NodeSpec};
use crate::rng::XorShift64Star;

/// Spring between linked nodes, relaxing each link toward its rest `distance`.
///
/// `strength` defaults to the link's own [`LinkSpec::strength`]. The correction is split by
/// endpoint degree so hubs move less than leaves.
#[derive(Debug, Clone)]
pub struct LinkForce {
    pub distance: LinkParam,
    pub strength: LinkParam,
    pub iterations: usize,
    distances: Vec<f64>,
    strengths: Vec<f64>,
    bias: Vec<f64>,
}

impl Default for LinkForce {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkForce {
    pub const DEFAULT_DISTANCE: f64 = 30.0;

    pub fn new() -> Self {
        Self {
            distance: LinkParam::Constant(Self::DEFAULT_DISTANCE),
            strength: LinkParam::computed(|link, _, _| link.strength),
            iterations: 1,
            distances: Vec::new(),
            strengths: Vec::new(),
            bias: Vec::new(),
        }
    }

    pub fn with_distance(mut self, distance: impl Into<LinkParam>) -> Self {
        self.distance = distance.into();
        self
    }

    pub fn with_strength(mut self, strength: impl Into<LinkParam>) -> Self {
        self.strength = strength.into();
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Rest length cached for the `idx`-th link.
    pub fn rest_distance(&self, idx: usize) -> Option<f64> {
        self.distances.get(idx).copied()
    }

    pub(crate) fn initialize(
        &mut self,
        nodes: &[NodeSpec],
        links: &[LinkSpec],
        resolved: &[ResolvedLink],
    ) -> Result<()> {
        let mut degree = vec![0usize; nodes.len()];
        for r in resolved {
            degree[r.source] += 1;
            degree[r.target] += 1;
        }

        self.distances.clear();
        self.strengths.clear();
        self.bias.clear();
        for (link, r) in links.iter().zip(resolved) {
            let (s, t) = (&nodes[r.source], &nodes[r.target]);
            let distance = self.distance.eval(link, s, t);
            let strength = self.strength.eval(link, s, t);
            for (value, field) in [(distance, "link distance"), (strength, "link strength")] {
                if !value.is_finite() {
                    return Err(Error::NonFinite {
                        subject: format!("link {}", link.key()),
                        field,
                    });
                }
            }
            self.distances.push(distance);
            self.strengths.push(strength);
            let (ds, dt) = (degree[r.source] as f64, degree[r.target] as f64);
            self.bias.push(ds / (ds + dt));
        }
        Ok(())
    }

    pub(crate) fn apply(
        &self,
        bodies: &mut [Body],
        resolved: &[ResolvedLink],
        alpha: f64,
        rng: &mut XorShift64Star,
    ) {
        for _ in 0..self.iterations {
            for (k, r) in resolved.iter().enumerate() {
                let (s, t) = (r.source, r.target);
                let mut d = (bodies[t].pos + bodies[t].vel) - (bodies[s].pos + bodies[s].vel);
                if d.x == 0.0 {
                    d.x = rng.jiggle();
                }
                if d.y == 0.0 {
                    d.y = rng.jiggle();
                }
                let len = d.norm();
                d *= (len - self.distances[k]) / len * alpha * self.strengths[k];
                let b = self.bias[k];
                bodies[t].vel -= d * b;
                bodies[s].vel += d * (1.0 - b);
            }
        }
    }
}
