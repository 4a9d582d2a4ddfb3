use super::{Body, NodeParam};
use crate::error::Result;
use crate::graph::NodeSpec;
use crate::rng::XorShift64Star;

/// Pairwise charge between every node pair. Negative strength repels.
///
/// Exact O(n²) summation; the graphs this drives are tens to low hundreds of nodes.
#[derive(Debug, Clone)]
pub struct ManyBodyForce {
    pub strength: NodeParam,
    pub distance_min: f64,
    pub distance_max: f64,
    strengths: Vec<f64>,
}

impl Default for ManyBodyForce {
    fn default() -> Self {
        Self::new()
    }
}

impl ManyBodyForce {
    pub const DEFAULT_STRENGTH: f64 = -30.0;

    pub fn new() -> Self {
        Self {
            strength: NodeParam::Constant(Self::DEFAULT_STRENGTH),
            distance_min: 1.0,
            distance_max: f64::INFINITY,
            strengths: Vec::new(),
        }
    }

    pub fn with_strength(mut self, strength: impl Into<NodeParam>) -> Self {
        self.strength = strength.into();
        self
    }

    pub fn with_distance_range(mut self, min: f64, max: f64) -> Self {
        self.distance_min = min;
        self.distance_max = max;
        self
    }

    pub(crate) fn initialize(&mut self, nodes: &[NodeSpec]) -> Result<()> {
        self.strengths = self.strength.eval_all(nodes, "many-body strength")?;
        Ok(())
    }

    pub(crate) fn apply(&self, bodies: &mut [Body], alpha: f64, rng: &mut XorShift64Star) {
        let min2 = self.distance_min * self.distance_min;
        let max2 = self.distance_max * self.distance_max;
        for i in 0..bodies.len() {
            let pi = bodies[i].pos;
            let mut dv = super::Vec2::zeros();
            for (j, other) in bodies.iter().enumerate() {
                if i == j {
                    continue;
                }
                let mut d = other.pos - pi;
                let mut l = d.norm_squared();
                if l >= max2 {
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
                if l < min2 {
                    l = (min2 * l).sqrt();
                }
                dv += d * (self.strengths[j] * alpha / l);
            }
            bodies[i].vel += dv;
        }
    }
}
