use super::{Body, NodeParam};
use crate::error::Result;
use crate::graph::NodeSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Single-axis centering: nudges each node's velocity toward `target` on one axis.
#[derive(Debug, Clone)]
pub struct AxisForce {
    pub axis: Axis,
    pub target: NodeParam,
    pub strength: NodeParam,
    targets: Vec<f64>,
    strengths: Vec<f64>,
}

impl AxisForce {
    pub const DEFAULT_STRENGTH: f64 = 0.1;

    pub fn new(axis: Axis, target: f64) -> Self {
        Self {
            axis,
            target: NodeParam::Constant(target),
            strength: NodeParam::Constant(Self::DEFAULT_STRENGTH),
            targets: Vec::new(),
            strengths: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<NodeParam>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_strength(mut self, strength: impl Into<NodeParam>) -> Self {
        self.strength = strength.into();
        self
    }

    pub(crate) fn initialize(&mut self, nodes: &[NodeSpec]) -> Result<()> {
        let targets = self.target.eval_all(nodes, "axis target")?;
        self.strengths = self.strength.eval_all(nodes, "axis strength")?;
        self.targets = targets;
        Ok(())
    }

    pub(crate) fn apply(&self, bodies: &mut [Body], alpha: f64) {
        for (i, b) in bodies.iter_mut().enumerate() {
            let k = self.strengths[i] * alpha;
            match self.axis {
                Axis::X => b.vel.x += (self.targets[i] - b.pos.x) * k,
                Axis::Y => b.vel.y += (self.targets[i] - b.pos.y) * k,
            }
        }
    }
}
