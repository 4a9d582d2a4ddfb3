use crate::error::Result;
use crate::graph::{NodeId, Point};
use crate::simulation::Simulation;

/// Alpha target held while a node is being dragged, keeping the layout visibly live.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Pointer gesture state: which node (if any) is held, and which is hovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    dragging: Option<NodeId>,
    hovered: Option<NodeId>,
}

impl DragState {
    pub fn dragging(&self) -> Option<NodeId> {
        self.dragging
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Grabs the node under the pointer, pins it there and reheats the simulation.
    pub fn start(&mut self, sim: &mut Simulation, x: f64, y: f64) -> Result<Option<NodeId>> {
        let Some(id) = sim.find(x, y, sim.options().hit_radius) else {
            return Ok(None);
        };
        sim.pin(id, Point::new(x, y))?;
        sim.set_alpha_target(DRAG_ALPHA_TARGET);
        self.dragging = Some(id);
        self.hovered = None;
        Ok(Some(id))
    }

    /// Moves the held node's pin with the pointer, or updates hover when nothing is held.
    pub fn move_to(&mut self, sim: &mut Simulation, x: f64, y: f64) -> Result<Option<NodeId>> {
        match self.dragging {
            Some(id) => {
                sim.pin(id, Point::new(x, y))?;
                Ok(Some(id))
            }
            None => Ok(self.hover(sim, x, y)),
        }
    }

    /// Records the node under the pointer. Nothing is hovered while a drag is in progress.
    pub fn hover(&mut self, sim: &Simulation, x: f64, y: f64) -> Option<NodeId> {
        self.hovered = match self.dragging {
            Some(_) => None,
            None => sim.find(x, y, sim.options().hit_radius),
        };
        self.hovered
    }

    /// Releases the held node back to the simulation and lets alpha decay again.
    pub fn end(&mut self, sim: &mut Simulation) -> Result<Option<NodeId>> {
        sim.set_alpha_target(0.0);
        let Some(id) = self.dragging.take() else {
            return Ok(None);
        };
        // The node may have been removed by an update mid-gesture.
        if sim.contains(id) {
            sim.unpin(id)?;
        }
        Ok(Some(id))
    }

    /// Forgets nodes that no longer exist after a topology update.
    pub(crate) fn retain_live(&mut self, sim: &mut Simulation) {
        if self.dragging.is_some_and(|id| !sim.contains(id)) {
            self.dragging = None;
            sim.set_alpha_target(0.0);
        }
        if self.hovered.is_some_and(|id| !sim.contains(id)) {
            self.hovered = None;
        }
    }
}
