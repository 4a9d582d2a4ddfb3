#![forbid(unsafe_code)]

//! Headless force-directed graph layout.
//!
//! `otter` owns the physics of a node/link graph (repulsion, collision, link springs, centering
//! and per-axis forces under a decaying alpha), keeps that state stable across topology updates
//! by diffing stable ids, and emits position snapshots. It never draws.

pub mod drag;
pub mod engine;
pub mod error;
pub mod force;
pub mod graph;
pub mod rng;
pub mod simulation;
pub mod snapshot;

pub use drag::{DRAG_ALPHA_TARGET, DragState};
pub use engine::{Engine, FrameId, FrameScheduler, ManualScheduler, StepOutcome};
pub use error::{Error, Result};
pub use force::{
    Axis, AxisForce, AxisOptions, CenterForce, CollideForce, CollideOptions, ForceOptions, Forces,
    LinkForce, LinkOptions, LinkParam, ManyBodyForce, NodeParam, Param,
};
pub use graph::{GraphData, LinkKey, LinkSpec, NodeId, NodeSpec, Point};
pub use simulation::{NodeState, Simulation, SimulationOptions, SimulationState, UpdateReport};
pub use snapshot::{LinkPosition, NodePosition, Snapshot};

/// Non-animated layout: builds a simulation, ticks it to convergence and returns the final
/// snapshot.
pub fn layout(data: GraphData, forces: Forces, options: SimulationOptions) -> Result<Snapshot> {
    let mut sim = Simulation::new(data, forces, options)?;
    sim.run_to_convergence()?;
    Ok(sim.snapshot())
}
