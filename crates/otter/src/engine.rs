//! Frame-paced driver around a [`Simulation`].
//!
//! The engine steps physics whenever the host asks and publishes at most one [`Snapshot`] per
//! display frame. Frames are requested from a [`FrameScheduler`]; a publication only happens
//! for the frame id that is currently pending, and every superseding update or teardown
//! cancels it. Consuming [`Engine::dispose`] (or dropping the engine) is the only way to detach,
//! so a stale frame can never reach a disposed simulation.

use crate::drag::DragState;
use crate::error::Result;
use crate::force::Forces;
use crate::graph::{GraphData, NodeId};
use crate::simulation::{Simulation, SimulationOptions, UpdateReport};
use crate::snapshot::Snapshot;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Host frame-pacing primitive: one callback per display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

#[derive(Debug, Default)]
struct FrameQueue {
    next: u64,
    due: Vec<FrameId>,
    cancelled: usize,
}

/// Queue-backed scheduler for hosts that pump frames themselves.
///
/// Clones share one queue, so the host can keep a handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<FrameQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the frames that are due, in request order.
    pub fn take_due(&self) -> Vec<FrameId> {
        std::mem::take(&mut self.queue.borrow_mut().due)
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().due.len()
    }

    pub fn cancelled(&self) -> usize {
        self.queue.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameId {
        let mut q = self.queue.borrow_mut();
        q.next += 1;
        let id = FrameId(q.next);
        q.due.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let mut q = self.queue.borrow_mut();
        let before = q.due.len();
        q.due.retain(|f| *f != id);
        if q.due.len() != before {
            q.cancelled += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Ticked,
    /// Nothing moved: the simulation is idle until reheated.
    Converged,
}

type Publisher = Box<dyn FnMut(&Snapshot)>;

pub struct Engine<S: FrameScheduler> {
    sim: Simulation,
    scheduler: S,
    publisher: Option<Publisher>,
    pending: Option<FrameId>,
    drag: DragState,
    published: u64,
}

impl<S: FrameScheduler> std::fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("sim", &self.sim)
            .field("pending", &self.pending)
            .field("published", &self.published)
            .finish()
    }
}

impl<S: FrameScheduler> Engine<S> {
    /// Builds the simulation and attaches `publisher`; the first frame is requested right away.
    pub fn create(
        data: GraphData,
        forces: Forces,
        options: SimulationOptions,
        scheduler: S,
        publisher: impl FnMut(&Snapshot) + 'static,
    ) -> Result<Self> {
        let sim = Simulation::new(data, forces, options)?;
        tracing::debug!(
            nodes = sim.len(),
            links = sim.links().len(),
            "layout engine created"
        );
        let mut engine = Self {
            sim,
            scheduler,
            publisher: Some(Box::new(publisher)),
            pending: None,
            drag: DragState::default(),
            published: 0,
        };
        engine.schedule();
        Ok(engine)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// One physics tick, unless the simulation is idle. Requests a publish frame if none is
    /// pending; several steps may run before that frame fires.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.sim.is_idle() {
            return Ok(StepOutcome::Converged);
        }
        self.sim.tick()?;
        self.schedule();
        Ok(StepOutcome::Ticked)
    }

    /// Frame callback: publishes the latest positions if `id` is the pending frame.
    pub fn on_frame(&mut self, id: FrameId) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        let Some(publish) = self.publisher.as_mut() else {
            return false;
        };
        publish(&self.sim.snapshot());
        self.published += 1;
        true
    }

    /// Resynchronizes the topology in place; any pending frame is superseded.
    pub fn update(&mut self, data: GraphData) -> Result<UpdateReport> {
        let report = self.sim.update(data)?;
        self.drag.retain_live(&mut self.sim);
        self.cancel_pending();
        self.schedule();
        Ok(report)
    }

    pub fn set_forces(&mut self, forces: Forces) -> Result<()> {
        self.sim.set_forces(forces)?;
        self.sim.reheat(self.sim.options().reheat_alpha);
        self.schedule();
        Ok(())
    }

    pub fn drag_start(&mut self, x: f64, y: f64) -> Result<Option<NodeId>> {
        let id = self.drag.start(&mut self.sim, x, y)?;
        if id.is_some() {
            self.schedule();
        }
        Ok(id)
    }

    pub fn drag_move(&mut self, x: f64, y: f64) -> Result<Option<NodeId>> {
        let id = self.drag.move_to(&mut self.sim, x, y)?;
        if self.drag.dragging().is_some() {
            self.schedule();
        }
        Ok(id)
    }

    pub fn drag_end(&mut self) -> Result<Option<NodeId>> {
        self.drag.end(&mut self.sim)
    }

    pub fn hover(&mut self, x: f64, y: f64) -> Option<NodeId> {
        self.drag.hover(&self.sim, x, y)
    }

    /// Detaches the tick listener and cancels any in-flight publish.
    pub fn dispose(mut self) {
        self.teardown();
    }

    fn schedule(&mut self) {
        if self.publisher.is_some() && self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
    }

    fn teardown(&mut self) {
        if self.publisher.take().is_none() {
            return;
        }
        self.cancel_pending();
        tracing::debug!(
            ticks = self.sim.ticks(),
            published = self.published,
            "layout engine disposed"
        );
    }
}

impl<S: FrameScheduler> Drop for Engine<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Engine<ManualScheduler> {
    /// Steps once and fires every frame that is due.
    pub fn advance_frame(&mut self) -> Result<StepOutcome> {
        let outcome = self.step()?;
        for id in self.scheduler.take_due() {
            self.on_frame(id);
        }
        Ok(outcome)
    }

    /// Fixed-rate loop: one step and one frame per `interval` until the simulation is idle.
    /// Returns the number of frames advanced. Refuses to start when the alpha target would
    /// keep the simulation running forever.
    pub fn run_paced(&mut self, interval: Duration) -> Result<usize> {
        self.sim.ensure_converges()?;
        let mut frames = 0;
        loop {
            let started = Instant::now();
            if self.advance_frame()? == StepOutcome::Converged {
                return Ok(frames);
            }
            frames += 1;
            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }
}
