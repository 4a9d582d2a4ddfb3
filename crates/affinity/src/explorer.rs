//! Session plus live layout: every action reprojects the graph and updates the engine in place.

use crate::error::{Error, Result};
use crate::graph::{self, GraphOptions};
use affinity_core::{Action, Session};
use otter::{
    Engine, ForceOptions, ManualScheduler, NodeId, SimulationOptions, Snapshot, StepOutcome,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplorerOptions {
    pub graph: GraphOptions,
    pub forces: ForceOptions,
    pub simulation: SimulationOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Ready,
    /// The session cannot be laid out; no engine exists until a later action fixes it.
    Failed(String),
}

#[derive(Debug, Default)]
struct Published {
    latest: Option<Snapshot>,
    count: u64,
}

pub struct Explorer {
    session: Session,
    options: ExplorerOptions,
    scheduler: ManualScheduler,
    engine: Option<Engine<ManualScheduler>>,
    published: Rc<RefCell<Published>>,
    status: ViewStatus,
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("status", &self.status)
            .field("engine", &self.engine)
            .finish()
    }
}

impl Explorer {
    pub fn new(session: Session, options: ExplorerOptions) -> Self {
        let mut explorer = Self {
            session,
            options,
            scheduler: ManualScheduler::new(),
            engine: None,
            published: Rc::default(),
            status: ViewStatus::Ready,
        };
        explorer.sync();
        explorer
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn engine(&self) -> Option<&Engine<ManualScheduler>> {
        self.engine.as_ref()
    }

    pub fn scheduler(&self) -> &ManualScheduler {
        &self.scheduler
    }

    /// Most recently published snapshot, if any frame has fired.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.published.borrow().latest.clone()
    }

    pub fn frames_published(&self) -> u64 {
        self.published.borrow().count
    }

    /// Applies `action` to the session, then brings the layout up to date.
    ///
    /// An invalid action is returned as an error and changes nothing. A valid action that
    /// leaves the session unscorable moves the view to [`ViewStatus::Failed`] instead.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        self.session.dispatch(action)?;
        self.sync();
        Ok(())
    }

    /// One physics step and its frame; `None` while the view has failed.
    pub fn advance_frame(&mut self) -> Result<Option<StepOutcome>> {
        match self.engine.as_mut() {
            Some(engine) => Ok(Some(engine.advance_frame()?)),
            None => Ok(None),
        }
    }

    pub fn drag_start(&mut self, x: f64, y: f64) -> Result<Option<NodeId>> {
        match self.engine.as_mut() {
            Some(engine) => Ok(engine.drag_start(x, y)?),
            None => Ok(None),
        }
    }

    pub fn drag_move(&mut self, x: f64, y: f64) -> Result<Option<NodeId>> {
        match self.engine.as_mut() {
            Some(engine) => Ok(engine.drag_move(x, y)?),
            None => Ok(None),
        }
    }

    pub fn drag_end(&mut self) -> Result<Option<NodeId>> {
        match self.engine.as_mut() {
            Some(engine) => Ok(engine.drag_end()?),
            None => Ok(None),
        }
    }

    pub fn hover(&mut self, x: f64, y: f64) -> Option<NodeId> {
        self.engine.as_mut()?.hover(x, y)
    }

    fn sync(&mut self) {
        match self.refresh() {
            Ok(()) => self.status = ViewStatus::Ready,
            Err(err) => self.fail(err),
        }
    }

    fn refresh(&mut self) -> Result<()> {
        let data = graph::project(&self.session, &self.options.graph)?;
        if let Some(engine) = self.engine.as_mut() {
            engine.update(data)?;
            return Ok(());
        }
        let published = Rc::clone(&self.published);
        let engine = Engine::create(
            data,
            self.options.graph.forces(&self.options.forces),
            self.options.simulation.clone(),
            self.scheduler.clone(),
            move |snapshot: &Snapshot| {
                let mut p = published.borrow_mut();
                p.latest = Some(snapshot.clone());
                p.count += 1;
            },
        )?;
        self.engine = Some(engine);
        Ok(())
    }

    fn fail(&mut self, err: Error) {
        tracing::warn!(%err, "layout unavailable");
        if let Some(engine) = self.engine.take() {
            engine.dispose();
        }
        self.published.borrow_mut().latest = None;
        self.status = ViewStatus::Failed(err.to_string());
    }
}
