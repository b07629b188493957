//! Editing session: the object a host UI drives.
//!
//! A `Session` owns the graph store, the interaction controller, and the
//! host's scheduler. The host feeds it input events and toolbar commands,
//! then reads back a snapshot to render between events. Rejected edits do
//! not abort anything; they are queued as [`Notice`]s for the host to show.

use crate::commands::{CommandOutput, GraphCommand, execute};
use crate::controller::InteractionController;
use crate::input::InputEvent;
use crate::shortcuts::ShortcutMap;
use crate::timer::{ManualScheduler, Scheduler};
use gd_core::store::{GraphStore, Mode};
use gd_core::{
    DEFAULT_WEIGHT, EdgeId, ExportConfig, Graph, GraphDocument, GraphError, GraphResult, NodeId,
    export_graph, from_json,
};
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Duration;

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// How long a press on a node must be held before it becomes a drag.
    /// Default: **100 ms**.
    pub drag_delay_ms: u64,

    /// Weight of edges created by clicking. Default: **1**.
    pub default_weight: f64,

    /// Maximum queued notices; the oldest are dropped first. Default: **16**.
    pub notice_limit: usize,

    /// Options for `export_json`.
    pub export: ExportConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_delay_ms: 100,
            default_weight: DEFAULT_WEIGHT,
            notice_limit: 16,
            export: ExportConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn drag_delay(&self) -> Duration {
        Duration::from_millis(self.drag_delay_ms)
    }
}

// ─── Notices & views ──────────────────────────────────────────────────────

/// A rejected edit, for the host's notification layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub error: GraphError,
}

impl From<GraphError> for Notice {
    fn from(error: GraphError) -> Self {
        Self {
            message: error.to_string(),
            error,
        }
    }
}

/// Everything a renderer needs besides the graph itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView {
    pub selected_node: Option<NodeId>,
    pub selected_edge: Option<EdgeId>,
    pub dragging: bool,
    pub pointer: (f64, f64),
    /// Line from the armed node to the pointer, while connecting.
    pub pending_edge: Option<((f64, f64), (f64, f64))>,
    /// Edge whose weight editor is open.
    pub weight_editor: Option<EdgeId>,
}

// ─── Session ─────────────────────────────────────────────────────────────

pub struct Session<S: Scheduler> {
    store: GraphStore,
    controller: InteractionController,
    scheduler: S,
    config: EditorConfig,
    notices: VecDeque<Notice>,
}

impl Session<ManualScheduler> {
    /// A session whose timers are driven by [`Session::advance`].
    pub fn manual(config: EditorConfig) -> Self {
        Self::new(ManualScheduler::new(), config)
    }

    /// Advance the manual clock, delivering due timers. Returns whether
    /// the graph changed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let due = self.scheduler.advance(elapsed);
        due.into_iter().fold(false, |changed, token| {
            self.handle_input(InputEvent::TimerElapsed(token)) || changed
        })
    }
}

impl<S: Scheduler> Session<S> {
    pub fn new(scheduler: S, config: EditorConfig) -> Self {
        Self {
            store: GraphStore::new(),
            controller: InteractionController::new(&config),
            scheduler,
            config,
            notices: VecDeque::new(),
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route an input event through the controller and apply the resulting
    /// commands. Returns whether the graph changed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let commands = self.controller.handle(&event, &mut self.scheduler);
        let mut changed = false;
        for command in commands {
            match execute(&mut self.store, command) {
                Ok(_) => changed = true,
                Err(err) => self.notify(err),
            }
        }
        self.controller
            .sync_with(self.store.graph(), &mut self.scheduler);
        changed
    }

    /// Route a host key name through the shortcut map. Unbound keys are
    /// ignored.
    pub fn handle_key(&mut self, key: &str, cmd: bool) -> bool {
        match ShortcutMap::resolve(key, cmd) {
            Some(action) => self.handle_input(InputEvent::Key(action)),
            None => false,
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Apply a command directly (toolbar, menus). Failures are returned
    /// and also queued as a notice.
    pub fn execute(&mut self, command: GraphCommand) -> GraphResult<CommandOutput> {
        let result = execute(&mut self.store, command);
        match &result {
            Ok(_) => self
                .controller
                .sync_with(self.store.graph(), &mut self.scheduler),
            Err(err) => self.notify(err.clone()),
        }
        result
    }

    pub fn set_weighted(&mut self, value: bool) -> GraphResult<()> {
        self.execute(GraphCommand::SetMode {
            mode: Mode::Weighted,
            value,
        })
        .map(|_| ())
    }

    pub fn set_directed(&mut self, value: bool) -> GraphResult<()> {
        self.execute(GraphCommand::SetMode {
            mode: Mode::Directed,
            value,
        })
        .map(|_| ())
    }

    pub fn set_edge_weight(&mut self, id: EdgeId, w: f64) -> GraphResult<()> {
        self.execute(GraphCommand::SetEdgeWeight { id, w }).map(|_| ())
    }

    /// Write `w` to the edge whose weight editor is open and close it.
    /// Returns `Ok(false)` when no editor is open.
    pub fn submit_weight(&mut self, w: f64) -> GraphResult<bool> {
        let Some(id) = self.weight_editor() else {
            return Ok(false);
        };
        self.set_edge_weight(id, w)?;
        self.controller.close_weight_editor();
        Ok(true)
    }

    /// Close the weight editor without changing the weight.
    pub fn cancel_weight(&mut self) {
        self.controller.close_weight_editor();
    }

    /// Replace the graph with the one in `text`. On any error the current
    /// graph and selection are kept.
    pub fn import_json(&mut self, text: &str) -> GraphResult<()> {
        let graph = match from_json(text) {
            Ok(graph) => graph,
            Err(err) => {
                log::warn!("rejected import: {err}");
                self.notify(err.clone());
                return Err(err);
            }
        };
        self.execute(GraphCommand::Replace {
            graph: Box::new(graph),
        })?;
        self.controller.clear(&mut self.scheduler);
        Ok(())
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        self.store.export_json(&self.config.export)
    }

    /// Start over with a blank graph ("New").
    pub fn reset(&mut self) -> GraphResult<()> {
        self.execute(GraphCommand::Reset)?;
        self.controller.clear(&mut self.scheduler);
        log::debug!("session reset");
        Ok(())
    }

    /// The document handed back to the caller when editing is done.
    pub fn finish(&self) -> GraphDocument {
        export_graph(self.store.graph())
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn graph(&self) -> &Graph {
        self.store.graph()
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The open weight editor's edge. Only reported for weighted graphs.
    pub fn weight_editor(&self) -> Option<EdgeId> {
        self.controller
            .weight_editor()
            .filter(|_| self.store.graph().is_weighted)
    }

    /// Preview line from the armed node to the pointer.
    pub fn pending_edge(&self) -> Option<((f64, f64), (f64, f64))> {
        if self.controller.is_dragging() {
            return None;
        }
        let node = self.controller.selected_node()?;
        let from = self.store.graph().node(node)?.position();
        Some((from, self.controller.pointer()))
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            selected_node: self.controller.selected_node(),
            selected_edge: self.controller.selected_edge(),
            dragging: self.controller.is_dragging(),
            pointer: self.controller.pointer(),
            pending_edge: self.pending_edge(),
            weight_editor: self.weight_editor(),
        }
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify(&mut self, error: GraphError) {
        if self.config.notice_limit == 0 {
            return;
        }
        while self.notices.len() >= self.config.notice_limit {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice::from(error));
    }
}
