//! Pointer interaction state machine.
//!
//! Translates input events into `GraphCommand`s, the way a canvas tool
//! does, and tracks what is selected.
//!
//! | State        | Event                    | Effect                                   |
//! |--------------|--------------------------|------------------------------------------|
//! | `Idle`       | press on canvas          | add node                                 |
//! | armed        | press on canvas          | clear selection                          |
//! | any          | press on node            | arm drag timer → `Pressed`               |
//! | `Pressed`    | timer elapsed            | → `Dragging`                             |
//! | `Pressed`    | release                  | click: arm node, or connect armed → node |
//! | `Dragging`   | move                     | move node                                |
//! | `Dragging`   | release                  | → `Idle`                                 |
//! | any          | press on edge            | → `EdgeArmed` (double click edits weight)|
//! | any          | Escape                   | → `Idle`                                 |
//! | any          | Delete                   | delete selection → `Idle`                |
//!
//! Click and drag are told apart by time only: a release before the drag
//! delay is a click, a press still held when it elapses starts a drag.

use crate::commands::GraphCommand;
use crate::input::{ClickCount, InputEvent};
use crate::session::EditorConfig;
use crate::shortcuts::KeyAction;
use crate::timer::{DragTimer, Scheduler, TimerToken};
use gd_core::{EdgeId, Graph, NodeId};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    /// Nothing selected.
    Idle,
    /// A node was clicked and waits for a second click to connect it.
    NodeArmed { node: NodeId },
    /// Pointer is down on `node` and the drag timer is running. `armed` is
    /// the node that was armed before this press, if any.
    Pressed {
        node: NodeId,
        armed: Option<NodeId>,
    },
    /// `node` follows the pointer until release.
    Dragging { node: NodeId },
    /// An edge is selected; `editing_weight` after a double click.
    EdgeArmed { edge: EdgeId, editing_weight: bool },
}

pub struct InteractionController {
    state: InteractionState,
    timer: DragTimer,
    drag_delay: Duration,
    default_weight: f64,
    /// Last pointer position, for the pending-edge preview.
    pointer: (f64, f64),
}

impl InteractionController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            timer: DragTimer::new(),
            drag_delay: config.drag_delay(),
            default_weight: config.default_weight,
            pointer: (0.0, 0.0),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// The armed node. While a press is pending this is the previously
    /// armed node if there is one, else the pressed node.
    pub fn selected_node(&self) -> Option<NodeId> {
        match self.state {
            InteractionState::NodeArmed { node } | InteractionState::Dragging { node } => {
                Some(node)
            }
            InteractionState::Pressed { node, armed } => Some(armed.unwrap_or(node)),
            InteractionState::Idle | InteractionState::EdgeArmed { .. } => None,
        }
    }

    pub fn selected_edge(&self) -> Option<EdgeId> {
        match self.state {
            InteractionState::EdgeArmed { edge, .. } => Some(edge),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging { .. })
    }

    /// The edge whose weight editor is open, if any.
    pub fn weight_editor(&self) -> Option<EdgeId> {
        match self.state {
            InteractionState::EdgeArmed {
                edge,
                editing_weight: true,
            } => Some(edge),
            _ => None,
        }
    }

    pub fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    /// Whether a drag-disambiguation countdown is outstanding.
    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Handle one input event, returning the commands it implies.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        scheduler: &mut dyn Scheduler,
    ) -> Vec<GraphCommand> {
        if let Some(pos) = event.position() {
            self.pointer = pos;
        }
        let commands = match *event {
            InputEvent::PointerDown { x, y } => {
                // Decided before the gesture is abandoned, which may itself
                // drop to Idle.
                let had_selection = self.state != InteractionState::Idle;
                self.abandon_gesture(scheduler);
                self.state = InteractionState::Idle;
                if had_selection {
                    vec![]
                } else {
                    vec![GraphCommand::AddNode { x, y }]
                }
            }
            InputEvent::PointerDownOnNode { id } => {
                self.abandon_gesture(scheduler);
                let armed = match self.state {
                    InteractionState::NodeArmed { node } => Some(node),
                    _ => None,
                };
                self.timer.arm(scheduler, self.drag_delay);
                self.state = InteractionState::Pressed { node: id, armed };
                vec![]
            }
            InputEvent::PointerDownOnEdge { id, clicks } => {
                self.abandon_gesture(scheduler);
                let was_editing = self.weight_editor() == Some(id);
                self.state = InteractionState::EdgeArmed {
                    edge: id,
                    editing_weight: was_editing || clicks == ClickCount::Double,
                };
                vec![]
            }
            InputEvent::PointerMove { x, y } => match self.state {
                InteractionState::Dragging { node } => {
                    vec![GraphCommand::MoveNode { id: node, x, y }]
                }
                _ => vec![],
            },
            InputEvent::PointerUp => self.release(scheduler),
            InputEvent::Key(KeyAction::Deselect) => {
                self.clear(scheduler);
                vec![]
            }
            InputEvent::Key(KeyAction::Delete) => {
                let commands = match (self.selected_edge(), self.selected_node()) {
                    (Some(id), _) => vec![GraphCommand::DeleteEdge { id }],
                    (None, Some(id)) => vec![GraphCommand::DeleteNode { id }],
                    (None, None) => vec![],
                };
                self.clear(scheduler);
                commands
            }
            InputEvent::TimerElapsed(token) => {
                self.timer_elapsed(token);
                vec![]
            }
        };
        log::trace!("{event:?} -> {:?}", self.state);
        commands
    }

    fn release(&mut self, scheduler: &mut dyn Scheduler) -> Vec<GraphCommand> {
        match self.state {
            InteractionState::Pressed { node, armed } => {
                self.timer.cancel(scheduler);
                match armed {
                    None => {
                        self.state = InteractionState::NodeArmed { node };
                        vec![]
                    }
                    Some(from) => {
                        // Cleared whether or not the edge is accepted.
                        self.state = InteractionState::Idle;
                        vec![GraphCommand::AddEdge {
                            u: from,
                            v: node,
                            w: self.default_weight,
                        }]
                    }
                }
            }
            InteractionState::Dragging { .. } => {
                self.state = InteractionState::Idle;
                vec![]
            }
            _ => vec![],
        }
    }

    fn timer_elapsed(&mut self, token: TimerToken) {
        if !self.timer.fire(token) {
            log::trace!("ignoring stale timer {token:?}");
            return;
        }
        if let InteractionState::Pressed { node, .. } = self.state {
            self.state = InteractionState::Dragging { node };
        }
    }

    /// A new press arrived while a previous one was never released. The
    /// earlier press counts as neither click nor drag.
    fn abandon_gesture(&mut self, scheduler: &mut dyn Scheduler) {
        match self.state {
            InteractionState::Pressed { armed, .. } => {
                self.timer.cancel(scheduler);
                self.state = armed.map_or(InteractionState::Idle, |node| {
                    InteractionState::NodeArmed { node }
                });
            }
            InteractionState::Dragging { .. } => self.state = InteractionState::Idle,
            _ => {}
        }
    }

    /// Drop all selection and any pending timer.
    pub fn clear(&mut self, scheduler: &mut dyn Scheduler) {
        self.timer.cancel(scheduler);
        self.state = InteractionState::Idle;
    }

    /// Close the weight editor, keeping nothing selected.
    pub fn close_weight_editor(&mut self) {
        if self.weight_editor().is_some() {
            self.state = InteractionState::Idle;
        }
    }

    /// Drop selections that refer to ids no longer in `graph`.
    pub fn sync_with(&mut self, graph: &Graph, scheduler: &mut dyn Scheduler) {
        let stale_node = match self.state {
            InteractionState::NodeArmed { node } | InteractionState::Dragging { node } => {
                graph.node(node).is_none()
            }
            InteractionState::Pressed { node, armed } => {
                graph.node(node).is_none() || armed.is_some_and(|a| graph.node(a).is_none())
            }
            _ => false,
        };
        let stale_edge = self
            .selected_edge()
            .is_some_and(|edge| graph.edge(edge).is_none());
        if stale_node || stale_edge {
            log::debug!("selection {:?} no longer in graph", self.state);
            self.clear(scheduler);
        }
    }
}
