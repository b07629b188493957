//! Input abstraction layer.
//!
//! The host UI hit-tests pointer events against its rendered shapes and
//! translates coordinates into canvas space before building an
//! `InputEvent`. The controller never sees raw DOM or window events.

use crate::shortcuts::KeyAction;
use crate::timer::TimerToken;
use gd_core::{EdgeId, NodeId};

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on empty canvas.
    PointerDown { x: f64, y: f64 },

    /// Pointer pressed on a node.
    PointerDownOnNode { id: NodeId },

    /// Pointer pressed on an edge.
    PointerDownOnEdge { id: EdgeId, clicks: ClickCount },

    /// Pointer moved over the canvas.
    PointerMove { x: f64, y: f64 },

    /// Pointer released anywhere.
    PointerUp,

    /// A key with an editor binding.
    Key(KeyAction),

    /// A timer previously requested through the `Scheduler` has elapsed.
    TimerElapsed(TimerToken),
}

/// Single or double click, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickCount {
    Single,
    Double,
}

impl ClickCount {
    /// From a DOM-style click counter (`MouseEvent.detail`).
    pub fn from_detail(detail: u32) -> Self {
        if detail >= 2 { Self::Double } else { Self::Single }
    }
}

impl InputEvent {
    /// Canvas position, if the event carries one.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y } | Self::PointerMove { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_count_from_detail() {
        assert_eq!(ClickCount::from_detail(0), ClickCount::Single);
        assert_eq!(ClickCount::from_detail(1), ClickCount::Single);
        assert_eq!(ClickCount::from_detail(2), ClickCount::Double);
        assert_eq!(ClickCount::from_detail(3), ClickCount::Double);
    }

    #[test]
    fn only_canvas_pointer_events_carry_position() {
        assert_eq!(
            InputEvent::PointerMove { x: 1.0, y: 2.0 }.position(),
            Some((1.0, 2.0))
        );
        assert_eq!(InputEvent::PointerUp.position(), None);
        assert_eq!(
            InputEvent::PointerDownOnNode { id: NodeId(0) }.position(),
            None
        );
    }
}
