pub mod commands;
pub mod controller;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod timer;

pub use commands::{CommandOutput, GraphCommand, execute};
pub use controller::{InteractionController, InteractionState};
pub use input::{ClickCount, InputEvent};
pub use session::{EditorConfig, Notice, Session, SessionView};
pub use shortcuts::{KeyAction, ShortcutMap};
pub use timer::{DragTimer, ManualScheduler, Scheduler, TimerToken};
