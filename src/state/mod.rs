//! Bar state machine.
//!
//! All transitions run on the event loop thread and are testable without a
//! terminal.

pub mod app_state;
pub mod line_store;
pub mod router;
pub mod signals;

// Re-export for convenience
pub use app_state::{AppState, BodyScene, EofOutcome, Scene, WindowFlags};
pub use line_store::{AppendOutcome, LineStore, ViewMode};
pub use router::{LineRouter, Route};
pub use signals::{Notification, Notifications, SignalWatcher};
