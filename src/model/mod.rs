//! Domain model types (pure).
//!
//! All types in this module are pure data with parsing constructors.

pub mod action_step;
pub mod display_event;
pub mod error;
pub mod trigger;

// Re-export for convenience
pub use action_step::ActionStep;
pub use display_event::DisplayEvent;
pub use error::{AppError, DisplayError, InputError};
pub use trigger::Trigger;
