//! Services module - drivers for the time-based parts of the quiz.
//!
//! The quiz state machine itself is pure and synchronous; what makes the
//! game "run" is time. This module owns that:
//!
//! - [`start_countdown`] / [`CountdownHandle`]: the one-second ticker that
//!   drives [`SessionManager::tick`](crate::state::SessionManager::tick)
//!   until the session finishes or the handle is cancelled.
//!
//! Services are framework-agnostic: they depend on the state layer only and
//! carry no presentation code, so they are fully testable with tokio's
//! paused clock.

pub mod countdown;

pub use countdown::{CountdownHandle, start_countdown};
