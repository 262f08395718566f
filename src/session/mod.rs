//! Per-guild voice session state
//!
//! This module provides:
//! - `VoiceSession`: one guild's voice handle, sink and recording flag
//! - `SessionRegistry`: the process-wide guild → session map with per-guild locking
//! - `SessionSnapshot`: a detached, serializable view of a session

mod registry;
mod session;
mod snapshot;

pub use registry::{SessionGuard, SessionRegistry};
pub use session::VoiceSession;
pub use snapshot::SessionSnapshot;
