//! Audio capture control
//!
//! `RecordingController` drives the per-guild `idle <-> recording` state
//! machine and keeps the transcription engine informed.

mod controller;
mod transcription;

pub use controller::RecordingController;
pub use transcription::{NatsTranscriptionNotifier, TranscriptionEngine};
