//! Test doubles for the host boundary.
//!
//! These mocks keep the core testable without a live host application:
//! [`ScriptedHost`] records every executed script and plays back scripted
//! generation outcomes; [`RecordingNotifier`] captures toasts.

mod mocks;

pub use mocks::{RecordingNotifier, ScriptedHost};
