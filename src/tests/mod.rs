//! Internal test modules - whitebox tests with crate access
//!
//! These drive the controller through key events and background completions
//! the same way the event loop does, with in-memory or local HTTP
//! collaborators.

mod download_flow;
