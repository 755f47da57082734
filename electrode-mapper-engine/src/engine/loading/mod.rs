//! Asset loading for the session and for each screen.
//!
//! The session manifest is loaded once at startup. Each screen then tracks
//! the meshes and images it needs and reports progress to the page.

/// Session manifest loading from `session.json`.
pub mod manifest_loader;

/// Per-screen loading progress tracking and reporting.
pub mod progress;
