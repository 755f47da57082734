//! Session input data.
//!
//! Describes the head mesh, calibration photo and electrode lists that a
//! mapping session works on.

/// Session manifest loaded from `session.json`, plus electrode records.
pub mod session_manifest;
