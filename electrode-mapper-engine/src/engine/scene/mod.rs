//! Shared scene furniture for the 3D screens.

/// Head mesh spawning from the session's glTF file.
pub mod head;

/// Directional lighting spawned per screen and render layer.
pub mod lighting;
