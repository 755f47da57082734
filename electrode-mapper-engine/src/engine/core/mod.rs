//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, screen states,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with asset loading, input tracking, the RPC bridge
/// and one plugin per screen.
pub mod app_setup;

/// Application state machine and the screen sub-state.
///
/// Moves from loading the session to running the three mapping screens.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
