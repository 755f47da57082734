//! Camera controls and pointer-to-scene mappings.
//!
//! Orbit cameras drive the 3D screens, the zoom transform drives the photo
//! screen, and cursor rays connect window positions to world space.

/// Orbit camera component and controller system for 3D viewports.
pub mod orbit_camera;

/// Pick rays through viewport sub-rectangles.
pub mod cursor_ray;

/// Pan/zoom transform between photo pixels and the window.
pub mod zoom_transform;
