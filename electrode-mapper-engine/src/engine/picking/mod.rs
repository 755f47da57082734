//! Hit-testing primitives behind every pointer interaction.
//!
//! Ray casts against loaded meshes and spherical markers for the 3D screens,
//! and polygon containment for lasso and rectangle selection on the photo.

/// Triangle surfaces extracted from loaded meshes for ray casting.
pub mod mesh_surface;

/// Point-in-polygon classification with boundary detection.
pub mod polygon;

/// Ray intersection tests against boxes, triangles and spheres.
pub mod ray;
