/// Radius of a placed fiducial marker, in head-scene world units.
pub const FIDUCIAL_MARKER_RADIUS: f32 = 0.07;

/// Radius of an electrode marker on the reference sphere.
pub const SPHERE_ELECTRODE_RADIUS: f32 = 0.02;

/// Head electrode markers are sized relative to the mesh bounding box.
pub const HEAD_ELECTRODE_SIZE_FRACTION: f32 = 0.01;

/// Radius of a 2D electrode marker, in image pixels.
pub const ELECTRODE_2D_RADIUS: f32 = 20.0;

/// Render layers keeping the two correspondence scenes apart.
pub const SPHERE_SCENE_LAYER: usize = 1;
pub const HEAD_SCENE_LAYER: usize = 2;

/// Fill light for the 3D screens, so faces turned from the key light stay readable.
pub const AMBIENT_BRIGHTNESS: f32 = 750.0;
pub const KEY_LIGHT_ILLUMINANCE: f32 = 3_000.0;
