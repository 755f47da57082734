/// Uniform scale applied to the loaded head mesh.
pub const HEAD_MESH_SCALE: f32 = 20.0;

/// Vertical field of view of every 3D camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 45.0;

/// Starting camera distance on the fiducial screen.
pub const FIDUCIAL_CAMERA_DISTANCE: f32 = 15.0;
pub const FIDUCIAL_CAMERA_MIN_DISTANCE: f32 = 4.0;
pub const FIDUCIAL_CAMERA_MAX_DISTANCE: f32 = 50.0;

/// Reference sphere is a unit sphere at the origin, viewed from +X.
pub const REFERENCE_SPHERE_RADIUS: f32 = 1.0;
pub const SPHERE_CAMERA_DISTANCE: f32 = 2.0;

/// Extra room left around an object when the camera is fitted to it.
pub const CAMERA_FIT_MARGIN: f32 = 1.2;
