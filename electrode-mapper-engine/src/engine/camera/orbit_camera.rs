use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::coordinate_system::{CAMERA_FIT_MARGIN, CAMERA_FOV_DEGREES};

use crate::engine::systems::pointer::PointerState;

/// Orbit controls for a 3D viewport: left drag rotates around the target,
/// the wheel dollies in and out. Several can coexist when each camera owns
/// its own viewport rectangle.
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Cleared while another interaction owns the left-button drag.
    pub rotate_enabled: bool,
}

impl OrbitCamera {
    const ROTATE_SENSITIVITY: f32 = 0.005;
    const PITCH_LIMIT: f32 = 1.55;

    /// Camera placed at `eye`, looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let dir = offset / distance;
        Self {
            target,
            distance,
            yaw: dir.x.atan2(dir.z),
            pitch: (-dir.y).asin().clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            min_distance: distance * 0.1,
            max_distance: distance * 10.0,
            rotate_enabled: true,
        }
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self.distance = self.distance.clamp(min, max);
        self
    }

    /// Distance at which an object of this size fills the view with margin.
    pub fn fit_distance(size: Vec3) -> f32 {
        let half_fov = (CAMERA_FOV_DEGREES.to_radians() * 0.5).tan();
        let radius = size.max_element() * 0.5;
        radius * CAMERA_FIT_MARGIN / half_fov + size.z * 0.5
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * Self::ROTATE_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * Self::ROTATE_SENSITIVITY)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Positive steps move towards the target.
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance * 0.9_f32.powf(steps)).clamp(self.min_distance, self.max_distance);
    }

    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        Transform::from_translation(self.target + rotation * Vec3::Z * self.distance)
            .looking_at(self.target, Vec3::Y)
    }
}

/// Perspective projection shared by every 3D view.
pub fn perspective() -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: CAMERA_FOV_DEGREES.to_radians(),
        ..default()
    })
}

pub fn orbit_camera_controller(
    pointer: Res<PointerState>,
    mut scroll_events: EventReader<MouseWheel>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform, &Camera)>,
) {
    // Mouse wheel scroll accumulation (pixel and line scroll)
    let scroll: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();

    for (mut orbit, mut transform, camera) in &mut cameras {
        let Some(viewport) = camera.logical_viewport_rect() else {
            continue;
        };

        let drag_started_here = pointer.pressed_at().is_some_and(|p| viewport.contains(p));
        if orbit.rotate_enabled && pointer.is_dragging() && drag_started_here {
            orbit.rotate(pointer.delta());
        }

        let hovered = pointer.cursor().is_some_and(|p| viewport.contains(p));
        if hovered && scroll.abs() > f32::EPSILON {
            orbit.zoom(scroll);
        }

        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn looking_at_reproduces_eye() {
        for eye in [Vec3::new(0.0, 0.0, 15.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 2.0, -3.0)] {
            let orbit = OrbitCamera::looking_at(eye, Vec3::ZERO);
            assert!(approx(orbit.transform().translation, eye), "{eye}");
        }
    }

    #[test]
    fn zoom_respects_limits() {
        let mut orbit = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 15.0), Vec3::ZERO)
            .with_distance_limits(4.0, 50.0);
        orbit.zoom(100.0);
        assert_eq!(orbit.distance, 4.0);
        orbit.zoom(-100.0);
        assert_eq!(orbit.distance, 50.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut orbit = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        orbit.rotate(Vec2::new(0.0, -10_000.0));
        assert!(orbit.pitch <= 1.55);
        assert!(orbit.transform().translation.is_finite());
    }

    #[test]
    fn fit_distance_grows_with_size() {
        let small = OrbitCamera::fit_distance(Vec3::splat(1.0));
        let large = OrbitCamera::fit_distance(Vec3::splat(10.0));
        assert!(small > 0.5);
        assert!(large > small * 9.0);
    }
}
