use bevy::prelude::*;

/// Map a window cursor position into normalised device coordinates of a
/// viewport rectangle. Returns `None` when the cursor is outside it.
pub fn viewport_to_ndc(viewport: Rect, cursor: Vec2) -> Option<Vec2> {
    if !viewport.contains(cursor) || viewport.width() <= 0.0 || viewport.height() <= 0.0 {
        return None;
    }
    let uv = (cursor - viewport.min) / viewport.size();
    Some(Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0))
}

/// World-space pick ray through a window cursor position.
///
/// Works for cameras rendering into a sub-rectangle of the window, which is
/// how the correspondence screen lays out its two scenes.
pub fn cursor_ray(camera: &Camera, camera_transform: &GlobalTransform, cursor: Vec2) -> Option<Ray3d> {
    let viewport = camera.logical_viewport_rect()?;
    let ndc = viewport_to_ndc(viewport, cursor)?;

    let near = camera.ndc_to_world(camera_transform, ndc.extend(1.0))?;
    // Reversed-Z: depth 0 is infinitely far away, so step just in front of it.
    let far = camera.ndc_to_world(camera_transform, ndc.extend(f32::EPSILON))?;
    let direction = Dir3::new(far - near).ok()?;

    Some(Ray3d::new(near, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_covers_viewport_corners() {
        let viewport = Rect::new(100.0, 0.0, 300.0, 100.0);
        assert_eq!(viewport_to_ndc(viewport, Vec2::new(200.0, 50.0)), Some(Vec2::ZERO));
        assert_eq!(viewport_to_ndc(viewport, Vec2::new(100.0, 0.0)), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(viewport_to_ndc(viewport, Vec2::new(300.0, 100.0)), Some(Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn cursor_outside_viewport_has_no_ndc() {
        let viewport = Rect::new(100.0, 0.0, 300.0, 100.0);
        assert_eq!(viewport_to_ndc(viewport, Vec2::new(50.0, 50.0)), None);
    }
}
