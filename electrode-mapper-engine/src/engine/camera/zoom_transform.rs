use bevy::prelude::*;
use constants::zoom::{INITIAL_FIT_MARGIN, MAX_SCALE_FACTOR, MIN_SCALE_FACTOR};

/// Pan/zoom mapping between image space and view space on the photo screen.
///
/// View space is window pixels with the origin at the top-left corner and
/// y pointing down, which is also how the photo's pixel grid is laid out.
/// Scaling is uniform; `scale.x == scale.y` for every transform built here.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub scale: Vec2,
    pub translate: Vec2,
    min_scale: f32,
    max_scale: f32,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self {
            scale: Vec2::ONE,
            translate: Vec2::ZERO,
            min_scale: MIN_SCALE_FACTOR,
            max_scale: MAX_SCALE_FACTOR,
        }
    }
}

impl ZoomTransform {
    /// Fit the image inside the view with a margin and centre it.
    /// Zoom limits are derived from the fitted scale.
    pub fn fit(image_size: Vec2, view_size: Vec2) -> Self {
        if image_size.x <= 0.0 || image_size.y <= 0.0 {
            return Self::default();
        }

        let initial = (view_size.x / (image_size.x * INITIAL_FIT_MARGIN))
            .min(view_size.y / (image_size.y * INITIAL_FIT_MARGIN))
            .max(f32::EPSILON);

        Self {
            scale: Vec2::splat(initial),
            translate: (view_size - image_size * initial) * 0.5,
            min_scale: initial * MIN_SCALE_FACTOR,
            max_scale: initial * MAX_SCALE_FACTOR,
        }
    }

    /// Image space to view space.
    pub fn apply(&self, point: Vec2) -> Vec2 {
        point * self.scale + self.translate
    }

    /// View space to image space.
    pub fn apply_inverse(&self, point: Vec2) -> Vec2 {
        (point - self.translate) / self.scale
    }

    pub fn apply_inverse_all(&self, points: &[Vec2]) -> Vec<Vec2> {
        points.iter().map(|p| self.apply_inverse(*p)).collect()
    }

    pub fn scale_bounds(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    /// Zoom by `factor` keeping the view-space `anchor` fixed on screen.
    /// The resulting scale is clamped to the zoom limits.
    pub fn scale_about(&mut self, anchor: Vec2, factor: f32) {
        let current = self.scale.x;
        let target = (current * factor).clamp(self.min_scale, self.max_scale);
        let effective = target / current;
        if (effective - 1.0).abs() <= f32::EPSILON {
            return;
        }

        self.translate = anchor - (anchor - self.translate) * effective;
        self.scale = Vec2::splat(target);
    }

    /// Shift the image by a view-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.translate += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn fit_centres_with_margin() {
        let zoom = ZoomTransform::fit(Vec2::new(1000.0, 500.0), Vec2::new(1100.0, 1100.0));
        assert!((zoom.scale.x - 1.0).abs() < 1e-5);
        assert_eq!(zoom.scale.x, zoom.scale.y);
        assert!(approx(zoom.translate, Vec2::new(50.0, 300.0)));

        let (min, max) = zoom.scale_bounds();
        assert!((min - 0.5).abs() < 1e-5);
        assert!((max - 16.0).abs() < 1e-4);
    }

    #[test]
    fn inverse_undoes_apply() {
        let mut zoom = ZoomTransform::fit(Vec2::new(640.0, 480.0), Vec2::new(800.0, 600.0));
        zoom.pan(Vec2::new(13.0, -7.0));
        zoom.scale_about(Vec2::new(200.0, 100.0), 1.1);

        let image_point = Vec2::new(123.0, 456.0);
        assert!(approx(zoom.apply_inverse(zoom.apply(image_point)), image_point));
    }

    #[test]
    fn scale_about_keeps_anchor_fixed() {
        let mut zoom = ZoomTransform::fit(Vec2::new(100.0, 100.0), Vec2::new(110.0, 110.0));
        let anchor = Vec2::new(30.0, 70.0);
        let under_cursor = zoom.apply_inverse(anchor);

        zoom.scale_about(anchor, 1.1);
        assert!((zoom.scale.x - 1.1).abs() < 1e-5);
        assert!(approx(zoom.apply(under_cursor), anchor));

        zoom.scale_about(anchor, 0.9);
        assert!(approx(zoom.apply(under_cursor), anchor));
    }

    #[test]
    fn zoom_is_clamped_to_limits() {
        let mut zoom = ZoomTransform::fit(Vec2::new(100.0, 100.0), Vec2::new(110.0, 110.0));
        for _ in 0..100 {
            zoom.scale_about(Vec2::ZERO, 1.1);
        }
        assert!((zoom.scale.x - 16.0).abs() < 1e-3);

        for _ in 0..100 {
            zoom.scale_about(Vec2::ZERO, 0.9);
        }
        assert!((zoom.scale.x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_translation_only() {
        let mut zoom = ZoomTransform::default();
        zoom.pan(Vec2::new(5.0, -3.0));
        assert_eq!(zoom.translate, Vec2::new(5.0, -3.0));
        assert_eq!(zoom.apply_inverse(Vec2::new(5.0, -3.0)), Vec2::ZERO);
    }
}
