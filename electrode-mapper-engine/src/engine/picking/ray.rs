use bevy::prelude::*;

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax { std::mem::swap(&mut tmin, &mut tmax); }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax { std::mem::swap(&mut tymin, &mut tymax); }

    if (tmin > tymax) || (tymin > tmax) { return None; }
    if tymin > tmin { tmin = tymin; }
    if tymax < tmax { tmax = tymax; }

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax { std::mem::swap(&mut tzmin, &mut tzmax); }

    if (tmin > tzmax) || (tzmin > tmax) { return None; }
    if tzmin > tmin { tmin = tzmin; }
    if tzmax < tmax { tmax = tzmax; }

    if tmax < 0.0 { return None; }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Möller–Trumbore ray–triangle intersection. Both faces count as hits.
/// Returns the ray parameter of the hit and the unit face normal.
pub fn ray_triangle_hit(
    ray_origin: Vec3,
    ray_direction: Vec3,
    triangle: &[Vec3; 3],
) -> Option<(f32, Vec3)> {
    const EPSILON: f32 = 1e-8;

    let [v0, v1, v2] = *triangle;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray_direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None; // Ray parallel to triangle plane.
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t <= EPSILON {
        return None;
    }

    Some((t, edge1.cross(edge2).normalize_or_zero()))
}

/// Nearest non-negative ray parameter at which the ray enters a sphere.
/// A ray starting inside the sphere reports the exit point.
pub fn ray_sphere_hit(ray_origin: Vec3, ray_direction: Vec3, centre: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - centre;
    let a = ray_direction.length_squared();
    if a == 0.0 {
        return None;
    }
    let half_b = oc.dot(ray_direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = (-half_b - root) / a;
    let far = (-half_b + root) / a;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Closest of a set of equally sized spherical markers hit by the ray.
/// Returns the caller's key for the marker and the hit distance.
pub fn nearest_marker_hit<K>(
    ray_origin: Vec3,
    ray_direction: Vec3,
    markers: impl IntoIterator<Item = (K, Vec3)>,
    radius: f32,
) -> Option<(K, f32)> {
    let mut best: Option<(K, f32)> = None;
    for (key, centre) in markers {
        if let Some(t) = ray_sphere_hit(ray_origin, ray_direction, centre, radius) {
            if best.as_ref().is_none_or(|(_, best_t)| t < *best_t) {
                best = Some((key, t));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: [Vec3; 3] = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    #[test]
    fn triangle_hit_from_either_side() {
        let (t, normal) = ray_triangle_hit(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, &TRIANGLE).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
        assert!((normal.z.abs() - 1.0).abs() < 1e-5);

        let (t, _) = ray_triangle_hit(Vec3::new(0.0, 0.0, -2.0), Vec3::Z, &TRIANGLE).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_miss_cases() {
        // Outside the triangle.
        assert!(ray_triangle_hit(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z, &TRIANGLE).is_none());
        // Parallel.
        assert!(ray_triangle_hit(Vec3::new(0.0, 0.0, 5.0), Vec3::X, &TRIANGLE).is_none());
        // Behind origin.
        assert!(ray_triangle_hit(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, &TRIANGLE).is_none());
    }

    #[test]
    fn sphere_hit_front_and_inside() {
        let t = ray_sphere_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        let t = ray_sphere_hit(Vec3::ZERO, Vec3::X, Vec3::ZERO, 2.0).unwrap();
        assert!((t - 2.0).abs() < 1e-5);

        assert!(ray_sphere_hit(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0).is_none());
        assert!(ray_sphere_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn nearest_marker_prefers_closest() {
        let markers = vec![
            ("far", Vec3::new(0.0, 0.0, -5.0)),
            ("near", Vec3::new(0.0, 0.0, 2.0)),
            ("off_axis", Vec3::new(3.0, 0.0, 4.0)),
        ];
        let (key, t) = nearest_marker_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, markers, 0.5).unwrap();
        assert_eq!(key, "near");
        assert!((t - 7.5).abs() < 1e-5);
    }

    #[test]
    fn aabb_slab_hit() {
        let t = ray_aabb_hit_t(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!(ray_aabb_hit_t(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());
    }
}
