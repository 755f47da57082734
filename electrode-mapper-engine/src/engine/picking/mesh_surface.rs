use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;

use super::ray::{ray_aabb_hit_t, ray_triangle_hit};

/// Nearest intersection of a pointer ray with a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

/// World-space triangle soup of a loaded mesh, kept CPU-side for pointer
/// ray casts. Built once when the mesh finishes loading.
#[derive(Debug, Clone, Default)]
pub struct MeshSurface {
    triangles: Vec<[Vec3; 3]>,
    min: Vec3,
    max: Vec3,
}

impl MeshSurface {
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for vertex in triangles.iter().flatten() {
            min = min.min(*vertex);
            max = max.max(*vertex);
        }
        Self { triangles, min, max }
    }

    /// Extract triangles from a mesh and place them with the entity transform.
    /// Returns `None` when the mesh has no readable positions.
    pub fn from_mesh(mesh: &Mesh, transform: &Transform) -> Option<Self> {
        let positions = match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
            VertexAttributeValues::Float32x3(positions) => positions,
            _ => return None,
        };

        let matrix = transform.compute_matrix();
        let world: Vec<Vec3> = positions
            .iter()
            .map(|p| matrix.transform_point3(Vec3::from_array(*p)))
            .collect();

        let order: Vec<usize> = match mesh.indices() {
            Some(indices) => indices.iter().collect(),
            None => (0..world.len()).collect(),
        };

        let triangles = order
            .chunks_exact(3)
            .filter_map(|tri| {
                Some([
                    *world.get(tri[0])?,
                    *world.get(tri[1])?,
                    *world.get(tri[2])?,
                ])
            })
            .collect::<Vec<_>>();

        if triangles.is_empty() {
            return None;
        }
        Some(Self::from_triangles(triangles))
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.min, self.max)
    }

    pub fn size(&self) -> Vec3 {
        (self.max - self.min).max(Vec3::ZERO)
    }

    pub fn centre(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Cast a ray and return the closest surface hit.
    pub fn cast(&self, ray_origin: Vec3, ray_direction: Vec3) -> Option<SurfaceHit> {
        ray_aabb_hit_t(ray_origin, ray_direction, self.min, self.max)?;

        let mut best: Option<(f32, Vec3)> = None;
        for triangle in &self.triangles {
            if let Some((t, normal)) = ray_triangle_hit(ray_origin, ray_direction, triangle) {
                if best.is_none_or(|(best_t, _)| t < best_t) {
                    best = Some((t, normal));
                }
            }
        }

        best.map(|(t, normal)| {
            // Face the normal back towards the viewer.
            let normal = if normal.dot(ray_direction) > 0.0 { -normal } else { normal };
            SurfaceHit {
                point: ray_origin + ray_direction * t,
                normal,
                distance: t,
            }
        })
    }
}

/// Marks a mesh entity whose surface should be made pickable once loaded.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Pickable;

/// CPU-side surface of a loaded `Pickable` mesh, in world space.
#[derive(Component, Debug, Clone)]
pub struct PickSurface(pub MeshSurface);

/// Build pick surfaces for meshes that finished loading.
pub fn attach_pick_surfaces(
    mut commands: Commands,
    meshes: Res<Assets<Mesh>>,
    pending: Query<(Entity, &Mesh3d, &Transform), (With<Pickable>, Without<PickSurface>)>,
) {
    for (entity, mesh, transform) in &pending {
        let Some(mesh) = meshes.get(&mesh.0) else {
            continue;
        };
        match MeshSurface::from_mesh(mesh, transform) {
            Some(surface) => {
                info!(
                    "✓ Pick surface ready: {} triangles, size {:?}",
                    surface.triangle_count(),
                    surface.size()
                );
                commands.entity(entity).insert(PickSurface(surface));
            }
            None => {
                warn!("Mesh has no triangle positions, it will not be pickable");
                commands.entity(entity).remove::<Pickable>();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use bevy::render::mesh::{Indices, PrimitiveTopology};

    fn quad_mesh() -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::MAIN_WORLD);
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![
                [-1.0, -1.0, 0.0],
                [1.0, -1.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0],
            ],
        );
        mesh.insert_indices(Indices::U32(vec![0, 1, 2, 0, 2, 3]));
        mesh
    }

    #[test]
    fn builds_scaled_surface_from_mesh() {
        let surface = MeshSurface::from_mesh(&quad_mesh(), &Transform::from_scale(Vec3::splat(20.0))).unwrap();
        assert_eq!(surface.triangle_count(), 2);
        let (min, max) = surface.bounds();
        assert_eq!(min, Vec3::new(-20.0, -20.0, 0.0));
        assert_eq!(max, Vec3::new(20.0, 20.0, 0.0));
    }

    #[test]
    fn cast_returns_nearest_hit_facing_viewer() {
        let near = [Vec3::new(-1.0, -1.0, 1.0), Vec3::new(1.0, -1.0, 1.0), Vec3::new(0.0, 1.0, 1.0)];
        let far = [Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, -1.0, -1.0), Vec3::new(0.0, 1.0, -1.0)];
        let surface = MeshSurface::from_triangles(vec![far, near]);

        let hit = surface.cast(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z).unwrap();
        assert!((hit.point.z - 1.0).abs() < 1e-5);
        assert!((hit.distance - 9.0).abs() < 1e-5);
        assert!(hit.normal.z > 0.0);
    }

    #[test]
    fn cast_misses_outside_bounds() {
        let surface = MeshSurface::from_mesh(&quad_mesh(), &Transform::IDENTITY).unwrap();
        assert!(surface.cast(Vec3::new(5.0, 5.0, 10.0), Vec3::NEG_Z).is_none());
    }

    #[test]
    fn mesh_without_positions_is_rejected() {
        let mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::MAIN_WORLD);
        assert!(MeshSurface::from_mesh(&mesh, &Transform::IDENTITY).is_none());
    }
}
