use bevy::prelude::*;
use constants::coordinate_system::HEAD_MESH_SCALE;
use serde::{Deserialize, Serialize};

/// Labelled electrode on the reference sphere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereElectrode {
    pub label: String,
    pub position: [f32; 3],
}

impl SphereElectrode {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Electrode detected on the head mesh, in unscaled mesh coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadElectrode {
    pub position: [f32; 3],
}

/// Inputs for one mapping session. Mirrors `session.json` exactly.
/// Paths are relative to the asset root.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath, Resource)]
pub struct SessionManifest {
    pub head_mesh: String,
    #[serde(default = "default_head_mesh_scale")]
    pub head_mesh_scale: f32,
    pub photo: String,
    #[serde(default)]
    pub electrodes_2d: Vec<[f32; 2]>,
    #[serde(default)]
    pub electrodes_sphere: Vec<SphereElectrode>,
    #[serde(default)]
    pub electrodes_head: Vec<HeadElectrode>,
}

fn default_head_mesh_scale() -> f32 {
    HEAD_MESH_SCALE
}

impl SessionManifest {
    /// Transform placing the head mesh in every head scene.
    pub fn head_transform(&self) -> Transform {
        Transform::from_scale(Vec3::splat(self.head_mesh_scale))
    }

    /// Head electrode positions in world space.
    pub fn head_electrode_positions(&self) -> Vec<Vec3> {
        self.electrodes_head
            .iter()
            .map(|e| Vec3::from_array(e.position) * self.head_mesh_scale)
            .collect()
    }

    pub fn photo_electrodes(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.electrodes_2d.iter().map(|p| Vec2::from_array(*p))
    }

    pub fn sphere_labels(&self) -> Vec<String> {
        self.electrodes_sphere.iter().map(|e| e.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_session() {
        let json = r#"{ "head_mesh": "head.glb", "photo": "photo.jpg" }"#;
        let manifest: SessionManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.head_mesh_scale, HEAD_MESH_SCALE);
        assert!(manifest.electrodes_2d.is_empty());
        assert!(manifest.electrodes_sphere.is_empty());
    }

    #[test]
    fn scales_head_electrodes() {
        let json = r#"{
            "head_mesh": "head.glb",
            "head_mesh_scale": 2.0,
            "photo": "photo.jpg",
            "electrodes_2d": [[10, 20]],
            "electrodes_sphere": [{ "label": "Cz", "position": [0, 1, 0] }],
            "electrodes_head": [{ "position": [0.5, 0.25, 0] }]
        }"#;
        let manifest: SessionManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.head_electrode_positions(), vec![Vec3::new(1.0, 0.5, 0.0)]);
        assert_eq!(manifest.sphere_labels(), vec!["Cz".to_string()]);
        assert_eq!(manifest.photo_electrodes().next(), Some(Vec2::new(10.0, 20.0)));
        assert_eq!(manifest.head_transform().scale, Vec3::splat(2.0));
    }
}
