use bevy::prelude::*;
use constants::render_settings::FIDUCIAL_MARKER_RADIUS;

use crate::engine::core::app_state::Screen;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::fiducial::state::FiducialSelection;

/// Sphere drawn at a placed landmark.
#[derive(Component)]
pub struct FiducialMarker(pub usize);

/// Shared marker mesh and one material per landmark colour.
#[derive(Resource)]
pub struct FiducialMarkerAssets {
    mesh: Handle<Mesh>,
    materials: Vec<Handle<StandardMaterial>>,
}

impl FiducialMarkerAssets {
    pub fn new(
        selection: &FiducialSelection,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> Self {
        Self {
            mesh: meshes.add(Sphere::new(FIDUCIAL_MARKER_RADIUS)),
            materials: selection
                .fiducials()
                .iter()
                .map(|f| {
                    materials.add(StandardMaterial {
                        base_color: f.colour,
                        unlit: true,
                        ..default()
                    })
                })
                .collect(),
        }
    }
}

/// Rebuild markers and push the side-panel state after any change.
pub fn sync_fiducial_markers(
    mut commands: Commands,
    selection: Res<FiducialSelection>,
    assets: Res<FiducialMarkerAssets>,
    markers: Query<Entity, With<FiducialMarker>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !selection.is_changed() {
        return;
    }

    for entity in &markers {
        commands.entity(entity).despawn();
    }
    for (index, position) in selection.placed() {
        commands.spawn((
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.materials[index].clone()),
            Transform::from_translation(position),
            FiducialMarker(index),
            StateScoped(Screen::Fiducials),
        ));
    }

    rpc_interface.send_notification("fiducials_state", selection.to_json());
}
