use bevy::prelude::*;
use constants::palette::{ELECTRODE_2D_COLOUR, ELECTRODE_2D_SELECTED_COLOUR};
use constants::render_settings::ELECTRODE_2D_RADIUS;

use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::electrodes::interaction::ElectrodeInteraction;
use crate::tools::electrodes::photo::{PhotoRoot, image_to_local};
use crate::tools::electrodes::state::ElectrodeSet;

/// Disc drawn over the photo for one electrode.
#[derive(Component)]
pub struct ElectrodeMarker(pub usize);

#[derive(Resource)]
pub struct ElectrodeMarkerAssets {
    mesh: Handle<Mesh>,
    normal: Handle<ColorMaterial>,
    highlighted: Handle<ColorMaterial>,
}

impl ElectrodeMarkerAssets {
    pub fn new(meshes: &mut Assets<Mesh>, materials: &mut Assets<ColorMaterial>) -> Self {
        Self {
            mesh: meshes.add(Circle::new(ELECTRODE_2D_RADIUS)),
            normal: materials.add(ELECTRODE_2D_COLOUR),
            highlighted: materials.add(ELECTRODE_2D_SELECTED_COLOUR),
        }
    }
}

/// Respawn markers under the photo root when electrodes or an in-flight
/// drag change, and report the set to the page.
pub fn sync_electrode_markers(
    mut commands: Commands,
    set: Res<ElectrodeSet>,
    interaction: Res<ElectrodeInteraction>,
    assets: Res<ElectrodeMarkerAssets>,
    roots: Query<Entity, With<PhotoRoot>>,
    markers: Query<Entity, With<ElectrodeMarker>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !set.is_changed() && !interaction.is_changed() {
        return;
    }
    let Ok(root) = roots.single() else {
        return;
    };

    for entity in &markers {
        commands.entity(entity).despawn();
    }

    commands.entity(root).with_children(|parent| {
        for (index, electrode) in set.electrodes().iter().enumerate() {
            let position = interaction.display_position(index, electrode.position);
            let material = if electrode.highlighted() {
                assets.highlighted.clone()
            } else {
                assets.normal.clone()
            };
            parent.spawn((
                Mesh2d(assets.mesh.clone()),
                MeshMaterial2d(material),
                // Later electrodes stack on top, matching hit-test order.
                Transform::from_translation(image_to_local(position).extend(1.0 + index as f32 * 1e-3)),
                ElectrodeMarker(index),
            ));
        }
    });

    if set.is_changed() {
        rpc_interface.send_notification("electrodes_changed", set.to_json());
    }
}
