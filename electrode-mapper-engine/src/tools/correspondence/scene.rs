use bevy::prelude::*;
use bevy::render::camera::Viewport;
use bevy::render::view::RenderLayers;
use bevy::window::PrimaryWindow;
use constants::coordinate_system::{REFERENCE_SPHERE_RADIUS, SPHERE_CAMERA_DISTANCE};
use constants::palette::{
    BACKGROUND_COLOUR, CONNECTION_COLOURS, REFERENCE_SPHERE_COLOUR, UNPAIRED_ELECTRODE_COLOUR,
};
use constants::render_settings::{
    HEAD_ELECTRODE_SIZE_FRACTION, HEAD_SCENE_LAYER, SPHERE_ELECTRODE_RADIUS, SPHERE_SCENE_LAYER,
};

use crate::engine::assets::session_manifest::SessionManifest;
use crate::engine::camera::orbit_camera::{OrbitCamera, perspective};
use crate::engine::core::app_state::Screen;
use crate::engine::picking::mesh_surface::PickSurface;
use crate::engine::scene::head::HeadMesh;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::correspondence::state::CorrespondenceBoard;

/// Which half of the window a camera renders.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrespondenceView {
    /// Left half: the labelled reference sphere.
    Sphere,
    /// Right half: the head mesh with detected electrodes.
    Head,
}

impl CorrespondenceView {
    pub fn layers(&self) -> RenderLayers {
        match self {
            Self::Sphere => RenderLayers::layer(SPHERE_SCENE_LAYER),
            Self::Head => RenderLayers::layer(HEAD_SCENE_LAYER),
        }
    }

    /// Physical pixel rectangle of this half as (position, size).
    pub fn viewport_rect(&self, window_size: UVec2) -> (UVec2, UVec2) {
        let left_width = window_size.x / 2;
        match self {
            Self::Sphere => (UVec2::ZERO, UVec2::new(left_width, window_size.y)),
            Self::Head => (
                UVec2::new(left_width, 0),
                UVec2::new(window_size.x - left_width, window_size.y),
            ),
        }
    }
}

#[derive(Component)]
pub struct SphereElectrodeMarker(pub String);

#[derive(Component)]
pub struct HeadElectrodeMarker(pub usize);

/// Screen-space label following a sphere electrode.
#[derive(Component)]
pub struct SphereLabel {
    pub position: Vec3,
}

/// Head-side scene facts that are only known once the mesh has loaded.
#[derive(Resource, Debug, Default)]
pub struct CorrespondenceScene {
    /// Head marker radius, derived from the mesh bounds.
    pub head_marker_radius: Option<f32>,
}

/// Marker colour for a palette slot; unpaired electrodes are white.
pub fn slot_colour(slot: Option<usize>) -> Color {
    slot.and_then(|s| CONNECTION_COLOURS.get(s))
        .copied()
        .unwrap_or(UNPAIRED_ELECTRODE_COLOUR)
}

fn marker_material(materials: &mut Assets<StandardMaterial>) -> MeshMaterial3d<StandardMaterial> {
    MeshMaterial3d(materials.add(StandardMaterial {
        base_color: UNPAIRED_ELECTRODE_COLOUR,
        unlit: true,
        ..default()
    }))
}

pub fn spawn_cameras(commands: &mut Commands) {
    let sphere_orbit = OrbitCamera::looking_at(Vec3::new(SPHERE_CAMERA_DISTANCE, 0.0, 0.0), Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(BACKGROUND_COLOUR),
            ..default()
        },
        perspective(),
        sphere_orbit.transform(),
        sphere_orbit,
        CorrespondenceView::Sphere,
        CorrespondenceView::Sphere.layers(),
        StateScoped(Screen::Correspondence),
    ));

    // Placeholder framing until the head bounds are known.
    let head_orbit = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 15.0), Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Camera {
            order: 1,
            // The first camera already cleared the window.
            clear_color: ClearColorConfig::None,
            ..default()
        },
        perspective(),
        head_orbit.transform(),
        head_orbit,
        CorrespondenceView::Head,
        CorrespondenceView::Head.layers(),
        StateScoped(Screen::Correspondence),
    ));
}

/// Reference sphere with one marker and one label per labelled electrode.
pub fn spawn_sphere_scene(
    commands: &mut Commands,
    manifest: &SessionManifest,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let layers = CorrespondenceView::Sphere.layers();
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(REFERENCE_SPHERE_RADIUS).mesh().uv(48, 24))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: REFERENCE_SPHERE_COLOUR,
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::IDENTITY,
        layers.clone(),
        StateScoped(Screen::Correspondence),
    ));

    let marker_mesh = meshes.add(Sphere::new(SPHERE_ELECTRODE_RADIUS));
    for electrode in &manifest.electrodes_sphere {
        commands.spawn((
            Mesh3d(marker_mesh.clone()),
            marker_material(materials),
            Transform::from_translation(electrode.position()),
            SphereElectrodeMarker(electrode.label.clone()),
            layers.clone(),
            StateScoped(Screen::Correspondence),
        ));
    }
}

/// Labels are UI text laid out against the sphere camera's viewport.
pub fn spawn_sphere_labels(
    mut commands: Commands,
    manifest: Res<SessionManifest>,
    cameras: Query<(Entity, &CorrespondenceView), Added<CorrespondenceView>>,
) {
    for (camera, view) in &cameras {
        if *view != CorrespondenceView::Sphere {
            continue;
        }
        for electrode in &manifest.electrodes_sphere {
            commands.spawn((
                Text::new(electrode.label.clone()),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    ..default()
                },
                Visibility::Hidden,
                SphereLabel {
                    position: electrode.position(),
                },
                UiTargetCamera(camera),
                StateScoped(Screen::Correspondence),
            ));
        }
    }
}

/// Split the window between the two views, following resizes.
pub fn update_viewports(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(&mut Camera, &CorrespondenceView)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let window_size = window.physical_size();
    // Minimised: keep the last layout rather than a zero-sized viewport.
    if window_size.x < 2 || window_size.y == 0 {
        return;
    }
    for (mut camera, view) in &mut cameras {
        let (position, size) = view.viewport_rect(window_size);
        let current = camera
            .viewport
            .as_ref()
            .map(|v| (v.physical_position, v.physical_size));
        if current != Some((position, size)) {
            camera.viewport = Some(Viewport {
                physical_position: position,
                physical_size: size,
                ..default()
            });
        }
    }
}

/// Once the head mesh is pickable, frame it and add its electrode markers,
/// sized relative to the mesh.
pub fn spawn_head_electrodes_when_ready(
    mut commands: Commands,
    manifest: Res<SessionManifest>,
    mut scene: ResMut<CorrespondenceScene>,
    mut board: ResMut<CorrespondenceBoard>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    heads: Query<&PickSurface, With<HeadMesh>>,
    mut cameras: Query<(&mut OrbitCamera, &CorrespondenceView)>,
) {
    if scene.head_marker_radius.is_some() {
        return;
    }
    let Ok(PickSurface(surface)) = heads.single() else {
        return;
    };

    let size = surface.size();
    let radius = (size.max_element() * HEAD_ELECTRODE_SIZE_FRACTION).max(f32::EPSILON);
    scene.head_marker_radius = Some(radius);

    let centre = surface.centre();
    let distance = OrbitCamera::fit_distance(size);
    for (mut orbit, view) in &mut cameras {
        if *view == CorrespondenceView::Head {
            *orbit = OrbitCamera::looking_at(centre + Vec3::Z * distance, centre);
        }
    }

    let layers = CorrespondenceView::Head.layers();
    let marker_mesh = meshes.add(Sphere::new(radius));
    for (index, position) in manifest.head_electrode_positions().into_iter().enumerate() {
        commands.spawn((
            Mesh3d(marker_mesh.clone()),
            marker_material(&mut materials),
            Transform::from_translation(position),
            HeadElectrodeMarker(index),
            layers.clone(),
            StateScoped(Screen::Correspondence),
        ));
    }
    info!(
        "✓ Head electrodes ready: {} markers, radius {radius:.3}",
        manifest.electrodes_head.len()
    );

    // New markers need their colours.
    board.set_changed();
}

/// Recolour markers from the board and report it to the page.
pub fn sync_connection_colours(
    board: Res<CorrespondenceBoard>,
    sphere_markers: Query<(&SphereElectrodeMarker, &MeshMaterial3d<StandardMaterial>)>,
    head_markers: Query<(&HeadElectrodeMarker, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !board.is_changed() {
        return;
    }

    for (marker, material) in &sphere_markers {
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = slot_colour(board.sphere_colour_slot(&marker.0));
        }
    }
    for (marker, material) in &head_markers {
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = slot_colour(board.head_colour_slot(marker.0));
        }
    }

    rpc_interface.send_notification("connections_changed", board.to_json());
}

/// Keep labels over their electrodes; hide those on the far side.
pub fn position_sphere_labels(
    cameras: Query<(&Camera, &GlobalTransform, &CorrespondenceView)>,
    mut labels: Query<(&SphereLabel, &mut Node, &mut Visibility)>,
) {
    let Some((camera, camera_transform)) = cameras
        .iter()
        .find(|(_, _, view)| **view == CorrespondenceView::Sphere)
        .map(|(c, t, _)| (c, t))
    else {
        return;
    };
    let Some(viewport) = camera.logical_viewport_rect() else {
        return;
    };
    let eye = camera_transform.translation();

    for (label, mut node, mut visibility) in &mut labels {
        let facing = label.position.dot(eye - label.position) > 0.0;
        let screen = camera
            .world_to_viewport(camera_transform, label.position)
            .ok()
            .filter(|_| facing);

        match screen {
            Some(screen) => {
                let offset = screen - viewport.min;
                node.left = Val::Px(offset.x + 4.0);
                node.top = Val::Px(offset.y - 6.0);
                visibility.set_if_neq(Visibility::Inherited);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_split_window_in_half() {
        let size = UVec2::new(1001, 600);
        let (sphere_pos, sphere_size) = CorrespondenceView::Sphere.viewport_rect(size);
        let (head_pos, head_size) = CorrespondenceView::Head.viewport_rect(size);
        assert_eq!(sphere_pos, UVec2::ZERO);
        assert_eq!(sphere_size, UVec2::new(500, 600));
        assert_eq!(head_pos, UVec2::new(500, 0));
        assert_eq!(head_size, UVec2::new(501, 600));
    }

    #[test]
    fn colours_follow_palette_slots() {
        assert_eq!(slot_colour(None), UNPAIRED_ELECTRODE_COLOUR);
        assert_eq!(slot_colour(Some(0)), CONNECTION_COLOURS[0]);
        assert_eq!(slot_colour(Some(2)), CONNECTION_COLOURS[2]);
        assert_eq!(slot_colour(Some(7)), UNPAIRED_ELECTRODE_COLOUR);
    }
}
