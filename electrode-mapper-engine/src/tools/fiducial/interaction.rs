use bevy::prelude::*;
use constants::render_settings::FIDUCIAL_MARKER_RADIUS;

use crate::engine::camera::cursor_ray::cursor_ray;
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::picking::mesh_surface::{PickSurface, SurfaceHit};
use crate::engine::picking::ray::nearest_marker_hit;
use crate::engine::scene::head::HeadMesh;
use crate::engine::systems::cursor_hint::CursorHint;
use crate::engine::systems::pointer::PointerState;
use crate::rpc::commands::SessionCommand;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::fiducial::state::{FiducialSelection, FiducialUpdate};

/// Marks the camera of the fiducial screen.
#[derive(Component)]
pub struct FiducialCamera;

/// Pointer state of the fiducial screen between frames.
#[derive(Resource, Debug, Default)]
pub struct FiducialInteraction {
    /// Landmark whose marker is being dragged.
    pub dragging: Option<usize>,
    /// Surface point under the cursor, for the placement preview.
    pub hover_hit: Option<SurfaceHit>,
}

fn notify_update(rpc_interface: &mut WebRpcInterface, selection: &FiducialSelection, update: FiducialUpdate) {
    let method = match update {
        FiducialUpdate::Assigned { .. } => "fiducial_assigned",
        FiducialUpdate::Moved { .. } => "fiducial_moved",
    };
    let position = update.position();
    rpc_interface.send_notification(
        method,
        serde_json::json!({
            "index": update.index(),
            "name": selection.fiducials()[update.index()].name,
            "position": [position.x, position.y, position.z],
        }),
    );
}

/// Hover, pick and drag for landmark markers on the head mesh.
pub fn fiducial_pointer_system(
    pointer: Res<PointerState>,
    mut selection: ResMut<FiducialSelection>,
    mut interaction: ResMut<FiducialInteraction>,
    mut cursor_hint: ResMut<CursorHint>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut cameras: Query<(&Camera, &GlobalTransform, &mut OrbitCamera), With<FiducialCamera>>,
    heads: Query<&PickSurface, With<HeadMesh>>,
) {
    let Ok((camera, camera_transform, mut orbit)) = cameras.single_mut() else {
        return;
    };
    // Head not loaded yet: nothing to pick against.
    let Ok(PickSurface(surface)) = heads.single() else {
        return;
    };

    let ray = pointer
        .cursor()
        .and_then(|cursor| cursor_ray(camera, camera_transform, cursor));
    let surface_hit = ray.and_then(|r| surface.cast(r.origin, *r.direction));
    let hovered_marker = ray.and_then(|r| {
        nearest_marker_hit(r.origin, *r.direction, selection.placed(), FIDUCIAL_MARKER_RADIUS)
            .map(|(index, _)| index)
    });
    interaction.hover_hit = surface_hit;

    if pointer.just_pressed().is_some() {
        if let Some(index) = hovered_marker {
            debug!("Dragging landmark {index}");
            interaction.dragging = Some(index);
            orbit.rotate_enabled = false;
        }
    }

    if let Some(index) = interaction.dragging {
        if pointer.is_pressed() && pointer.delta() != Vec2::ZERO {
            if let Some(hit) = surface_hit {
                match selection.drag(index, hit.point) {
                    Ok(update) => notify_update(&mut rpc_interface, &selection, update),
                    Err(err) => debug!("Landmark drag ignored: {err}"),
                }
            }
        }
    }

    if pointer.released().is_some() {
        if interaction.dragging.take().is_some() {
            orbit.rotate_enabled = true;
        } else if pointer.clicked().is_some() {
            // A click that misses the head is ignored.
            if let Some(hit) = surface_hit {
                let update = selection.pick(hit.point);
                info!("Placed {} at {:?}", selection.fiducials()[update.index()].name, hit.point);
                notify_update(&mut rpc_interface, &selection, update);
            }
        }
    }

    let next_hint = if interaction.dragging.is_some() || hovered_marker.is_some() {
        CursorHint::Move
    } else {
        CursorHint::Default
    };
    cursor_hint.set_if_neq(next_hint);
}

pub fn handle_fiducial_commands(
    mut commands: EventReader<SessionCommand>,
    mut selection: ResMut<FiducialSelection>,
) {
    for command in commands.read() {
        match command {
            SessionCommand::SelectFiducial(index) => {
                if let Err(err) = selection.select(*index) {
                    debug!("select_fiducial ignored: {err}");
                }
            }
            // Touch the resource so the state notification goes out again.
            SessionCommand::ReportState => selection.set_changed(),
            _ => {}
        }
    }
}

/// Surface normal preview in the colour of the landmark about to be placed.
pub fn draw_placement_preview(
    mut gizmos: Gizmos,
    selection: Res<FiducialSelection>,
    interaction: Res<FiducialInteraction>,
) {
    let Some(hit) = interaction.hover_hit else {
        return;
    };
    let colour = match interaction.dragging {
        Some(index) => selection.fiducials()[index].colour,
        None => selection.selecting().colour,
    };
    gizmos.line(hit.point, hit.point + hit.normal * 0.5, colour);
    gizmos.circle(
        Isometry3d::new(hit.point, Quat::from_rotation_arc(Vec3::Z, hit.normal)),
        FIDUCIAL_MARKER_RADIUS,
        colour,
    );
}
