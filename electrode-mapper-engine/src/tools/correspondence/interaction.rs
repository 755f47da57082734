use bevy::prelude::*;
use constants::coordinate_system::REFERENCE_SPHERE_RADIUS;
use constants::render_settings::SPHERE_ELECTRODE_RADIUS;

use crate::engine::camera::cursor_ray::cursor_ray;
use crate::engine::picking::mesh_surface::PickSurface;
use crate::engine::picking::ray::{nearest_marker_hit, ray_sphere_hit};
use crate::engine::scene::head::HeadMesh;
use crate::engine::systems::cursor_hint::CursorHint;
use crate::engine::systems::pointer::PointerState;
use crate::rpc::commands::SessionCommand;
use crate::tools::correspondence::scene::{
    CorrespondenceScene, CorrespondenceView, HeadElectrodeMarker, SphereElectrodeMarker,
};
use crate::tools::correspondence::state::CorrespondenceBoard;
use crate::tools::transition::TransitionError;

/// An electrode under the cursor in one of the two views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectrodePick {
    Sphere(String),
    Head(usize),
}

/// Keep a marker hit unless the surface it sits on is hit clearly in front
/// of it. Markers straddle the surface, so one radius of slack is allowed.
pub fn unoccluded<K>(marker_hit: Option<(K, f32)>, surface_distance: Option<f32>, radius: f32) -> Option<K> {
    let (key, t) = marker_hit?;
    match surface_distance {
        Some(surface) if surface + radius < t => None,
        _ => Some(key),
    }
}

impl ElectrodePick {
    fn apply(self, board: &mut CorrespondenceBoard) -> Result<(), TransitionError> {
        match self {
            Self::Sphere(label) => board.choose_sphere_electrode(&label),
            Self::Head(index) => board.choose_head_electrode(index),
        }
    }
}

/// Hover feedback and click-to-choose in both views.
pub fn correspondence_pointer_system(
    pointer: Res<PointerState>,
    scene: Res<CorrespondenceScene>,
    mut board: ResMut<CorrespondenceBoard>,
    mut cursor_hint: ResMut<CursorHint>,
    cameras: Query<(&Camera, &GlobalTransform, &CorrespondenceView)>,
    sphere_markers: Query<(&SphereElectrodeMarker, &GlobalTransform)>,
    head_markers: Query<(&HeadElectrodeMarker, &GlobalTransform)>,
    heads: Query<&PickSurface, With<HeadMesh>>,
) {
    let hovered = pointer.cursor().and_then(|cursor| {
        cameras.iter().find_map(|(camera, camera_transform, view)| {
            let ray = cursor_ray(camera, camera_transform, cursor)?;
            let (origin, direction) = (ray.origin, *ray.direction);
            match view {
                CorrespondenceView::Sphere => {
                    let hit = nearest_marker_hit(
                        origin,
                        direction,
                        sphere_markers
                            .iter()
                            .map(|(m, t)| (m.0.as_str(), t.translation())),
                        SPHERE_ELECTRODE_RADIUS,
                    );
                    let surface = ray_sphere_hit(origin, direction, Vec3::ZERO, REFERENCE_SPHERE_RADIUS);
                    unoccluded(hit, surface, SPHERE_ELECTRODE_RADIUS)
                        .map(|label| ElectrodePick::Sphere(label.to_string()))
                }
                CorrespondenceView::Head => {
                    let radius = scene.head_marker_radius?;
                    let hit = nearest_marker_hit(
                        origin,
                        direction,
                        head_markers.iter().map(|(m, t)| (m.0, t.translation())),
                        radius,
                    );
                    let surface = heads
                        .single()
                        .ok()
                        .and_then(|PickSurface(s)| s.cast(origin, direction))
                        .map(|h| h.distance);
                    unoccluded(hit, surface, radius).map(ElectrodePick::Head)
                }
            }
        })
    });

    if let (Some(_), Some(pick)) = (pointer.clicked(), hovered.clone()) {
        debug!("Choosing {pick:?}");
        if let Err(err) = pick.apply(&mut board) {
            debug!("Electrode click ignored: {err}");
        }
    }

    let next_hint = if hovered.is_some() {
        CursorHint::Pointer
    } else {
        CursorHint::Default
    };
    cursor_hint.set_if_neq(next_hint);
}

/// Side-panel edits of the pairing board.
pub fn handle_correspondence_commands(
    mut commands: EventReader<SessionCommand>,
    mut board: ResMut<CorrespondenceBoard>,
) {
    for command in commands.read() {
        let result = match command {
            SessionCommand::ChooseSphereElectrode(Some(label)) => board.choose_sphere_electrode(label),
            SessionCommand::ChooseSphereElectrode(None) => board.clear_sphere_electrode(),
            SessionCommand::ChooseHeadElectrode(Some(index)) => board.choose_head_electrode(*index),
            SessionCommand::ChooseHeadElectrode(None) => board.clear_head_electrode(),
            SessionCommand::ConfirmConnection => board.confirm().map(|index| {
                info!("Confirmed connection {index}");
            }),
            SessionCommand::RemoveConnection(index) => board.remove(*index).map(|pair| {
                info!("Removed connection {} <-> head #{}", pair.sphere_label, pair.head_index);
            }),
            SessionCommand::ReportState => {
                board.set_changed();
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            debug!("{command:?} ignored: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_in_front_of_surface_is_kept() {
        assert_eq!(unoccluded(Some(("Cz", 0.98)), Some(1.0), 0.02), Some("Cz"));
        assert_eq!(unoccluded(Some(("Cz", 0.98)), None, 0.02), Some("Cz"));
    }

    #[test]
    fn marker_behind_surface_is_dropped() {
        // Far side of the unit sphere seen from x = 2.
        assert_eq!(unoccluded(Some(("Oz", 2.98)), Some(1.0), 0.02), None);
        assert_eq!(unoccluded::<&str>(None, Some(1.0), 0.02), None);
    }

    #[test]
    fn picks_apply_to_board() {
        let mut board = CorrespondenceBoard::new(vec!["Fp1".to_string()], 2);
        ElectrodePick::Sphere("Fp1".into()).apply(&mut board).unwrap();
        ElectrodePick::Head(1).apply(&mut board).unwrap();
        assert_eq!(board.confirm(), Ok(0));
        assert!(ElectrodePick::Head(1).apply(&mut board).is_err());
    }
}
