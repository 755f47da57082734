use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::palette::ELECTRODE_2D_SELECTED_COLOUR;
use constants::render_settings::ELECTRODE_2D_RADIUS;
use constants::zoom::{DOUBLE_CLICK_ZOOM, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};

use crate::engine::camera::zoom_transform::ZoomTransform;
use crate::engine::systems::cursor_hint::CursorHint;
use crate::engine::systems::pointer::PointerState;
use crate::rpc::commands::SessionCommand;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::electrodes::gesture::{SelectionGesture, SelectionMode};
use crate::tools::electrodes::photo::view_to_world;
use crate::tools::electrodes::state::ElectrodeSet;
use crate::tools::transition::TransitionError;

/// An electrode marker being dragged in default mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointDrag {
    pub index: usize,
    /// Last in-image position under the cursor, in image pixels.
    pub preview: Option<Vec2>,
}

/// Pointer state of the electrode screen between frames.
#[derive(Resource, Debug, Default)]
pub struct ElectrodeInteraction {
    pub mode: SelectionMode,
    pub gesture: Option<SelectionGesture>,
    pub point_drag: Option<PointDrag>,
    pub panning: bool,
    /// Press that may be the second click of a double click. It only takes
    /// effect once it turns into a drag.
    pub deferred_press: Option<Vec2>,
}

impl ElectrodeInteraction {
    /// Position to draw an electrode at, following an in-flight drag.
    pub fn display_position(&self, index: usize, stored: Vec2) -> Vec2 {
        match self.point_drag {
            Some(PointDrag {
                index: dragged,
                preview: Some(preview),
            }) if dragged == index => preview,
            _ => stored,
        }
    }

    /// Left button went down at a view position. Returns whether the
    /// electrode set changed.
    pub fn press(&mut self, set: &mut ElectrodeSet, zoom: &ZoomTransform, at: Vec2) -> bool {
        match self.mode {
            SelectionMode::Default => {
                let Some(index) = set.hit_test(zoom.apply_inverse(at), ELECTRODE_2D_RADIUS) else {
                    return false;
                };
                self.point_drag = Some(PointDrag { index, preview: None });
                set.click_select(index).is_ok()
            }
            SelectionMode::Lasso | SelectionMode::Rectangle => {
                self.gesture = SelectionGesture::begin(self.mode, at);
                set.begin_selection();
                false
            }
        }
    }

    /// Hold a press back until it is known not to be the second click of a
    /// double click.
    pub fn defer_press(&mut self, at: Vec2) {
        self.deferred_press = Some(at);
    }

    /// Cursor moved while the button is held and the press became a drag.
    pub fn drag(&mut self, set: &mut ElectrodeSet, zoom: &mut ZoomTransform, at: Vec2, delta: Vec2) -> bool {
        let pressed = match self.deferred_press.take() {
            Some(start) => self.press(set, zoom, start),
            None => false,
        };

        if let Some(point_drag) = &mut self.point_drag {
            let image_point = zoom.apply_inverse(at);
            if set.contains_image_point(image_point) {
                point_drag.preview = Some(image_point);
            }
            return pressed;
        }

        if let Some(gesture) = &mut self.gesture {
            if gesture.push(at) {
                set.expand_selection(&gesture.image_polygon(zoom));
                return true;
            }
            return pressed;
        }

        if self.mode == SelectionMode::Default {
            self.panning = true;
            zoom.pan(delta);
        }
        pressed
    }

    /// Left button came up. `at` is `None` when released outside the window.
    pub fn release(
        &mut self,
        set: &mut ElectrodeSet,
        zoom: &ZoomTransform,
        at: Option<Vec2>,
        was_drag: bool,
    ) -> bool {
        // The second click of a double click only zooms.
        if self.deferred_press.take().is_some() && !was_drag {
            return false;
        }

        if let Some(point_drag) = self.point_drag.take() {
            // Dropping outside the image abandons the move.
            let target = at.map(|p| zoom.apply_inverse(p)).filter(|p| set.contains_image_point(*p));
            return match (was_drag, target) {
                (true, Some(point)) => set.move_point(point_drag.index, point).is_ok(),
                _ => false,
            };
        }

        if self.gesture.is_some() {
            return self.finish_gesture(set, zoom);
        }

        if std::mem::take(&mut self.panning) {
            return false;
        }

        match (self.mode, was_drag, at) {
            (SelectionMode::Default, false, Some(at)) => match set.add_point(zoom.apply_inverse(at)) {
                Ok(index) => {
                    debug!("Added electrode {index}");
                    true
                }
                Err(err) => {
                    debug!("Click ignored: {err}");
                    false
                }
            },
            _ => false,
        }
    }

    /// Resolve an in-flight lasso or rectangle with its final outline.
    pub fn finish_gesture(&mut self, set: &mut ElectrodeSet, zoom: &ZoomTransform) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                set.finish_selection(&gesture.image_polygon(zoom));
                true
            }
            None => false,
        }
    }

    /// The pointer is gone: finish selections and drop drags.
    pub fn cancel(&mut self, set: &mut ElectrodeSet, zoom: &ZoomTransform) -> bool {
        self.point_drag = None;
        self.deferred_press = None;
        self.panning = false;
        self.finish_gesture(set, zoom)
    }

    /// Delete the selected electrodes. A marker drag in flight is dropped
    /// since its index no longer names the same electrode.
    pub fn remove_selected(&mut self, set: &mut ElectrodeSet) -> usize {
        let removed = set.remove_selected();
        if removed > 0 {
            self.point_drag = None;
        }
        removed
    }

    /// Delete one electrode by index, dropping any marker drag in flight.
    pub fn remove_electrode(&mut self, set: &mut ElectrodeSet, index: usize) -> Result<(), TransitionError> {
        set.remove_point(index)?;
        self.point_drag = None;
        Ok(())
    }

    pub fn cursor_hint(&self, hovering_electrode: bool) -> CursorHint {
        match self.mode {
            SelectionMode::Lasso | SelectionMode::Rectangle => CursorHint::Crosshair,
            SelectionMode::Default if self.point_drag.is_some() || hovering_electrode => CursorHint::Move,
            SelectionMode::Default if self.panning => CursorHint::Grabbing,
            SelectionMode::Default => CursorHint::Default,
        }
    }
}

/// Pan, zoom, add, move and area-select on the photo.
pub fn electrode_pointer_system(
    pointer: Res<PointerState>,
    mut scroll_events: EventReader<MouseWheel>,
    mut interaction: ResMut<ElectrodeInteraction>,
    mut set: ResMut<ElectrodeSet>,
    mut zoom: ResMut<ZoomTransform>,
    mut cursor_hint: ResMut<CursorHint>,
) {
    let drag_before = interaction.point_drag;
    let gesture_before = interaction.gesture.is_some();
    let state = interaction.bypass_change_detection();
    let electrodes = set.bypass_change_detection();
    let mut set_changed = false;

    for event in scroll_events.read() {
        let (Some(cursor), false) = (pointer.cursor(), event.y == 0.0) else {
            continue;
        };
        let factor = if event.y > 0.0 { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        zoom.scale_about(cursor, factor);
    }
    if let Some(at) = pointer.double_clicked() {
        zoom.scale_about(at, DOUBLE_CLICK_ZOOM);
    }

    if pointer.left_window() {
        set_changed |= state.cancel(electrodes, &zoom);
    }

    if let Some(at) = pointer.just_pressed() {
        if pointer.is_repeat_press() {
            state.defer_press(at);
        } else {
            set_changed |= state.press(electrodes, &zoom, at);
        }
    }

    if pointer.is_dragging() {
        if let Some(at) = pointer.cursor() {
            set_changed |= state.drag(electrodes, &mut zoom, at, pointer.delta());
        }
    }

    if let Some(release) = pointer.released() {
        set_changed |= state.release(electrodes, &zoom, release.at, release.was_drag);
    }

    let hovering = pointer
        .cursor()
        .and_then(|c| electrodes.hit_test(zoom.apply_inverse(c), ELECTRODE_2D_RADIUS))
        .is_some();
    cursor_hint.set_if_neq(state.cursor_hint(hovering));

    if set_changed {
        set.set_changed();
    }
    if drag_before != interaction.point_drag || gesture_before != interaction.gesture.is_some() {
        interaction.set_changed();
    }
}

/// Mode switches and removals requested from the side panel.
pub fn handle_electrode_commands(
    mut commands: EventReader<SessionCommand>,
    mut interaction: ResMut<ElectrodeInteraction>,
    set: Option<ResMut<ElectrodeSet>>,
    zoom: Option<Res<ZoomTransform>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let mut set = set;
    for command in commands.read() {
        match command {
            SessionCommand::SetSelectionMode(mode) => {
                if interaction.mode == *mode {
                    continue;
                }
                if let (Some(set), Some(zoom)) = (set.as_mut(), zoom.as_ref()) {
                    if interaction.finish_gesture(set, zoom) {
                        set.set_changed();
                    }
                }
                interaction.point_drag = None;
                interaction.panning = false;
                interaction.mode = *mode;
                info!("Selection mode: {}", mode.as_str());
                rpc_interface.send_notification(
                    "selection_mode_changed",
                    serde_json::json!({ "mode": mode.as_str() }),
                );
            }
            SessionCommand::RemoveSelectedElectrodes => {
                if let Some(set) = set.as_mut() {
                    let removed = interaction.remove_selected(set);
                    info!("Removed {removed} selected electrodes");
                }
            }
            SessionCommand::RemoveElectrode(index) => {
                if let Some(set) = set.as_mut() {
                    match interaction.remove_electrode(set, *index) {
                        Ok(()) => info!("Removed electrode {index}"),
                        Err(err) => debug!("remove_electrode ignored: {err}"),
                    }
                }
            }
            SessionCommand::ReportState => {
                if let Some(set) = set.as_mut() {
                    set.set_changed();
                }
                rpc_interface.send_notification(
                    "selection_mode_changed",
                    serde_json::json!({ "mode": interaction.mode.as_str() }),
                );
            }
            _ => {}
        }
    }
}

/// Outline of the lasso or rectangle being drawn.
pub fn draw_selection_outline(
    mut gizmos: Gizmos,
    interaction: Res<ElectrodeInteraction>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(gesture) = &interaction.gesture else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let window_size = window.size();
    let mut outline: Vec<Vec2> = gesture
        .view_polygon()
        .into_iter()
        .map(|p| view_to_world(p, window_size))
        .collect();
    if let Some(first) = outline.first().copied() {
        outline.push(first);
    }
    gizmos.linestrip_2d(outline, ELECTRODE_2D_SELECTED_COLOUR);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ElectrodeInteraction, ElectrodeSet, ZoomTransform) {
        let mut set = ElectrodeSet::new(Vec2::new(200.0, 100.0));
        set.add_point(Vec2::new(50.0, 50.0)).unwrap();
        set.add_point(Vec2::new(150.0, 50.0)).unwrap();
        let mut zoom = ZoomTransform::default();
        zoom.scale = Vec2::splat(2.0);
        zoom.translate = Vec2::new(10.0, 10.0);
        (ElectrodeInteraction::default(), set, zoom)
    }

    #[test]
    fn click_on_empty_space_adds_inverse_mapped_point() {
        let (mut interaction, mut set, zoom) = setup();
        assert!(!interaction.press(&mut set, &zoom, Vec2::new(210.0, 170.0)));
        assert!(interaction.release(&mut set, &zoom, Some(Vec2::new(210.0, 170.0)), false));
        assert_eq!(set.len(), 3);
        assert_eq!(set.electrodes()[2].position, Vec2::new(100.0, 80.0));
    }

    #[test]
    fn click_outside_image_adds_nothing() {
        let (mut interaction, mut set, zoom) = setup();
        interaction.press(&mut set, &zoom, Vec2::new(900.0, 900.0));
        assert!(!interaction.release(&mut set, &zoom, Some(Vec2::new(900.0, 900.0)), false));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn dragging_empty_space_pans() {
        let (mut interaction, mut set, mut zoom) = setup();
        interaction.press(&mut set, &zoom, Vec2::new(210.0, 170.0));
        interaction.drag(&mut set, &mut zoom, Vec2::new(220.0, 170.0), Vec2::new(10.0, 0.0));
        assert!(interaction.panning);
        assert_eq!(zoom.translate, Vec2::new(20.0, 10.0));

        assert!(!interaction.release(&mut set, &zoom, Some(Vec2::new(220.0, 170.0)), true));
        assert_eq!(set.len(), 2);
        assert!(!interaction.panning);
    }

    #[test]
    fn marker_drag_moves_on_release_inside_image() {
        let (mut interaction, mut set, mut zoom) = setup();
        // Electrode 0 sits at view (110, 110).
        assert!(interaction.press(&mut set, &zoom, Vec2::new(112.0, 110.0)));
        assert!(set.electrodes()[0].selected);

        interaction.drag(&mut set, &mut zoom, Vec2::new(50.0, 50.0), Vec2::new(-62.0, -60.0));
        assert_eq!(interaction.display_position(0, Vec2::ZERO), Vec2::new(20.0, 20.0));
        assert_eq!(zoom.translate, Vec2::new(10.0, 10.0));

        assert!(interaction.release(&mut set, &zoom, Some(Vec2::new(50.0, 50.0)), true));
        assert_eq!(set.electrodes()[0].position, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn marker_drop_outside_image_aborts() {
        let (mut interaction, mut set, mut zoom) = setup();
        interaction.press(&mut set, &zoom, Vec2::new(110.0, 110.0));
        interaction.drag(&mut set, &mut zoom, Vec2::new(900.0, 900.0), Vec2::new(790.0, 790.0));
        assert_eq!(interaction.point_drag.unwrap().preview, None);

        assert!(!interaction.release(&mut set, &zoom, Some(Vec2::new(900.0, 900.0)), true));
        assert_eq!(set.electrodes()[0].position, Vec2::new(50.0, 50.0));
        assert!(interaction.point_drag.is_none());
    }

    #[test]
    fn rectangle_gesture_previews_then_selects() {
        let (mut interaction, mut set, mut zoom) = setup();
        interaction.mode = SelectionMode::Rectangle;
        interaction.press(&mut set, &zoom, Vec2::new(0.0, 0.0));
        assert!(set.gesture_active());

        interaction.drag(&mut set, &mut zoom, Vec2::new(200.0, 200.0), Vec2::ZERO);
        assert!(set.electrodes()[0].possibly_selected);
        assert!(!set.electrodes()[0].selected);
        assert!(!set.electrodes()[1].possibly_selected);

        assert!(interaction.release(&mut set, &zoom, Some(Vec2::new(200.0, 200.0)), true));
        assert!(set.electrodes()[0].selected);
        assert!(!set.electrodes()[0].possibly_selected);
        assert!(!set.electrodes()[1].selected);
        assert!(!set.gesture_active());
    }

    #[test]
    fn lasso_without_enough_points_selects_nothing() {
        let (mut interaction, mut set, mut zoom) = setup();
        set.click_select(1).unwrap();
        interaction.mode = SelectionMode::Lasso;
        interaction.press(&mut set, &zoom, Vec2::new(0.0, 0.0));
        interaction.drag(&mut set, &mut zoom, Vec2::new(300.0, 0.0), Vec2::ZERO);
        interaction.release(&mut set, &zoom, Some(Vec2::new(300.0, 0.0)), true);
        assert_eq!(set.selected_count(), 0);
    }

    #[test]
    fn cancel_finishes_gesture_and_clears_preview() {
        let (mut interaction, mut set, mut zoom) = setup();
        interaction.mode = SelectionMode::Lasso;
        interaction.press(&mut set, &zoom, Vec2::new(0.0, 0.0));
        interaction.drag(&mut set, &mut zoom, Vec2::new(300.0, 0.0), Vec2::ZERO);
        interaction.drag(&mut set, &mut zoom, Vec2::new(300.0, 300.0), Vec2::ZERO);
        interaction.drag(&mut set, &mut zoom, Vec2::new(0.0, 300.0), Vec2::ZERO);
        assert!(set.electrodes()[0].possibly_selected);

        assert!(interaction.cancel(&mut set, &zoom));
        assert!(interaction.gesture.is_none());
        assert!(set.electrodes().iter().all(|e| !e.possibly_selected));
        assert!(set.electrodes()[0].selected);
    }

    fn double_click(interaction: &mut ElectrodeInteraction, set: &mut ElectrodeSet, zoom: &ZoomTransform, at: Vec2) {
        interaction.press(set, zoom, at);
        interaction.release(set, zoom, Some(at), false);
        interaction.defer_press(at);
        interaction.release(set, zoom, Some(at), false);
    }

    #[test]
    fn second_click_of_double_click_keeps_selection() {
        let (mut interaction, mut set, zoom) = setup();
        set.click_select(1).unwrap();

        double_click(&mut interaction, &mut set, &zoom, Vec2::new(210.0, 170.0));

        assert_eq!(set.len(), 3);
        assert!(set.electrodes()[1].selected);
        assert!(!set.electrodes()[2].selected);
        assert!(interaction.point_drag.is_none());
        assert!(interaction.deferred_press.is_none());
    }

    #[test]
    fn double_click_in_lasso_mode_leaves_no_gesture() {
        let (mut interaction, mut set, zoom) = setup();
        set.click_select(0).unwrap();
        interaction.mode = SelectionMode::Lasso;

        double_click(&mut interaction, &mut set, &zoom, Vec2::new(50.0, 50.0));

        assert!(interaction.gesture.is_none());
        assert!(!set.gesture_active());
        assert!(set.electrodes().iter().all(|e| !e.possibly_selected));
    }

    #[test]
    fn deferred_press_that_drags_starts_a_gesture() {
        let (mut interaction, mut set, mut zoom) = setup();
        interaction.mode = SelectionMode::Rectangle;
        interaction.defer_press(Vec2::ZERO);
        interaction.drag(&mut set, &mut zoom, Vec2::new(200.0, 200.0), Vec2::ZERO);
        assert!(set.gesture_active());
        assert!(set.electrodes()[0].possibly_selected);

        assert!(interaction.release(&mut set, &zoom, Some(Vec2::new(200.0, 200.0)), true));
        assert!(set.electrodes()[0].selected);
        assert!(!set.gesture_active());
    }

    #[test]
    fn removing_electrodes_drops_marker_drag() {
        let (mut interaction, mut set, mut zoom) = setup();
        interaction.press(&mut set, &zoom, Vec2::new(310.0, 110.0));
        interaction.drag(&mut set, &mut zoom, Vec2::new(320.0, 120.0), Vec2::new(10.0, 10.0));
        assert_eq!(interaction.point_drag.map(|d| d.index), Some(1));

        set.click_select(0).unwrap();
        assert_eq!(interaction.remove_selected(&mut set), 1);
        assert!(interaction.point_drag.is_none());

        assert!(!interaction.release(&mut set, &zoom, Some(Vec2::new(320.0, 120.0)), true));
        assert_eq!(set.electrodes()[0].position, Vec2::new(150.0, 50.0));
    }

    #[test]
    fn remove_electrode_by_index() {
        let (mut interaction, mut set, _) = setup();
        interaction.remove_electrode(&mut set, 0).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.electrodes()[0].position, Vec2::new(150.0, 50.0));
        assert_eq!(
            interaction.remove_electrode(&mut set, 4),
            Err(TransitionError::IndexOutOfRange { index: 4, len: 1 })
        );
    }

    #[test]
    fn cursor_hints_follow_mode_and_hover() {
        let mut interaction = ElectrodeInteraction::default();
        assert_eq!(interaction.cursor_hint(false), CursorHint::Default);
        assert_eq!(interaction.cursor_hint(true), CursorHint::Move);
        interaction.panning = true;
        assert_eq!(interaction.cursor_hint(false), CursorHint::Grabbing);
        interaction.mode = SelectionMode::Lasso;
        assert_eq!(interaction.cursor_hint(true), CursorHint::Crosshair);
    }
}
