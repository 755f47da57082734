use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::zoom::{DOUBLE_CLICK_WINDOW_SECS, DRAG_THRESHOLD_PX};

/// Left-button gesture tracking shared by every screen.
///
/// Updated once per frame before any interaction system runs. A press
/// becomes a drag once the cursor travels past a small threshold; a release
/// that never became a drag is a click.
#[derive(Resource, Debug, Clone, Default)]
pub struct PointerState {
    cursor: Option<Vec2>,
    delta: Vec2,
    pressed_at: Option<Vec2>,
    dragging: bool,
    just_pressed: Option<Vec2>,
    released: Option<PointerRelease>,
    double_clicked: Option<Vec2>,
    repeat_press: bool,
    left_window: bool,
    last_click_at: Option<f32>,
}

/// How a left-button press ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRelease {
    /// Cursor at release, `None` when it was outside the window.
    pub at: Option<Vec2>,
    pub was_drag: bool,
}

/// Raw inputs for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerInput {
    pub cursor: Option<Vec2>,
    pub just_pressed: bool,
    pub just_released: bool,
    pub now: f32,
}

impl PointerState {
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Cursor travel since last frame.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    pub fn pressed_at(&self) -> Option<Vec2> {
        self.pressed_at
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn just_pressed(&self) -> Option<Vec2> {
        self.just_pressed
    }

    pub fn released(&self) -> Option<PointerRelease> {
        self.released
    }

    /// Release position of a press that did not move.
    pub fn clicked(&self) -> Option<Vec2> {
        self.released.filter(|r| !r.was_drag).and_then(|r| r.at)
    }

    pub fn double_clicked(&self) -> Option<Vec2> {
        self.double_clicked
    }

    /// The current press followed a click closely enough to complete a
    /// double click if it is released without dragging.
    pub fn is_repeat_press(&self) -> bool {
        self.repeat_press
    }

    /// The cursor left the window this frame.
    pub fn left_window(&self) -> bool {
        self.left_window
    }

    pub fn advance(&mut self, input: PointerInput) {
        self.delta = match (self.cursor, input.cursor) {
            (Some(previous), Some(current)) => current - previous,
            _ => Vec2::ZERO,
        };
        self.left_window = self.cursor.is_some() && input.cursor.is_none();
        self.cursor = input.cursor;
        self.just_pressed = None;
        self.released = None;
        self.double_clicked = None;

        if input.just_pressed {
            if let Some(at) = input.cursor {
                self.pressed_at = Some(at);
                self.dragging = false;
                self.just_pressed = Some(at);
                self.repeat_press = self
                    .last_click_at
                    .is_some_and(|t| input.now - t <= DOUBLE_CLICK_WINDOW_SECS);
            }
        }

        if let (Some(start), Some(current)) = (self.pressed_at, input.cursor) {
            if !self.dragging && start.distance(current) > DRAG_THRESHOLD_PX {
                self.dragging = true;
            }
        }

        if input.just_released && self.pressed_at.is_some() {
            let release = PointerRelease {
                at: input.cursor,
                was_drag: self.dragging,
            };
            self.released = Some(release);
            self.pressed_at = None;
            self.dragging = false;

            self.last_click_at = match (release.was_drag, release.at) {
                (false, Some(at)) if self.repeat_press => {
                    self.double_clicked = Some(at);
                    None
                }
                (false, Some(_)) => Some(input.now),
                _ => None,
            };
            self.repeat_press = false;
        }
    }
}

/// Systems reading `PointerState` run after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointerSet;

pub fn update_pointer_state(
    mut pointer: ResMut<PointerState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
) {
    let cursor = windows.single().ok().and_then(|w| w.cursor_position());
    pointer.advance(PointerInput {
        cursor,
        just_pressed: mouse_button.just_pressed(MouseButton::Left),
        just_released: mouse_button.just_released(MouseButton::Left),
        now: time.elapsed_secs(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(cursor: Vec2, now: f32) -> PointerInput {
        PointerInput {
            cursor: Some(cursor),
            now,
            ..default()
        }
    }

    #[test]
    fn press_release_in_place_is_click() {
        let mut pointer = PointerState::default();
        pointer.advance(PointerInput {
            just_pressed: true,
            ..frame(Vec2::new(10.0, 10.0), 0.0)
        });
        assert_eq!(pointer.just_pressed(), Some(Vec2::new(10.0, 10.0)));

        pointer.advance(PointerInput {
            just_released: true,
            ..frame(Vec2::new(11.0, 10.0), 0.1)
        });
        assert_eq!(pointer.clicked(), Some(Vec2::new(11.0, 10.0)));
        assert!(!pointer.is_pressed());
    }

    #[test]
    fn moving_past_threshold_becomes_drag() {
        let mut pointer = PointerState::default();
        pointer.advance(PointerInput {
            just_pressed: true,
            ..frame(Vec2::ZERO, 0.0)
        });
        pointer.advance(frame(Vec2::new(10.0, 0.0), 0.1));
        assert!(pointer.is_dragging());
        assert_eq!(pointer.delta(), Vec2::new(10.0, 0.0));

        pointer.advance(PointerInput {
            just_released: true,
            ..frame(Vec2::new(12.0, 0.0), 0.2)
        });
        assert_eq!(pointer.released(), Some(PointerRelease { at: Some(Vec2::new(12.0, 0.0)), was_drag: true }));
        assert_eq!(pointer.clicked(), None);
    }

    #[test]
    fn two_quick_clicks_are_double_click() {
        let mut pointer = PointerState::default();
        let at = Vec2::new(5.0, 5.0);
        for (t, pressed) in [(0.0, true), (0.05, false), (0.1, true), (0.15, false)] {
            pointer.advance(PointerInput {
                just_pressed: pressed,
                just_released: !pressed,
                ..frame(at, t)
            });
        }
        assert_eq!(pointer.double_clicked(), Some(at));

        // A slow third click starts over.
        pointer.advance(PointerInput { just_pressed: true, ..frame(at, 2.0) });
        pointer.advance(PointerInput { just_released: true, ..frame(at, 2.05) });
        assert_eq!(pointer.double_clicked(), None);
    }

    #[test]
    fn second_press_is_flagged_before_release() {
        let mut pointer = PointerState::default();
        let at = Vec2::new(5.0, 5.0);
        pointer.advance(PointerInput { just_pressed: true, ..frame(at, 0.0) });
        assert!(!pointer.is_repeat_press());
        pointer.advance(PointerInput { just_released: true, ..frame(at, 0.05) });

        pointer.advance(PointerInput { just_pressed: true, ..frame(at, 0.1) });
        assert!(pointer.is_repeat_press());
        assert_eq!(pointer.double_clicked(), None);

        // Dragging the second press turns it into an ordinary drag.
        pointer.advance(frame(Vec2::new(20.0, 5.0), 0.15));
        pointer.advance(PointerInput { just_released: true, ..frame(Vec2::new(20.0, 5.0), 0.2) });
        assert_eq!(pointer.double_clicked(), None);
        assert!(!pointer.is_repeat_press());

        pointer.advance(PointerInput { just_pressed: true, ..frame(at, 0.25) });
        assert!(!pointer.is_repeat_press());
    }

    #[test]
    fn leaving_window_is_reported() {
        let mut pointer = PointerState::default();
        pointer.advance(frame(Vec2::ONE, 0.0));
        pointer.advance(PointerInput::default());
        assert!(pointer.left_window());
        pointer.advance(PointerInput::default());
        assert!(!pointer.left_window());
    }
}
