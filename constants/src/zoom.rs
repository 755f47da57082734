/// Margin factor around the photo when fitting it to the viewport.
pub const INITIAL_FIT_MARGIN: f32 = 1.1;

/// Scale bounds relative to the initial fitted scale.
pub const MIN_SCALE_FACTOR: f32 = 0.5;
pub const MAX_SCALE_FACTOR: f32 = 16.0;

pub const WHEEL_ZOOM_IN: f32 = 1.1;
pub const WHEEL_ZOOM_OUT: f32 = 0.9;
pub const DOUBLE_CLICK_ZOOM: f32 = 1.1;

/// Seconds between two clicks to count as a double click.
pub const DOUBLE_CLICK_WINDOW_SECS: f32 = 0.3;

/// Pointer travel, in logical pixels, before a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f32 = 3.0;
