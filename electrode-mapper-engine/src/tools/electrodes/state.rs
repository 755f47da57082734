use bevy::prelude::*;

use crate::engine::picking::polygon::is_inside;
use crate::tools::transition::{TransitionError, check_index};

/// A point marked on the photo, stored in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Electrode2d {
    pub position: Vec2,
    pub selected: bool,
    /// Preview flag while a lasso or rectangle gesture is in flight.
    pub possibly_selected: bool,
}

impl Electrode2d {
    fn new(position: Vec2) -> Self {
        Self {
            position,
            selected: false,
            possibly_selected: false,
        }
    }

    /// Whether the marker should be drawn highlighted.
    pub fn highlighted(&self) -> bool {
        self.selected || self.possibly_selected
    }
}

/// Ordered electrode list for the photo screen. The index into the list is
/// the electrode's identity; removing one shifts every later index down.
#[derive(Resource, Debug, Clone, Default)]
pub struct ElectrodeSet {
    electrodes: Vec<Electrode2d>,
    image_size: Vec2,
    gesture_active: bool,
}

impl ElectrodeSet {
    pub fn new(image_size: Vec2) -> Self {
        Self {
            electrodes: Vec::new(),
            image_size,
            gesture_active: false,
        }
    }

    /// Seed the set from session data. Points off the image are dropped.
    pub fn with_points(image_size: Vec2, points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut set = Self::new(image_size);
        for point in points {
            if let Err(err) = set.add_point(point) {
                debug!("Skipping session electrode: {err}");
            }
        }
        set
    }

    pub fn electrodes(&self) -> &[Electrode2d] {
        &self.electrodes
    }

    pub fn image_size(&self) -> Vec2 {
        self.image_size
    }

    pub fn len(&self) -> usize {
        self.electrodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.electrodes.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.electrodes.iter().filter(|e| e.selected).count()
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture_active
    }

    /// Inclusive bounds test against `[0, width] x [0, height]`.
    pub fn contains_image_point(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.image_size.x && point.y <= self.image_size.y
    }

    pub fn add_point(&mut self, point: Vec2) -> Result<usize, TransitionError> {
        if !self.contains_image_point(point) {
            return Err(TransitionError::OutsideImage {
                x: point.x,
                y: point.y,
            });
        }
        self.electrodes.push(Electrode2d::new(point));
        Ok(self.electrodes.len() - 1)
    }

    pub fn remove_point(&mut self, index: usize) -> Result<Electrode2d, TransitionError> {
        check_index(index, self.electrodes.len())?;
        Ok(self.electrodes.remove(index))
    }

    /// Overwrite a position. Selection flags are untouched.
    pub fn move_point(&mut self, index: usize, point: Vec2) -> Result<(), TransitionError> {
        check_index(index, self.electrodes.len())?;
        self.electrodes[index].position = point;
        Ok(())
    }

    pub fn begin_selection(&mut self) {
        self.gesture_active = true;
    }

    /// Mark every electrode strictly inside the polygon as a preview match.
    /// Earlier preview marks are kept, and committed selection is not touched.
    pub fn expand_selection(&mut self, polygon: &[Vec2]) {
        for electrode in &mut self.electrodes {
            if is_inside(polygon, electrode.position) {
                electrode.possibly_selected = true;
            }
        }
    }

    /// Resolve the gesture: the selection becomes exactly the electrodes
    /// inside the final polygon and every preview flag is cleared.
    pub fn finish_selection(&mut self, polygon: &[Vec2]) {
        for electrode in &mut self.electrodes {
            electrode.selected = is_inside(polygon, electrode.position);
            electrode.possibly_selected = false;
        }
        self.gesture_active = false;
    }

    /// Replace the selection with a single electrode.
    pub fn click_select(&mut self, index: usize) -> Result<(), TransitionError> {
        check_index(index, self.electrodes.len())?;
        for (i, electrode) in self.electrodes.iter_mut().enumerate() {
            electrode.selected = i == index;
        }
        Ok(())
    }

    /// Delete every selected electrode and return how many went.
    pub fn remove_selected(&mut self) -> usize {
        let before = self.electrodes.len();
        self.electrodes.retain(|e| !e.selected);
        before - self.electrodes.len()
    }

    /// Topmost electrode whose marker disc covers an image-space point.
    /// Later electrodes are drawn on top, so they win ties.
    pub fn hit_test(&self, point: Vec2, radius: f32) -> Option<usize> {
        self.electrodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.position.distance_squared(point) <= radius * radius)
            .map(|(i, _)| i)
    }

    /// JSON summary for the "N of M selected" panel.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total": self.len(),
            "selected": self.selected_count(),
            "electrodes": self.electrodes.iter().map(|e| serde_json::json!({
                "x": e.position.x,
                "y": e.position.y,
                "selected": e.selected,
            })).collect::<Vec<_>>(),
        })
    }
}
