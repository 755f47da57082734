use bevy::prelude::*;

use crate::engine::camera::zoom_transform::ZoomTransform;

/// How a left-button gesture on the photo is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// Click to add, drag a marker to move it, drag empty space to pan.
    #[default]
    Default,
    Lasso,
    Rectangle,
}

impl SelectionMode {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "lasso" => Some(Self::Lasso),
            "rectangle" => Some(Self::Rectangle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Lasso => "lasso",
            Self::Rectangle => "rectangle",
        }
    }
}

/// Closed rectangle outline from two opposite corners.
pub fn rectangle_polygon(start: Vec2, end: Vec2) -> [Vec2; 4] {
    [start, Vec2::new(start.x, end.y), end, Vec2::new(end.x, start.y)]
}

/// An in-flight lasso or rectangle drag, recorded in view space.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionGesture {
    Lasso(Vec<Vec2>),
    Rectangle { start: Vec2, end: Vec2 },
}

impl SelectionGesture {
    pub fn begin(mode: SelectionMode, at: Vec2) -> Option<Self> {
        match mode {
            SelectionMode::Default => None,
            SelectionMode::Lasso => Some(Self::Lasso(vec![at])),
            SelectionMode::Rectangle => Some(Self::Rectangle { start: at, end: at }),
        }
    }

    /// Feed a cursor move. Returns whether the outline changed.
    pub fn push(&mut self, at: Vec2) -> bool {
        match self {
            Self::Lasso(points) => {
                if points.last() == Some(&at) {
                    return false;
                }
                points.push(at);
                true
            }
            Self::Rectangle { end, .. } => {
                if *end == at {
                    return false;
                }
                *end = at;
                true
            }
        }
    }

    /// Outline in view space, as drawn on screen.
    pub fn view_polygon(&self) -> Vec<Vec2> {
        match self {
            Self::Lasso(points) => points.clone(),
            Self::Rectangle { start, end } => rectangle_polygon(*start, *end).to_vec(),
        }
    }

    /// Outline mapped back into image space for hit-testing. Outlines with
    /// fewer than three vertices come back empty.
    pub fn image_polygon(&self, zoom: &ZoomTransform) -> Vec<Vec2> {
        let view = self.view_polygon();
        if view.len() < 3 {
            return Vec::new();
        }
        zoom.apply_inverse_all(&view)
    }
}
