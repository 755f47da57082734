use bevy::prelude::*;
use constants::fiducial::FIDUCIAL_MAP;

use crate::tools::transition::{TransitionError, check_index};

/// A named anatomical landmark and, once placed, its position on the head mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Fiducial {
    pub name: &'static str,
    pub colour_hex: &'static str,
    pub colour: Color,
    pub position: Option<Vec3>,
}

/// Outcome of a pointer action on the fiducial screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FiducialUpdate {
    /// A click on the mesh placed (or re-placed) the active landmark.
    Assigned { index: usize, position: Vec3 },
    /// An existing marker was dragged across the mesh.
    Moved { index: usize, position: Vec3 },
}

impl FiducialUpdate {
    pub fn index(&self) -> usize {
        match self {
            Self::Assigned { index, .. } | Self::Moved { index, .. } => *index,
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Self::Assigned { position, .. } | Self::Moved { position, .. } => *position,
        }
    }
}

/// Landmark placement sequence for one visit of the fiducial screen.
///
/// The active ("selecting") index always points into the landmark list.
/// After each placement it moves to the lowest landmark still lacking a
/// position, or one step forward (clamped to the last landmark) when all
/// are placed.
#[derive(Resource, Debug, Clone)]
pub struct FiducialSelection {
    fiducials: Vec<Fiducial>,
    selecting: usize,
}

impl Default for FiducialSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl FiducialSelection {
    pub fn new() -> Self {
        let fiducials = FIDUCIAL_MAP
            .iter()
            .map(|info| Fiducial {
                name: info.name,
                colour_hex: info.colour_hex,
                colour: info.colour,
                position: None,
            })
            .collect();

        Self {
            fiducials,
            selecting: 0,
        }
    }

    pub fn fiducials(&self) -> &[Fiducial] {
        &self.fiducials
    }

    pub fn selecting_index(&self) -> usize {
        self.selecting
    }

    pub fn selecting(&self) -> &Fiducial {
        &self.fiducials[self.selecting]
    }

    /// Make a landmark the active one, as the side panel does on click.
    pub fn select(&mut self, index: usize) -> Result<(), TransitionError> {
        check_index(index, self.fiducials.len())?;
        self.selecting = index;
        Ok(())
    }

    /// Place the active landmark at a surface point and advance.
    pub fn pick(&mut self, position: Vec3) -> FiducialUpdate {
        let index = self.selecting;
        self.fiducials[index].position = Some(position);

        self.selecting = match self.next_unassigned() {
            Some(next) => next,
            None => (index + 1).min(self.fiducials.len() - 1),
        };

        FiducialUpdate::Assigned { index, position }
    }

    /// Move an already placed landmark. The active index is left alone.
    pub fn drag(&mut self, index: usize, position: Vec3) -> Result<FiducialUpdate, TransitionError> {
        check_index(index, self.fiducials.len())?;
        let fiducial = &mut self.fiducials[index];
        if fiducial.position.is_none() {
            return Err(TransitionError::NotAssigned(index));
        }
        fiducial.position = Some(position);
        Ok(FiducialUpdate::Moved { index, position })
    }

    pub fn next_unassigned(&self) -> Option<usize> {
        self.fiducials.iter().position(|f| f.position.is_none())
    }

    /// Whether the "Done" action is available.
    pub fn is_complete(&self) -> bool {
        self.fiducials.iter().all(|f| f.position.is_some())
    }

    /// Positions of placed landmarks, keyed by landmark index.
    pub fn placed(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.fiducials
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.position.map(|p| (i, p)))
    }

    /// JSON snapshot for the side panel.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "selecting_index": self.selecting,
            "done": self.is_complete(),
            "fiducials": self.fiducials.iter().map(|f| serde_json::json!({
                "name": f.name,
                "colour": f.colour_hex,
                "position": f.position.map(|p| [p.x, p.y, p.z]),
            })).collect::<Vec<_>>(),
        })
    }
}
