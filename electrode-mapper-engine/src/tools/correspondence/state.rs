use bevy::prelude::*;
use constants::palette::{CONNECTION_COLOUR_HEX, REQUIRED_CONNECTIONS};

use crate::tools::transition::{TransitionError, check_index};

/// A completed pairing of a reference-sphere electrode with a head electrode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectrodePair {
    pub sphere_label: String,
    pub head_index: usize,
}

/// The pairing currently being filled in from the two viewports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub sphere_label: Option<String>,
    pub head_index: Option<usize>,
}

impl Connection {
    fn complete(&self) -> Option<ElectrodePair> {
        Some(ElectrodePair {
            sphere_label: self.sphere_label.clone()?,
            head_index: self.head_index?,
        })
    }
}

/// Pairing state for the correspondence screen.
///
/// Holds up to `required` completed pairs. While fewer than that exist, one
/// extra connection is being edited. An electrode that belongs to a
/// completed pair cannot be chosen again.
#[derive(Resource, Debug, Clone)]
pub struct CorrespondenceBoard {
    connections: Vec<ElectrodePair>,
    editing: Option<Connection>,
    required: usize,
    sphere_labels: Vec<String>,
    head_count: usize,
}

impl Default for CorrespondenceBoard {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}

impl CorrespondenceBoard {
    pub fn new(sphere_labels: Vec<String>, head_count: usize) -> Self {
        Self::with_required(sphere_labels, head_count, REQUIRED_CONNECTIONS)
    }

    pub fn with_required(sphere_labels: Vec<String>, head_count: usize, required: usize) -> Self {
        Self {
            connections: Vec::new(),
            editing: (required > 0).then(Connection::default),
            required,
            sphere_labels,
            head_count,
        }
    }

    pub fn connections(&self) -> &[ElectrodePair] {
        &self.connections
    }

    pub fn editing(&self) -> Option<&Connection> {
        self.editing.as_ref()
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn sphere_labels(&self) -> &[String] {
        &self.sphere_labels
    }

    /// Whether every required pair has been confirmed.
    pub fn is_done(&self) -> bool {
        self.connections.len() >= self.required
    }

    pub fn choose_sphere_electrode(&mut self, label: &str) -> Result<(), TransitionError> {
        if !self.sphere_labels.iter().any(|l| l == label) {
            return Err(TransitionError::UnknownElectrode(label.to_string()));
        }
        if self.connections.iter().any(|c| c.sphere_label == label) {
            return Err(TransitionError::AlreadyPaired(label.to_string()));
        }
        let editing = self.editing.as_mut().ok_or(TransitionError::NotEditing)?;
        editing.sphere_label = Some(label.to_string());
        Ok(())
    }

    pub fn choose_head_electrode(&mut self, index: usize) -> Result<(), TransitionError> {
        check_index(index, self.head_count)?;
        if self.connections.iter().any(|c| c.head_index == index) {
            return Err(TransitionError::AlreadyPaired(format!("head #{index}")));
        }
        let editing = self.editing.as_mut().ok_or(TransitionError::NotEditing)?;
        editing.head_index = Some(index);
        Ok(())
    }

    pub fn clear_sphere_electrode(&mut self) -> Result<(), TransitionError> {
        let editing = self.editing.as_mut().ok_or(TransitionError::NotEditing)?;
        editing.sphere_label = None;
        Ok(())
    }

    pub fn clear_head_electrode(&mut self) -> Result<(), TransitionError> {
        let editing = self.editing.as_mut().ok_or(TransitionError::NotEditing)?;
        editing.head_index = None;
        Ok(())
    }

    /// Append the edited connection. Editing restarts with an empty
    /// connection until the required count is reached, then stops.
    pub fn confirm(&mut self) -> Result<usize, TransitionError> {
        let editing = self.editing.as_ref().ok_or(TransitionError::NotEditing)?;
        let pair = editing.complete().ok_or(TransitionError::Incomplete)?;

        self.connections.push(pair);
        self.editing = (self.connections.len() < self.required).then(Connection::default);
        Ok(self.connections.len() - 1)
    }

    /// Drop a completed pair. Editing resumes if the board was full.
    pub fn remove(&mut self, index: usize) -> Result<ElectrodePair, TransitionError> {
        check_index(index, self.connections.len())?;
        let was_full = self.connections.len() >= self.required;
        let removed = self.connections.remove(index);
        if was_full && self.editing.is_none() {
            self.editing = Some(Connection::default());
        }
        Ok(removed)
    }

    /// Palette slot for a sphere electrode, or `None` when it is unpaired.
    pub fn sphere_colour_slot(&self, label: &str) -> Option<usize> {
        self.connections
            .iter()
            .position(|c| c.sphere_label == label)
            .or_else(|| {
                self.editing
                    .as_ref()
                    .filter(|e| e.sphere_label.as_deref() == Some(label))
                    .map(|_| self.connections.len())
            })
    }

    /// Palette slot for a head electrode, or `None` when it is unpaired.
    pub fn head_colour_slot(&self, index: usize) -> Option<usize> {
        self.connections
            .iter()
            .position(|c| c.head_index == index)
            .or_else(|| {
                self.editing
                    .as_ref()
                    .filter(|e| e.head_index == Some(index))
                    .map(|_| self.connections.len())
            })
    }

    /// JSON snapshot for the side panel.
    pub fn to_json(&self) -> serde_json::Value {
        let colour = |slot: usize| CONNECTION_COLOUR_HEX.get(slot).copied();
        serde_json::json!({
            "required": self.required,
            "done": self.is_done(),
            "connections": self.connections.iter().enumerate().map(|(i, c)| serde_json::json!({
                "sphere_label": c.sphere_label,
                "head_index": c.head_index,
                "colour": colour(i),
            })).collect::<Vec<_>>(),
            "editing": self.editing.as_ref().map(|e| serde_json::json!({
                "sphere_label": e.sphere_label,
                "head_index": e.head_index,
                "colour": colour(self.connections.len()),
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> CorrespondenceBoard {
        let labels = ["Fp1", "Fp2", "Cz", "Oz"].iter().map(|s| s.to_string()).collect();
        CorrespondenceBoard::new(labels, 10)
    }

    fn pair(board: &mut CorrespondenceBoard, label: &str, head: usize) {
        board.choose_sphere_electrode(label).unwrap();
        board.choose_head_electrode(head).unwrap();
        board.confirm().unwrap();
    }

    #[test]
    fn confirm_requires_both_sides() {
        let mut board = board();
        assert_eq!(board.confirm(), Err(TransitionError::Incomplete));
        board.choose_sphere_electrode("Fp1").unwrap();
        assert_eq!(board.confirm(), Err(TransitionError::Incomplete));
        board.choose_head_electrode(4).unwrap();
        assert_eq!(board.confirm(), Ok(0));
        assert_eq!(board.editing(), Some(&Connection::default()));
    }

    #[test]
    fn editing_ends_at_required_count() {
        let mut board = board();
        pair(&mut board, "Fp1", 0);
        pair(&mut board, "Fp2", 1);
        pair(&mut board, "Cz", 2);

        assert!(board.is_done());
        assert!(board.editing().is_none());
        assert_eq!(board.choose_sphere_electrode("Oz"), Err(TransitionError::NotEditing));
        assert_eq!(board.confirm(), Err(TransitionError::NotEditing));
    }

    #[test]
    fn paired_electrodes_cannot_be_reused() {
        let mut board = board();
        pair(&mut board, "Fp1", 3);

        assert!(matches!(board.choose_sphere_electrode("Fp1"), Err(TransitionError::AlreadyPaired(_))));
        assert!(matches!(board.choose_head_electrode(3), Err(TransitionError::AlreadyPaired(_))));
        assert_eq!(board.editing(), Some(&Connection::default()));
    }

    #[test]
    fn unknown_electrodes_are_rejected() {
        let mut board = board();
        assert!(matches!(board.choose_sphere_electrode("T9"), Err(TransitionError::UnknownElectrode(_))));
        assert_eq!(
            board.choose_head_electrode(10),
            Err(TransitionError::IndexOutOfRange { index: 10, len: 10 })
        );
    }

    #[test]
    fn removing_from_full_board_resumes_editing() {
        let mut board = board();
        pair(&mut board, "Fp1", 0);
        pair(&mut board, "Fp2", 1);
        pair(&mut board, "Cz", 2);

        let removed = board.remove(1).unwrap();
        assert_eq!(removed.sphere_label, "Fp2");
        assert_eq!(board.connections().len(), 2);
        assert_eq!(board.editing(), Some(&Connection::default()));

        // The freed electrode can be paired again.
        board.choose_sphere_electrode("Fp2").unwrap();
        assert!(board.remove(5).is_err());
    }

    #[test]
    fn removing_while_editing_keeps_partial() {
        let mut board = board();
        pair(&mut board, "Fp1", 0);
        board.choose_sphere_electrode("Cz").unwrap();
        board.remove(0).unwrap();
        assert_eq!(board.editing().and_then(|e| e.sphere_label.as_deref()), Some("Cz"));
    }

    #[test]
    fn clearing_fields() {
        let mut board = board();
        board.choose_sphere_electrode("Oz").unwrap();
        board.choose_head_electrode(9).unwrap();
        board.clear_sphere_electrode().unwrap();
        board.clear_head_electrode().unwrap();
        assert_eq!(board.editing(), Some(&Connection::default()));
    }

    #[test]
    fn colour_slots_follow_connection_order() {
        let mut board = board();
        pair(&mut board, "Fp1", 5);
        board.choose_sphere_electrode("Cz").unwrap();
        board.choose_head_electrode(7).unwrap();

        assert_eq!(board.sphere_colour_slot("Fp1"), Some(0));
        assert_eq!(board.head_colour_slot(5), Some(0));
        assert_eq!(board.sphere_colour_slot("Cz"), Some(1));
        assert_eq!(board.head_colour_slot(7), Some(1));
        assert_eq!(board.sphere_colour_slot("Oz"), None);
        assert_eq!(board.head_colour_slot(0), None);

        let json = board.to_json();
        assert_eq!(json["connections"][0]["colour"], "#ff00ff");
        assert_eq!(json["editing"]["colour"], "#ff0000");
    }
}
