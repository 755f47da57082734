use bevy::color::Color;

pub struct FiducialInfo {
    pub name: &'static str,
    pub colour_hex: &'static str,
    pub colour: Color,
}

/// Anatomical landmarks in the order the user is asked to place them.
pub const FIDUCIAL_MAP: &[FiducialInfo] = &[
    FiducialInfo {
        name: "Nasion",
        colour_hex: "#ff00ff",
        colour: Color::srgb(1.0, 0.0, 1.0),
    },
    FiducialInfo {
        name: "Right ear helix-tragus junction",
        colour_hex: "#ff0000",
        colour: Color::srgb(1.0, 0.0, 0.0),
    },
    FiducialInfo {
        name: "Left ear helix-tragus junction",
        colour_hex: "#66dd99",
        colour: Color::srgb(0.4, 0.867, 0.6),
    },
];
