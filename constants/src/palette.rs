use bevy::color::Color;

/// Number of sphere/head pairs a correspondence session needs.
pub const REQUIRED_CONNECTIONS: usize = 3;

/// Connection colours, indexed by connection position. Shared by both 3D scenes
/// so a pair reads as one colour across views.
pub const CONNECTION_COLOURS: [Color; REQUIRED_CONNECTIONS] = [
    Color::srgb(1.0, 0.0, 1.0),
    Color::srgb(1.0, 0.0, 0.0),
    Color::srgb(0.4, 0.867, 0.6),
];

pub const CONNECTION_COLOUR_HEX: [&str; REQUIRED_CONNECTIONS] = ["#ff00ff", "#ff0000", "#66dd99"];

pub const UNPAIRED_ELECTRODE_COLOUR: Color = Color::WHITE;

pub const ELECTRODE_2D_COLOUR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const ELECTRODE_2D_SELECTED_COLOUR: Color = Color::srgb(0.0, 0.0, 1.0);

pub const BACKGROUND_COLOUR: Color = Color::srgb(0.039, 0.039, 0.039);
pub const REFERENCE_SPHERE_COLOUR: Color = Color::srgb(0.251, 0.251, 0.341);
