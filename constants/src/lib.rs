pub mod coordinate_system;
pub mod fiducial;
pub mod palette;
pub mod render_settings;
pub mod zoom;
