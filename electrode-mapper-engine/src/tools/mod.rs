//! The three mapping screens and the navigation between them.
//!
//! Each screen is a plugin keyed on a `Screen` sub-state. On enter it spawns
//! its cameras and scene scoped to itself and inserts its own state
//! resource; on exit the scoped entities despawn and the resources are
//! removed, so no state is shared between screens.
//!
//! ## Screens
//!
//! ### Fiducials (`Screen::Fiducials`)
//! - **Activation**: `F1` (native) or `navigate` RPC with `"fiducials"`
//! - Click the head mesh to place the active landmark (nasion, then the
//!   right and left ear junctions). Placed markers can be dragged over the
//!   surface.
//!
//! ### Electrodes (`Screen::Electrodes`)
//! - **Activation**: `F2` (native) or `navigate` RPC with `"electrodes"`
//! - Mark electrodes on the calibration photo. `set_selection_mode` switches
//!   between default editing, lasso and rectangle selection;
//!   `remove_selected_electrodes` deletes the selection.
//!
//! ### Correspondence (`Screen::Correspondence`)
//! - **Activation**: `F3` (native) or `navigate` RPC with `"correspondence"`
//! - Pair reference-sphere electrodes with head electrodes, three pairs in
//!   total, each shown in its own colour.
//!
//! ## Rejected transitions
//!
//! State machines return `TransitionError` for inputs that do not apply in
//! the current state. Systems log these at debug level and move on.

pub mod correspondence;
pub mod electrodes;
pub mod fiducial;
pub mod screen_manager;
pub mod transition;
