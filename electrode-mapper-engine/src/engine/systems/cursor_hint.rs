use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;

use crate::rpc::web_rpc::WebRpcInterface;

/// Cursor shape the active screen asks for. Screens assign it with
/// `set_if_neq` so the window and page only hear about real changes.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over something that can be dragged.
    Move,
    /// Over something that can be clicked.
    Pointer,
    Grabbing,
    Crosshair,
}

impl CursorHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::Pointer => "pointer",
            Self::Grabbing => "grabbing",
            Self::Crosshair => "crosshair",
        }
    }

    fn icon(&self) -> SystemCursorIcon {
        match self {
            Self::Default => SystemCursorIcon::Default,
            Self::Move => SystemCursorIcon::Move,
            Self::Pointer => SystemCursorIcon::Pointer,
            Self::Grabbing => SystemCursorIcon::Grabbing,
            Self::Crosshair => SystemCursorIcon::Crosshair,
        }
    }
}

/// Apply a changed hint to the window and tell the page.
pub fn apply_cursor_hint(
    mut commands: Commands,
    hint: Res<CursorHint>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !hint.is_changed() {
        return;
    }
    if let Ok(window) = windows.single() {
        commands.entity(window).insert(CursorIcon::System(hint.icon()));
    }
    rpc_interface.send_notification("cursor_hint", serde_json::json!({ "cursor": hint.as_str() }));
}

/// A new screen starts with the plain cursor.
pub fn reset_cursor_hint(mut hint: ResMut<CursorHint>) {
    hint.set_if_neq(CursorHint::Default);
}
