use bevy::prelude::*;

use crate::engine::core::app_state::Screen;
use crate::rpc::commands::SessionCommand;
use crate::rpc::web_rpc::WebRpcInterface;

/// Screen selected by a navigation command, if it differs from the current one.
pub fn navigation_target(current: Screen, command: &SessionCommand) -> Option<Screen> {
    match command {
        SessionCommand::Navigate(screen) if *screen != current => Some(*screen),
        _ => None,
    }
}

/// System handling navigation requests from RPC or keyboard shortcuts.
pub fn handle_navigation_commands(
    mut commands: EventReader<SessionCommand>,
    current: Res<State<Screen>>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    for command in commands.read() {
        if let Some(screen) = navigation_target(*current.get(), command) {
            info!("Screen change requested: {:?} → {:?}", current.get(), screen);
            next_screen.set(screen);
        }
    }
}

/// Tell the page which screen is now showing.
pub fn announce_screen(screen: Res<State<Screen>>, mut rpc_interface: ResMut<WebRpcInterface>) {
    info!("Entered {} screen", screen.get().as_str());
    rpc_interface.send_notification(
        "screen_changed",
        serde_json::json!({ "screen": screen.get().as_str() }),
    );
}

/// Re-announce on request so a freshly loaded page can sync up.
pub fn handle_state_report_commands(
    mut commands: EventReader<SessionCommand>,
    screen: Res<State<Screen>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if commands.read().any(|c| *c == SessionCommand::ReportState) {
        rpc_interface.send_notification(
            "screen_changed",
            serde_json::json!({ "screen": screen.get().as_str() }),
        );
    }
}

/// System handling keyboard shortcuts for screen selection (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_screen_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<SessionCommand>,
) {
    let shortcuts = [
        (KeyCode::F1, Screen::Fiducials),
        (KeyCode::F2, Screen::Electrodes),
        (KeyCode::F3, Screen::Correspondence),
    ];
    for (key, screen) in shortcuts {
        if keyboard.just_pressed(key) {
            commands.write(SessionCommand::Navigate(screen));
        }
    }
}

/// Placeholder system for WASM builds where keyboard shortcuts are disabled.
#[cfg(target_arch = "wasm32")]
pub fn handle_screen_keyboard_shortcuts() {
    // No keyboard shortcuts in WASM builds - screens controlled via RPC only.
}
