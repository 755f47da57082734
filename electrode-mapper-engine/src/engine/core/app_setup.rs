use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::session_manifest::SessionManifest;
use crate::engine::camera::orbit_camera::orbit_camera_controller;
use crate::engine::core::app_state::{AppState, Screen, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{ManifestLoader, load_manifest_system, start_loading};
use crate::engine::loading::progress::{LoadingProgress, report_loading_progress};
use crate::engine::picking::mesh_surface::attach_pick_surfaces;
use crate::engine::systems::cursor_hint::{CursorHint, apply_cursor_hint, reset_cursor_hint};
use crate::engine::systems::pointer::{PointerSet, PointerState, update_pointer_state};
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::correspondence::CorrespondencePlugin;
use crate::tools::electrodes::ElectrodeToolPlugin;
use crate::tools::fiducial::FiducialToolPlugin;
use crate::tools::screen_manager::{
    announce_screen, handle_navigation_commands, handle_screen_keyboard_shortcuts,
    handle_state_report_commands,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_sub_state::<Screen>()
        .enable_state_scoped_entities::<Screen>()
        // Registers SessionManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SessionManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<PointerState>()
        .init_resource::<CursorHint>();

    // One plugin per screen
    app.add_plugins((FiducialToolPlugin, ElectrodeToolPlugin, CorrespondencePlugin));

    // State-based system scheduling
    app.add_systems(Startup, start_loading).add_systems(
        Update,
        (load_manifest_system, transition_to_running)
            .chain()
            .run_if(in_state(AppState::Loading)),
    );

    for screen in [Screen::Fiducials, Screen::Electrodes, Screen::Correspondence] {
        app.add_systems(OnEnter(screen), (announce_screen, reset_cursor_hint));
    }

    // Pointer tracking runs first so every screen sees the same gesture.
    app.add_systems(Update, update_pointer_state.in_set(PointerSet));

    let runtime_systems = (
        handle_screen_keyboard_shortcuts, // Native shortcuts or no-op for WASM
        handle_navigation_commands,
        handle_state_report_commands,
        attach_pick_surfaces,
        orbit_camera_controller.after(PointerSet),
        report_loading_progress,
        apply_cursor_hint,
    );

    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: "wgpu=error,naga=warn,electrode_mapper_engine=info".into(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
