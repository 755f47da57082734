//! Electrode screen: mark electrode positions on the calibration photo.
//!
//! The photo is shown under a pan/zoom transform. In default mode clicks add
//! electrodes and markers can be dragged; lasso and rectangle modes select
//! groups of electrodes for removal.

pub mod gesture;
pub mod interaction;
pub mod markers;
pub mod photo;
pub mod state;

use bevy::prelude::*;
use constants::palette::BACKGROUND_COLOUR;

use crate::engine::assets::session_manifest::SessionManifest;
use crate::engine::camera::zoom_transform::ZoomTransform;
use crate::engine::core::app_state::Screen;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::systems::pointer::PointerSet;
use interaction::{
    ElectrodeInteraction, draw_selection_outline, electrode_pointer_system, handle_electrode_commands,
};
use markers::{ElectrodeMarkerAssets, sync_electrode_markers};
use photo::{PhotoHandle, setup_photo_when_loaded, sync_photo_transform};
use state::ElectrodeSet;

pub struct ElectrodeToolPlugin;

impl Plugin for ElectrodeToolPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Electrodes), setup_electrode_screen)
            .add_systems(OnExit(Screen::Electrodes), teardown_electrode_screen)
            .add_systems(
                Update,
                (
                    setup_photo_when_loaded,
                    handle_electrode_commands,
                    (
                        electrode_pointer_system,
                        sync_photo_transform,
                        sync_electrode_markers,
                        draw_selection_outline,
                    )
                        .chain()
                        .run_if(resource_exists::<ElectrodeSet>),
                )
                    .chain()
                    .after(PointerSet)
                    .run_if(in_state(Screen::Electrodes)),
            );
    }
}

fn setup_electrode_screen(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifest: Res<SessionManifest>,
    mut progress: ResMut<LoadingProgress>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn((
        Camera2d,
        Camera {
            clear_color: ClearColorConfig::Custom(BACKGROUND_COLOUR),
            ..default()
        },
        StateScoped(Screen::Electrodes),
    ));

    let photo: Handle<Image> = asset_server.load(manifest.photo.clone());
    progress.reset();
    progress.track(photo.id().untyped());
    info!("Loading photo: {}", manifest.photo);

    commands.insert_resource(PhotoHandle(photo));
    commands.insert_resource(ElectrodeInteraction::default());
    commands.insert_resource(ElectrodeMarkerAssets::new(&mut meshes, &mut materials));
}

fn teardown_electrode_screen(mut commands: Commands) {
    commands.remove_resource::<PhotoHandle>();
    commands.remove_resource::<ElectrodeSet>();
    commands.remove_resource::<ZoomTransform>();
    commands.remove_resource::<ElectrodeInteraction>();
    commands.remove_resource::<ElectrodeMarkerAssets>();
}
