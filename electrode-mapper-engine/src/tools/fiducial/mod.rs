//! Fiducial screen: place three named landmarks on the head mesh.
//!
//! Clicking the mesh places the active landmark and advances to the next
//! missing one. Placed markers can be dragged across the surface.

pub mod interaction;
pub mod markers;
pub mod state;

use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::coordinate_system::{
    FIDUCIAL_CAMERA_DISTANCE, FIDUCIAL_CAMERA_MAX_DISTANCE, FIDUCIAL_CAMERA_MIN_DISTANCE,
};
use constants::palette::BACKGROUND_COLOUR;

use crate::engine::assets::session_manifest::SessionManifest;
use crate::engine::camera::orbit_camera::{OrbitCamera, orbit_camera_controller, perspective};
use crate::engine::core::app_state::Screen;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::head::spawn_head_mesh;
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::systems::pointer::PointerSet;
use interaction::{
    FiducialCamera, FiducialInteraction, draw_placement_preview, fiducial_pointer_system,
    handle_fiducial_commands,
};
use markers::{FiducialMarkerAssets, sync_fiducial_markers};
use state::FiducialSelection;

pub struct FiducialToolPlugin;

impl Plugin for FiducialToolPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Fiducials), setup_fiducial_screen)
            .add_systems(OnExit(Screen::Fiducials), teardown_fiducial_screen)
            .add_systems(
                Update,
                (
                    handle_fiducial_commands,
                    fiducial_pointer_system,
                    sync_fiducial_markers,
                    draw_placement_preview,
                )
                    .chain()
                    .after(PointerSet)
                    .before(orbit_camera_controller)
                    .run_if(in_state(Screen::Fiducials)),
            );
    }
}

fn setup_fiducial_screen(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifest: Res<SessionManifest>,
    mut progress: ResMut<LoadingProgress>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let selection = FiducialSelection::new();
    commands.insert_resource(FiducialMarkerAssets::new(&selection, &mut meshes, &mut materials));
    commands.insert_resource(selection);
    commands.insert_resource(FiducialInteraction::default());

    let orbit = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, FIDUCIAL_CAMERA_DISTANCE), Vec3::ZERO)
        .with_distance_limits(FIDUCIAL_CAMERA_MIN_DISTANCE, FIDUCIAL_CAMERA_MAX_DISTANCE);
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(BACKGROUND_COLOUR),
            ..default()
        },
        perspective(),
        orbit.transform(),
        orbit,
        FiducialCamera,
        StateScoped(Screen::Fiducials),
    ));

    spawn_lighting(&mut commands, RenderLayers::default(), StateScoped(Screen::Fiducials));

    progress.reset();
    spawn_head_mesh(
        &mut commands,
        &asset_server,
        &manifest,
        &mut progress,
        RenderLayers::default(),
        StateScoped(Screen::Fiducials),
    );
}

fn teardown_fiducial_screen(mut commands: Commands) {
    commands.remove_resource::<FiducialSelection>();
    commands.remove_resource::<FiducialInteraction>();
    commands.remove_resource::<FiducialMarkerAssets>();
}
