//! Correspondence screen: pair labelled reference-sphere electrodes with
//! electrodes detected on the head mesh.
//!
//! The window is split in two views, each with its own orbit camera and
//! render layer. Clicking a marker in either view fills in one side of the
//! connection being edited; the side panel confirms and removes pairs.

pub mod interaction;
pub mod scene;
pub mod state;

use bevy::prelude::*;

use crate::engine::assets::session_manifest::SessionManifest;
use crate::engine::camera::orbit_camera::orbit_camera_controller;
use crate::engine::core::app_state::Screen;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::head::spawn_head_mesh;
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::systems::pointer::PointerSet;
use interaction::{correspondence_pointer_system, handle_correspondence_commands};
use scene::{
    CorrespondenceScene, CorrespondenceView, position_sphere_labels, spawn_cameras,
    spawn_head_electrodes_when_ready, spawn_sphere_labels, spawn_sphere_scene,
    sync_connection_colours, update_viewports,
};
use state::CorrespondenceBoard;

pub struct CorrespondencePlugin;

impl Plugin for CorrespondencePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Correspondence), setup_correspondence_screen)
            .add_systems(OnExit(Screen::Correspondence), teardown_correspondence_screen)
            .add_systems(
                Update,
                (
                    update_viewports,
                    spawn_sphere_labels,
                    spawn_head_electrodes_when_ready,
                    handle_correspondence_commands,
                    correspondence_pointer_system,
                    sync_connection_colours,
                )
                    .chain()
                    .after(PointerSet)
                    .before(orbit_camera_controller)
                    .run_if(in_state(Screen::Correspondence)),
            )
            .add_systems(
                PostUpdate,
                position_sphere_labels
                    .after(bevy::transform::TransformSystem::TransformPropagate)
                    .before(bevy::ui::UiSystem::Layout)
                    .run_if(in_state(Screen::Correspondence)),
            );
    }
}

fn setup_correspondence_screen(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifest: Res<SessionManifest>,
    mut progress: ResMut<LoadingProgress>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(CorrespondenceBoard::new(
        manifest.sphere_labels(),
        manifest.electrodes_head.len(),
    ));
    commands.insert_resource(CorrespondenceScene::default());

    spawn_cameras(&mut commands);
    for view in [CorrespondenceView::Sphere, CorrespondenceView::Head] {
        spawn_lighting(&mut commands, view.layers(), StateScoped(Screen::Correspondence));
    }
    spawn_sphere_scene(&mut commands, &manifest, &mut meshes, &mut materials);

    progress.reset();
    spawn_head_mesh(
        &mut commands,
        &asset_server,
        &manifest,
        &mut progress,
        CorrespondenceView::Head.layers(),
        StateScoped(Screen::Correspondence),
    );
}

fn teardown_correspondence_screen(mut commands: Commands) {
    commands.remove_resource::<CorrespondenceBoard>();
    commands.remove_resource::<CorrespondenceScene>();
}
