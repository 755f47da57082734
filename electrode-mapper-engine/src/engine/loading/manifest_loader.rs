use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::session_manifest::SessionManifest;

/// Asset path of the session description, relative to the asset root.
pub const SESSION_MANIFEST_PATH: &str = "session.json";

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<SessionManifest>>,
    ready: bool,
    failure_logged: bool,
}

impl ManifestLoader {
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    manifest_loader.handle = Some(asset_server.load(SESSION_MANIFEST_PATH));
}

/// Copy the parsed manifest into a resource once it arrives.
/// A failed load is reported once and leaves the app on the loading state.
pub fn load_manifest_system(
    mut manifest_loader: ResMut<ManifestLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<SessionManifest>>,
) {
    if manifest_loader.ready {
        return;
    }
    let Some(handle) = manifest_loader.handle.clone() else {
        return;
    };

    if let Some(manifest) = manifests.get(&handle) {
        info!(
            "✓ Session loaded: {} photo electrodes, {} sphere electrodes, {} head electrodes",
            manifest.electrodes_2d.len(),
            manifest.electrodes_sphere.len(),
            manifest.electrodes_head.len()
        );
        commands.insert_resource(manifest.clone());
        manifest_loader.ready = true;
        return;
    }

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
        if !manifest_loader.failure_logged {
            warn!("Failed to load {SESSION_MANIFEST_PATH}: {err}");
            manifest_loader.failure_logged = true;
        }
    }
}
