use bevy::prelude::*;
use bevy::render::view::RenderLayers;

use crate::engine::assets::session_manifest::SessionManifest;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::picking::mesh_surface::Pickable;

/// The scanned head mesh of the session.
#[derive(Component)]
pub struct HeadMesh;

/// Spawn the head mesh from the session's glTF file and track its loading.
pub fn spawn_head_mesh(
    commands: &mut Commands,
    asset_server: &AssetServer,
    manifest: &SessionManifest,
    progress: &mut LoadingProgress,
    layers: RenderLayers,
    scope: impl Bundle,
) -> Entity {
    let mesh: Handle<Mesh> = asset_server.load(
        GltfAssetLabel::Primitive {
            mesh: 0,
            primitive: 0,
        }
        .from_asset(manifest.head_mesh.clone()),
    );
    let material: Handle<StandardMaterial> = asset_server.load(
        GltfAssetLabel::Material {
            index: 0,
            is_scale_inverted: false,
        }
        .from_asset(manifest.head_mesh.clone()),
    );

    progress.track(mesh.id());
    progress.track(material.id());

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            manifest.head_transform(),
            HeadMesh,
            Pickable,
            layers,
            scope,
        ))
        .id()
}
