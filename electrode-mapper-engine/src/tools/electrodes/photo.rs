use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy::window::PrimaryWindow;

use crate::engine::assets::session_manifest::SessionManifest;
use crate::engine::camera::zoom_transform::ZoomTransform;
use crate::engine::core::app_state::Screen;
use crate::tools::electrodes::state::ElectrodeSet;

/// Handle of the calibration photo while the electrode screen is open.
#[derive(Resource)]
pub struct PhotoHandle(pub Handle<Image>);

/// Parent of the photo sprite and the electrode markers. Its transform is
/// the zoom transform expressed in 2D world space, so children are placed
/// in image pixels with y flipped.
#[derive(Component)]
pub struct PhotoRoot;

/// Window pixels (origin top-left, y down) to 2D world space of a camera
/// centred on the window.
pub fn view_to_world(view: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(view.x - window_size.x * 0.5, window_size.y * 0.5 - view.y)
}

/// Image pixels to the local space of `PhotoRoot`.
pub fn image_to_local(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

pub fn photo_root_transform(zoom: &ZoomTransform, window_size: Vec2) -> Transform {
    Transform::from_translation(view_to_world(zoom.translate, window_size).extend(0.0))
        .with_scale(zoom.scale.extend(1.0))
}

/// Once the photo is decoded, size the electrode set to it, fit the zoom
/// and spawn the sprite.
pub fn setup_photo_when_loaded(
    mut commands: Commands,
    photo: Res<PhotoHandle>,
    images: Res<Assets<Image>>,
    manifest: Res<SessionManifest>,
    windows: Query<&Window, With<PrimaryWindow>>,
    electrode_set: Option<Res<ElectrodeSet>>,
) {
    if electrode_set.is_some() {
        return;
    }
    let Some(image) = images.get(&photo.0) else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    let image_size = image.size_f32();
    let window_size = window.size();
    let zoom = ZoomTransform::fit(image_size, window_size);
    let set = ElectrodeSet::with_points(image_size, manifest.photo_electrodes());
    info!(
        "✓ Photo ready: {}x{} px, {} electrodes",
        image_size.x,
        image_size.y,
        set.len()
    );

    commands
        .spawn((
            PhotoRoot,
            photo_root_transform(&zoom, window_size),
            Visibility::default(),
            StateScoped(Screen::Electrodes),
        ))
        .with_children(|parent| {
            parent.spawn((
                Sprite {
                    image: photo.0.clone(),
                    anchor: Anchor::TopLeft,
                    ..default()
                },
                Transform::default(),
            ));
        });

    commands.insert_resource(zoom);
    commands.insert_resource(set);
}

/// Keep the photo under the zoom transform, also across window resizes.
pub fn sync_photo_transform(
    zoom: Res<ZoomTransform>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut roots: Query<&mut Transform, With<PhotoRoot>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let target = photo_root_transform(&zoom, window.size());
    for mut transform in &mut roots {
        transform.set_if_neq(target);
    }
}
