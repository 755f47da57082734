use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_settings::{AMBIENT_BRIGHTNESS, KEY_LIGHT_ILLUMINANCE};

/// Uniform white fill shared by every 3D view.
pub fn ambient_light() -> AmbientLight {
    AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    }
}

/// Key light for a 3D screen, spawned scoped to the screen that needs it,
/// plus the global ambient fill.
pub fn spawn_lighting(commands: &mut Commands, layers: RenderLayers, scope: impl Bundle) {
    commands.insert_resource(ambient_light());
    commands.spawn((
        DirectionalLight {
            illuminance: KEY_LIGHT_ILLUMINANCE,
            ..default()
        },
        Transform::from_xyz(2.0, 4.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        layers,
        scope,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighting_is_inserted_with_ambient_fill() {
        let mut app = App::new();
        app.add_systems(Update, |mut commands: Commands| {
            spawn_lighting(&mut commands, RenderLayers::layer(1), ());
        });
        app.update();

        let ambient = app.world().resource::<AmbientLight>();
        assert_eq!(ambient.brightness, AMBIENT_BRIGHTNESS);
        assert_eq!(ambient.color, Color::WHITE);

        let mut lights = app.world_mut().query::<(&DirectionalLight, &RenderLayers)>();
        let (light, layers) = lights.single(app.world()).unwrap();
        assert_eq!(light.illuminance, KEY_LIGHT_ILLUMINANCE);
        assert!(layers.intersects(&RenderLayers::layer(1)));
    }
}
