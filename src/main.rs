use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use pilot::player::PilotPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Pilot".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.45, 0.68, 0.85)))
        // pixels_per_meter(1.0) keeps world units identical to the controller's
        // pixel units.  Physics runs in the fixed schedule so the character
        // controller moves exactly once per controller tick.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0).in_fixed_schedule())
        .add_plugins(PilotPlugin)
        .run();
}
