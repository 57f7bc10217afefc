use bevy::prelude::*;

/// Setup camera for 2D rendering.
///
/// Default Camera2d with default scale shows roughly the full window area;
/// `camera_follow_system` recenters it on the player every frame.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("Camera spawned");
}
