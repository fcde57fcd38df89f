//! Physics plugin: avian setup shared by headless and windowed builds.

use avian3d::prelude::*;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default());
    // Heavier than stock gravity; jumps stay snappy at the tuned impulse.
    app.insert_resource(Gravity(Vec3::new(0.0, -30.0, 0.0)));
}
