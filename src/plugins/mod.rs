//! Feature plugins.
//!
//! Gameplay plugins are headless-safe; render-only plugins require
//! DefaultPlugins. The per-tick mutation order inside the fixed schedules:
//! input resolution -> weapon fire -> projectile advance/intersection ->
//! AI movement/attack -> damage application -> death/wave bookkeeping.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod combat;
pub mod core;
pub mod enemies;
pub mod feedback;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod waves;
pub mod weapons;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    player::plugin(app);
    combat::plugin(app);
    weapons::plugin(app);
    enemies::plugin(app);
    waves::plugin(app);
    feedback::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
