//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime.
//! - `StatesPlugin` drives the InGame/GameOver transitions.
//! - we then call `deadzone::game::configure_headless` to install the
//!   gameplay plugins.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

use deadzone::common::rng::GameRng;

pub fn app_headless() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    // Avian's collider cache (collider-from-mesh) reads AssetEvent<Mesh>.
    app.init_asset::<Mesh>();

    deadzone::game::configure_headless(&mut app);

    // Pin randomness so scenario assertions hold run to run.
    app.insert_resource(GameRng::from_seed(1234));
    app
}

/// Advance the fixed schedules once, bypassing the accumulator.
#[allow(dead_code)]
pub fn run_fixed_tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(FixedPostUpdate);
}
