mod common;

use bevy::prelude::*;

use deadzone::common::state::GameState;
use deadzone::common::tunables::Tunables;
use deadzone::plugins::combat::Score;
use deadzone::plugins::enemies::EnemyKind;
use deadzone::plugins::player::{Player, PlayerVitals};
use deadzone::plugins::projectiles::pool::RocketPool;
use deadzone::plugins::waves::WaveState;
use deadzone::plugins::weapons::Loadout;
use deadzone::plugins::weapons::specs::WeaponKind;

#[test]
fn headless_app_builds_and_updates() {
    let mut app = common::app_headless();
    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn entering_the_game_sets_up_the_session() {
    let mut app = common::app_headless();
    app.update();

    let world = app.world_mut();
    assert_eq!(
        *world.resource::<State<GameState>>().get(),
        GameState::InGame
    );

    // Player spawned with full vitals.
    let mut q_players = world.query_filtered::<(), With<Player>>();
    assert_eq!(q_players.iter(world).count(), 1);
    let tunables = world.resource::<Tunables>().clone();
    let vitals = world.resource::<PlayerVitals>();
    assert_eq!(vitals.hp, tunables.max_hp);
    assert_eq!(vitals.armor, 0);

    // Wave one: five grunts, no boss.
    let state = world.resource::<WaveState>();
    assert_eq!(state.wave, 1);
    assert_eq!(state.live, 5);
    let mut q_kinds = world.query::<&EnemyKind>();
    let grunts = q_kinds
        .iter(world)
        .filter(|k| **k == EnemyKind::Grunt)
        .count();
    assert_eq!(grunts, 5);

    // Rocket pool pre-spawned and idle.
    assert_eq!(world.resource::<RocketPool>().free.len(), 8);

    // Rifle in hand, nothing scored yet.
    assert_eq!(world.resource::<Loadout>().current, WeaponKind::Rifle);
    assert_eq!(world.resource::<Score>().points, 0);
}
