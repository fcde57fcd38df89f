mod common;

use bevy::prelude::*;

use deadzone::common::state::GameState;
use deadzone::plugins::combat::{DamagePlayer, Score};
use deadzone::plugins::enemies::{Enemy, EnemyLifeState, Health};
use deadzone::plugins::player::{Player, PlayerVitals};
use deadzone::plugins::waves::WaveState;

/// Killing the whole roster credits score, empties the live count, and
/// arms the wave-advance delay.
#[test]
fn clearing_wave_one_arms_the_advance_timer() {
    let mut app = common::app_headless();
    app.update();

    let world = app.world_mut();
    let mut q = world.query_filtered::<&mut Health, With<Enemy>>();
    let mut killed = 0u32;
    for mut health in q.iter_mut(world) {
        health.hp = 0;
        killed += 1;
    }
    assert_eq!(killed, 5);

    common::run_fixed_tick(&mut app);

    let world = app.world_mut();
    let state = world.resource::<WaveState>();
    assert_eq!(state.wave, 1);
    assert_eq!(state.live, 0);
    assert!(state.advance_timer.is_some());

    let score = world.resource::<Score>();
    assert_eq!(score.points, 250);
    assert_eq!(score.enemies_killed, 5);

    // Everyone is in the dying animation, nobody alive.
    let mut q_life = world.query_filtered::<&EnemyLifeState, With<Enemy>>();
    for life in q_life.iter(world) {
        assert!(matches!(life, EnemyLifeState::Dying { .. }));
    }
}

/// Lethal damage flips the session to GameOver and tears the arena down.
#[test]
fn player_death_ends_the_session() {
    let mut app = common::app_headless();
    app.update();

    app.world_mut().write_message(DamagePlayer { amount: 1000 });
    common::run_fixed_tick(&mut app);

    // The transition itself applies on the next frame.
    app.update();

    let world = app.world_mut();
    assert_eq!(
        *world.resource::<State<GameState>>().get(),
        GameState::GameOver
    );
    assert!(!world.resource::<PlayerVitals>().is_alive());

    // DespawnOnExit removed the session entities.
    let mut q_players = world.query_filtered::<(), With<Player>>();
    assert_eq!(q_players.iter(world).count(), 0);
    let mut q_enemies = world.query_filtered::<(), With<Enemy>>();
    assert_eq!(q_enemies.iter(world).count(), 0);
}

/// Fall-through deaths count for the wave but never for the score.
#[test]
fn fall_through_kills_credit_no_points() {
    let mut app = common::app_headless();
    app.update();

    let world = app.world_mut();
    let mut q = world.query_filtered::<&mut Transform, With<Enemy>>();
    if let Some(mut tf) = q.iter_mut(world).next() {
        tf.translation.y = -50.0;
    }

    common::run_fixed_tick(&mut app);

    let world = app.world_mut();
    assert_eq!(world.resource::<WaveState>().live, 4);
    assert_eq!(world.resource::<Score>().points, 0);
    assert_eq!(world.resource::<Score>().enemies_killed, 1);
}
