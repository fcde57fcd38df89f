#![cfg(test)]

use super::*;

use bevy::ecs::message::Messages;
use std::time::Duration;

use crate::common::test_utils::run_system_once;
use crate::plugins::enemies::{Enemy, EnemyKind};

fn fixed_time(dt: f32) -> Time<Fixed> {
    let mut t = Time::<Fixed>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

fn wave_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(GameRng::from_seed(21));
    world.insert_resource(Score::default());
    world.insert_resource(fixed_time(1.0 / 64.0));
    world.init_resource::<Messages<EnemyDied>>();
    world
}

fn count_enemies(world: &mut World, kind: EnemyKind) -> usize {
    let mut q = world.query::<&EnemyKind>();
    q.iter(world).filter(|k| **k == kind).count()
}

// -----------------------------------------------------------------------------
// Roster arithmetic
// -----------------------------------------------------------------------------

#[test]
fn roster_grows_linearly() {
    assert_eq!(roster(1, 5), (5, false));
    assert_eq!(roster(2, 5), (8, false));
    assert_eq!(roster(4, 5), (14, false));
}

#[test]
fn every_fifth_wave_adds_a_boss() {
    assert_eq!(roster(5, 5), (17, true));
    assert_eq!(roster(10, 5), (32, true));
    assert_eq!(roster(6, 5), (20, false));
}

#[test]
fn zero_interval_never_spawns_a_boss() {
    assert_eq!(roster(5, 0), (17, false));
}

// -----------------------------------------------------------------------------
// First wave spawn
// -----------------------------------------------------------------------------

#[test]
fn first_wave_spawns_five_grunts_and_no_boss() {
    let mut world = wave_world();

    run_system_once(&mut world, start_first_wave);

    let state = world.resource::<WaveState>();
    assert_eq!(state.wave, 1);
    assert_eq!(state.live, 5);
    assert!(state.advance_timer.is_none());

    assert_eq!(count_enemies(&mut world, EnemyKind::Grunt), 5);
    assert_eq!(count_enemies(&mut world, EnemyKind::Boss), 0);
}

#[test]
fn grunts_spawn_on_the_ring() {
    let mut world = wave_world();
    run_system_once(&mut world, start_first_wave);

    let tunables = Tunables::default();
    let mut q = world.query::<(&EnemyKind, &Transform)>();
    let positions: Vec<Vec3> = q
        .iter(&world)
        .filter(|(k, _)| **k == EnemyKind::Grunt)
        .map(|(_, tf)| tf.translation)
        .collect();

    for pos in positions {
        let radial = Vec2::new(pos.x, pos.z).length();
        assert!(radial >= tunables.spawn_ring_min - 1e-3);
        assert!(radial < tunables.spawn_ring_max + 1e-3);
        assert_eq!(pos.y, 2.0);
    }
}

#[test]
fn boss_wave_roster_includes_the_boss() {
    let mut world = wave_world();

    let live = run_system_once(
        &mut world,
        |mut commands: Commands,
         mut rng: ResMut<GameRng>,
         tunables: Res<Tunables>| {
            let mut state = WaveState {
                wave: 5,
                live: 0,
                advance_timer: None,
            };
            spawn_roster(&mut commands, &mut state, &mut rng, &tunables);
            state.live
        },
    );

    assert_eq!(live, 18);
    assert_eq!(count_enemies(&mut world, EnemyKind::Grunt), 17);
    assert_eq!(count_enemies(&mut world, EnemyKind::Boss), 1);

    let mut q = world.query::<(&EnemyKind, &Transform)>();
    let boss_pos = q
        .iter(&world)
        .find(|(k, _)| **k == EnemyKind::Boss)
        .map(|(_, tf)| tf.translation)
        .unwrap();
    assert_eq!(boss_pos, Vec3::new(0.0, 5.0, -20.0));
}

// -----------------------------------------------------------------------------
// Death bookkeeping and advancement
// -----------------------------------------------------------------------------

#[test]
fn deaths_credit_score_and_decrement_live() {
    let mut world = wave_world();
    world.insert_resource(WaveState {
        wave: 1,
        live: 3,
        advance_timer: None,
    });
    let enemy = world.spawn(Enemy { score: 50 }).id();

    world.write_message(EnemyDied { entity: enemy, score: 50 });
    run_system_once(&mut world, handle_enemy_deaths);

    let state = world.resource::<WaveState>();
    assert_eq!(state.live, 2);
    assert!(state.advance_timer.is_none());

    let score = world.resource::<Score>();
    assert_eq!(score.points, 50);
    assert_eq!(score.enemies_killed, 1);
}

#[test]
fn clearing_the_wave_arms_the_advance_timer_once() {
    let mut world = wave_world();
    world.insert_resource(WaveState {
        wave: 1,
        live: 2,
        advance_timer: None,
    });
    let a = world.spawn(Enemy { score: 50 }).id();
    let b = world.spawn(Enemy { score: 0 }).id();

    // Both remaining enemies die in the same tick.
    world.write_message(EnemyDied { entity: a, score: 50 });
    world.write_message(EnemyDied { entity: b, score: 0 });
    run_system_once(&mut world, handle_enemy_deaths);

    let state = world.resource::<WaveState>();
    assert_eq!(state.live, 0);
    let timer = state.advance_timer.as_ref().unwrap();
    assert_eq!(
        timer.duration(),
        Duration::from_secs_f32(Tunables::default().wave_advance_delay)
    );
    assert!(!timer.is_finished());

    // Fall-through score stays zero-credited.
    assert_eq!(world.resource::<Score>().points, 50);
}

#[test]
fn advance_waits_for_the_delay_then_spawns_the_next_roster() {
    let mut world = wave_world();
    world.insert_resource(WaveState {
        wave: 1,
        live: 0,
        advance_timer: Some(Timer::from_seconds(1.0, TimerMode::Once)),
    });

    // Not yet.
    world.insert_resource(fixed_time(0.5));
    run_system_once(&mut world, advance_wave);
    assert_eq!(world.resource::<WaveState>().wave, 1);
    assert_eq!(count_enemies(&mut world, EnemyKind::Grunt), 0);

    // Delay elapsed: wave 2 spawns 8 grunts and disarms the timer.
    world.insert_resource(fixed_time(0.6));
    run_system_once(&mut world, advance_wave);

    let state = world.resource::<WaveState>();
    assert_eq!(state.wave, 2);
    assert_eq!(state.live, 8);
    assert!(state.advance_timer.is_none());
    assert_eq!(count_enemies(&mut world, EnemyKind::Grunt), 8);
}

#[test]
fn advance_is_a_no_op_without_an_armed_timer() {
    let mut world = wave_world();
    world.insert_resource(WaveState {
        wave: 3,
        live: 4,
        advance_timer: None,
    });

    run_system_once(&mut world, advance_wave);

    assert_eq!(world.resource::<WaveState>().wave, 3);
    assert_eq!(count_enemies(&mut world, EnemyKind::Grunt), 0);
}
