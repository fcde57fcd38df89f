#![cfg(test)]

use super::*;

use bevy::ecs::message::Messages;
use std::time::Duration;

use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{ContactCooldown, Enemy, EnemyLifeState};

// -----------------------------------------------------------------------------
// Vitals
// -----------------------------------------------------------------------------

#[test]
fn armor_absorbs_before_health() {
    let mut v = PlayerVitals::new(100, 50);
    v.add_armor(50);

    assert_eq!(v.take_damage(30), DamageOutcome::Applied);
    assert_eq!(v.armor, 20);
    assert_eq!(v.hp, 100);

    // 20 armor left absorbs part, the rest reaches health.
    assert_eq!(v.take_damage(30), DamageOutcome::Applied);
    assert_eq!(v.armor, 0);
    assert_eq!(v.hp, 90);
}

#[test]
fn death_is_reported_exactly_once() {
    let mut v = PlayerVitals::new(100, 50);
    assert_eq!(v.take_damage(30), DamageOutcome::Applied);
    assert_eq!(v.take_damage(30), DamageOutcome::Applied);
    assert_eq!(v.hp, 40);

    assert_eq!(v.take_damage(50), DamageOutcome::Died);
    assert_eq!(v.hp, 0);
    assert!(!v.is_alive());

    // Further damage after death is ignored, not a second death.
    assert_eq!(v.take_damage(50), DamageOutcome::Ignored);
    assert_eq!(v.hp, 0);
}

#[test]
fn health_floors_at_zero_on_overkill() {
    let mut v = PlayerVitals::new(100, 50);
    assert_eq!(v.take_damage(9999), DamageOutcome::Died);
    assert_eq!(v.hp, 0);
}

#[test]
fn heal_and_armor_clamp_to_maxima() {
    let mut v = PlayerVitals::new(100, 50);
    v.take_damage(30);
    v.heal(1000);
    assert_eq!(v.hp, 100);

    v.add_armor(1000);
    assert_eq!(v.armor, 50);
}

#[test]
fn dead_player_cannot_heal_or_armor_up() {
    let mut v = PlayerVitals::new(100, 50);
    v.take_damage(100);
    v.heal(50);
    v.add_armor(50);
    assert_eq!(v.hp, 0);
    assert_eq!(v.armor, 0);
}

#[test]
fn negative_damage_is_not_a_heal() {
    let mut v = PlayerVitals::new(100, 50);
    v.take_damage(30);
    assert_eq!(v.take_damage(-40), DamageOutcome::Applied);
    assert_eq!(v.hp, 70);
}

// -----------------------------------------------------------------------------
// Look angles
// -----------------------------------------------------------------------------

#[test]
fn pitch_clamps_short_of_vertical() {
    let mut look = LookAngles::default();
    look.apply_delta(Vec2::new(0.0, -1e6));
    assert!((look.pitch - LookAngles::PITCH_LIMIT).abs() < 1e-6);

    look.apply_delta(Vec2::new(0.0, 1e6));
    assert!((look.pitch + LookAngles::PITCH_LIMIT).abs() < 1e-6);
}

#[test]
fn yaw_wraps_freely() {
    let mut look = LookAngles::default();
    look.apply_delta(Vec2::new(-10_000.0, 0.0));
    assert!(look.yaw > std::f32::consts::TAU);
}

#[test]
fn default_forward_is_negative_z() {
    let look = LookAngles::default();
    let fwd = look.forward();
    assert!(fwd.distance(Vec3::NEG_Z) < 1e-6);
}

#[test]
fn forward_is_unit_length_under_random_angles() {
    let mut look = LookAngles::default();
    for i in 0..100 {
        look.apply_delta(Vec2::new(i as f32 * 31.7, i as f32 * -17.3));
        assert!((look.forward().length() - 1.0).abs() < 1e-4);
    }
}

// -----------------------------------------------------------------------------
// Contact damage (injected CollisionStart)
// -----------------------------------------------------------------------------

fn contact_world() -> (World, Entity, Entity) {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.init_resource::<Messages<CollisionStart>>();
    world.init_resource::<Messages<DamagePlayer>>();

    let player = world.spawn((Player, Transform::default())).id();
    let enemy = world
        .spawn((
            Enemy { score: 50 },
            EnemyLifeState::Alive,
            ContactCooldown::default(),
        ))
        .id();
    (world, player, enemy)
}

fn write_contact(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionStart {
        collider1: a,
        collider2: b,
        body1: Some(a),
        body2: Some(b),
    });
}

fn drain_player_damage(world: &mut World) -> Vec<i32> {
    let mut msgs = world.resource_mut::<Messages<DamagePlayer>>();
    let out: Vec<i32> = msgs.drain().map(|m| m.amount).collect();
    out
}

#[test]
fn first_contact_damages_player() {
    let (mut world, player, enemy) = contact_world();
    write_contact(&mut world, player, enemy);

    run_system_once(&mut world, contact_damage);

    let tunables = Tunables::default();
    assert_eq!(drain_player_damage(&mut world), vec![tunables.contact_damage]);
}

#[test]
fn contact_is_gated_by_per_enemy_cooldown() {
    let (mut world, player, enemy) = contact_world();

    write_contact(&mut world, player, enemy);
    run_system_once(&mut world, contact_damage);
    assert_eq!(drain_player_damage(&mut world).len(), 1);

    // Immediate re-contact is swallowed by the cooldown.
    write_contact(&mut world, enemy, player);
    run_system_once(&mut world, contact_damage);
    assert!(drain_player_damage(&mut world).is_empty());

    // After the cooldown elapses it lands again.
    world
        .get_mut::<ContactCooldown>(enemy)
        .unwrap()
        .0
        .tick(Duration::from_secs_f32(1.0));
    write_contact(&mut world, player, enemy);
    run_system_once(&mut world, contact_damage);
    assert_eq!(drain_player_damage(&mut world).len(), 1);
}

#[test]
fn dying_enemy_deals_no_contact_damage() {
    let (mut world, player, enemy) = contact_world();
    *world.get_mut::<EnemyLifeState>(enemy).unwrap() = EnemyLifeState::Dying {
        timer: Timer::from_seconds(0.35, TimerMode::Once),
    };

    write_contact(&mut world, player, enemy);
    run_system_once(&mut world, contact_damage);
    assert!(drain_player_damage(&mut world).is_empty());
}

#[test]
fn unrelated_collisions_are_ignored() {
    let (mut world, _player, enemy) = contact_world();
    let wall = world.spawn_empty().id();

    write_contact(&mut world, wall, enemy);
    run_system_once(&mut world, contact_damage);
    assert!(drain_player_damage(&mut world).is_empty());
}
