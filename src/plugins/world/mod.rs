//! Arena geometry and pickups.
//!
//! The arena is a flat floor with border walls and a deterministic set of
//! inner cover walls. Mesh/material attachment is optional so the same
//! spawn path works headless; physics colliders are always present.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use std::f32::consts::FRAC_PI_2;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::player::{Player, PlayerVitals};
use crate::plugins::weapons::Loadout;

const INNER_WALL_COUNT: u32 = 15;
const INNER_WALL_SEED: f32 = 12345.0;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Health,
    Armor,
    Ammo,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup {
    pub kind: PickupKind,
}

fn world_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::World,
        [Layer::Player, Layer::Enemy, Layer::Rocket],
    )
}

/// Deterministic inner-wall placement: the layout is a pure function of
/// the wall index, so every run gets the same arena.
pub fn inner_wall_placement(i: u32) -> (Vec3, f32) {
    let fi = i as f32;
    let x = (INNER_WALL_SEED * fi).sin() * 20.0;
    let z = (INNER_WALL_SEED * fi * 2.0).cos() * 20.0;
    let rot = if fi.sin() > 0.0 { FRAC_PI_2 } else { 0.0 };
    (Vec3::new(x, 1.5, z), rot)
}

fn spawn_arena(
    mut commands: Commands,
    tunables: Res<Tunables>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let half = tunables.arena_half_extent;
    let side = half * 2.0;

    let mut visuals = meshes.zip(materials);
    let mut visual = |size: Vec3, color: Color| -> Option<(Mesh3d, MeshMaterial3d<StandardMaterial>)> {
        let (meshes, materials) = visuals.as_mut()?;
        Some((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(StandardMaterial::from(color))),
        ))
    };

    // Floor.
    let floor_size = Vec3::new(side, 1.0, side);
    let mut floor = commands.spawn((
        Name::new("Floor"),
        RigidBody::Static,
        Collider::cuboid(floor_size.x, floor_size.y, floor_size.z),
        world_layers(),
        Transform::from_xyz(0.0, -0.5, 0.0),
        DespawnOnExit(GameState::InGame),
    ));
    if let Some(v) = visual(floor_size, Color::srgb(0.25, 0.27, 0.3)) {
        floor.insert(v);
    }

    // Border walls.
    let borders = [
        (Vec3::new(0.0, 2.0, -half), Vec3::new(side, 4.0, 1.0)),
        (Vec3::new(0.0, 2.0, half), Vec3::new(side, 4.0, 1.0)),
        (Vec3::new(-half, 2.0, 0.0), Vec3::new(1.0, 4.0, side)),
        (Vec3::new(half, 2.0, 0.0), Vec3::new(1.0, 4.0, side)),
    ];
    for (pos, size) in borders {
        let mut wall = commands.spawn((
            Name::new("BorderWall"),
            RigidBody::Static,
            Collider::cuboid(size.x, size.y, size.z),
            world_layers(),
            Transform::from_translation(pos),
            DespawnOnExit(GameState::InGame),
        ));
        if let Some(v) = visual(size, Color::srgb(0.35, 0.35, 0.4)) {
            wall.insert(v);
        }
    }

    // Inner cover walls.
    let size = Vec3::new(8.0, 3.0, 1.0);
    for i in 0..INNER_WALL_COUNT {
        let (pos, rot) = inner_wall_placement(i);
        let mut wall = commands.spawn((
            Name::new("CoverWall"),
            RigidBody::Static,
            Collider::cuboid(size.x, size.y, size.z),
            world_layers(),
            Transform::from_translation(pos).with_rotation(Quat::from_rotation_y(rot)),
            DespawnOnExit(GameState::InGame),
        ));
        if let Some(v) = visual(size, Color::srgb(0.4, 0.38, 0.35)) {
            wall.insert(v);
        }
    }

    // Pickups.
    let pickups = [
        (PickupKind::Health, Vec3::new(5.0, 1.0, 5.0), Color::srgb(0.2, 0.9, 0.3)),
        (PickupKind::Armor, Vec3::new(-5.0, 1.0, 5.0), Color::srgb(0.3, 0.5, 0.9)),
        (PickupKind::Ammo, Vec3::new(0.0, 1.0, 8.0), Color::srgb(0.9, 0.8, 0.2)),
    ];
    for (kind, pos, color) in pickups {
        let mut pickup = commands.spawn((
            Name::new("Pickup"),
            Pickup { kind },
            RigidBody::Static,
            Collider::cuboid(0.6, 0.6, 0.6),
            Sensor,
            CollisionLayers::new(Layer::Pickup, [Layer::Player]),
            CollisionEventsEnabled,
            Transform::from_translation(pos),
            DespawnOnExit(GameState::InGame),
        ));
        if let Some(v) = visual(Vec3::splat(0.6), color) {
            pickup.insert(v);
        }
    }
}

/// Touching a pickup consumes it: heal, armor, or reserve ammo for the
/// currently held weapon. The pickup despawns on consume.
pub fn consume_pickups(
    mut started: MessageReader<CollisionStart>,
    mut commands: Commands,
    tunables: Res<Tunables>,
    q_player: Query<(), With<Player>>,
    q_pickups: Query<&Pickup>,
    mut vitals: ResMut<PlayerVitals>,
    mut loadout: ResMut<Loadout>,
    mut consumed: Local<bevy::platform::collections::HashSet<Entity>>,
) {
    consumed.clear();
    for ev in started.read() {
        let (a, b) = (
            ev.body1.unwrap_or(ev.collider1),
            ev.body2.unwrap_or(ev.collider2),
        );
        let pickup_entity = if q_player.contains(a) {
            b
        } else if q_player.contains(b) {
            a
        } else {
            continue;
        };
        let Ok(pickup) = q_pickups.get(pickup_entity) else {
            continue;
        };
        // A sensor can report both collider and body pairs in one tick.
        if !consumed.insert(pickup_entity) {
            continue;
        }

        match pickup.kind {
            PickupKind::Health => vitals.heal(tunables.heal_pickup),
            PickupKind::Armor => vitals.add_armor(tunables.armor_pickup),
            PickupKind::Ammo => loadout.add_reserve(30),
        }
        commands.entity(pickup_entity).despawn();
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_arena);
    app.add_systems(
        FixedPostUpdate,
        consume_pickups
            .after(avian3d::collision::narrow_phase::CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}
