use avian3d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledRocket, Rocket, RocketState};
use crate::common::layers::Layer;

#[derive(Resource, Debug)]
pub struct RocketPool {
    pub free: Vec<Entity>,
    pub capacity: usize,
}

impl RocketPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }
}

#[inline]
pub fn active_rocket_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Rocket, [Layer::World, Layer::Enemy])
}

/// "Disabled" without structural changes: empty filters means we collide
/// with nothing and generate no intersection events.
#[inline]
pub fn inactive_rocket_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Rocket, [] as [Layer; 0])
}

/// Pre-spawn pooled rockets (inactive).
///
/// Physics components stay attached for the entity's whole lifetime;
/// activation only mutates component values, never archetypes.
/// Session teardown: force every rocket back to the Inactive invariants
/// and rebuild the free list, so a fresh session starts with a full pool.
pub fn recall_all_rockets(
    mut pool: ResMut<RocketPool>,
    mut q: Query<
        (
            Entity,
            &mut RocketState,
            &mut Rocket,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        With<PooledRocket>,
    >,
) {
    pool.free.clear();
    for (e, mut state, mut rocket, mut vis, mut vel, mut layers) in &mut q {
        *state = RocketState::Inactive;
        *rocket = Rocket::idle();
        *vis = Visibility::Hidden;
        vel.0 = Vec3::ZERO;
        *layers = inactive_rocket_layers();
        pool.free.push(e);
    }
}

pub fn init_rocket_pool(mut commands: Commands, mut pool: ResMut<RocketPool>) {
    pool.free.clear();
    let cap = pool.capacity;
    pool.free.reserve(cap);

    for _ in 0..cap {
        let e = commands
            .spawn((
                Name::new("Rocket(Pooled)"),
                PooledRocket,
                RocketState::Inactive,
                Rocket::idle(),
                Transform::from_xyz(0.0, -100.0, 0.0),
                Visibility::Hidden,
                RigidBody::Dynamic,
                Collider::sphere(0.2),
                Sensor,
                inactive_rocket_layers(),
                LinearVelocity(Vec3::ZERO),
                // Always on; inactive rockets can't collide anyway.
                CollisionEventsEnabled,
            ))
            .id();

        pool.free.push(e);
    }
}
