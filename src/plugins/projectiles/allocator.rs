//! Spawn consumer: activate rockets from the pool.
//!
//! # Fail-fast invariants
//! - The pool free list contains only valid pooled rocket entities.
//! - Therefore, a pooled entity must match the rocket query.
//!
//! If this is violated, we `expect()` and crash loudly; that keeps the
//! hot loop straight-line and makes invariant violations obvious.

use avian3d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::components::{PooledRocket, Rocket, RocketState};
use super::messages::SpawnRocketRequest;
use super::pool::{RocketPool, active_rocket_layers};
use crate::common::tunables::Tunables;

pub fn allocate_rockets_from_pool(
    tunables: Res<Tunables>,
    mut pool: ResMut<RocketPool>,
    mut reader: MessageReader<SpawnRocketRequest>,
    mut q: Query<
        (
            &mut RocketState,
            &mut Rocket,
            &mut Transform,
            &mut LinearVelocity,
            &mut Visibility,
            &mut CollisionLayers,
        ),
        With<PooledRocket>,
    >,
) {
    for req in reader.read() {
        let Some(e) = pool.free.pop() else {
            // Capacity decision, not a correctness failure.
            continue;
        };

        let (mut state, mut rocket, mut tf, mut vel, mut vis, mut layers) = q
            .get_mut(e)
            .expect("RocketPool contained an entity missing pooled rocket components");

        *state = RocketState::Active;
        rocket.reset_for_launch(
            req.damage,
            tunables.rocket_splash_radius,
            req.owner,
            tunables.rocket_lifetime,
        );
        tf.translation = req.origin;
        vel.0 = req.dir.normalize_or_zero() * tunables.rocket_speed;
        *vis = Visibility::Visible;
        *layers = active_rocket_layers();
    }
}
