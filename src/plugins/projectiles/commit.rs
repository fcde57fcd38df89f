//! Return commit: recycle rockets back into the pool.
//!
//! This system owns the *Inactive invariants*:
//! - hidden
//! - velocity = 0
//! - collides with nothing (filters empty)
//!
//! Centralizing these writes here prevents inconsistencies.

use avian3d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledRocket, RocketState};
use super::pool::{RocketPool, inactive_rocket_layers};

pub fn return_to_pool_commit(
    mut pool: ResMut<RocketPool>,
    mut q: Query<
        (
            Entity,
            &mut RocketState,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        With<PooledRocket>,
    >,
) {
    for (e, mut state, mut vis, mut vel, mut layers) in &mut q {
        if *state != RocketState::PendingReturn {
            continue;
        }

        *state = RocketState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec3::ZERO;
        *layers = inactive_rocket_layers();

        pool.free.push(e);
    }
}
