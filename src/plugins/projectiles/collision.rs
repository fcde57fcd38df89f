//! Rocket intersection detection.
//!
//! The first qualifying intersection (anything but the rocket's owner)
//! marks the rocket `PendingDetonate`; the detonation system does the
//! splash broadcast. Marking instead of broadcasting inline keeps this
//! reader single-purpose and guarantees at most one detonation per rocket
//! even when several `CollisionStart` messages arrive in the same tick.

use avian3d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::components::{PooledRocket, Rocket, RocketState};

pub fn process_rocket_intersections(
    mut started: MessageReader<CollisionStart>,
    q_is_rocket: Query<(), With<PooledRocket>>,
    mut q_rockets: Query<(&Rocket, &mut RocketState), With<PooledRocket>>,
    // Per-frame dedupe
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let r1 = q_is_rocket.contains(ev.collider1);
        let r2 = q_is_rocket.contains(ev.collider2);
        if !(r1 ^ r2) {
            continue; // must be exactly one rocket
        }
        let (rocket_collider, other) = if r1 {
            (ev.collider1, ev.body2.unwrap_or(ev.collider2))
        } else {
            (ev.collider2, ev.body1.unwrap_or(ev.collider1))
        };

        if !seen.insert(rocket_collider) {
            continue;
        }

        let Ok((rocket, mut state)) = q_rockets.get_mut(rocket_collider) else {
            continue;
        };
        if *state != RocketState::Active {
            continue;
        }
        if rocket.owner == Some(other) {
            continue;
        }

        *state = RocketState::PendingDetonate;
    }
}
