//! Rocket detonation: splash damage broadcast + knockback.
//!
//! Runs after intersection marking and before damage application, so every
//! enemy inside the radius receives its distance-scaled damage message in
//! the same tick the rocket detonated.

use avian3d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledRocket, Rocket, RocketState};
use super::messages::RocketExploded;
use crate::common::tunables::Tunables;
use crate::plugins::combat::{DamageEnemy, SplashFalloff};
use crate::plugins::enemies::{Enemy, EnemyLifeState};

pub fn detonate_rockets(
    tunables: Res<Tunables>,
    mut q_rockets: Query<(&Transform, &Rocket, &mut RocketState), With<PooledRocket>>,
    mut q_enemies: Query<
        (Entity, &Transform, &EnemyLifeState, &mut LinearVelocity),
        (With<Enemy>, Without<PooledRocket>),
    >,
    mut damage: MessageWriter<DamageEnemy>,
    mut exploded: MessageWriter<RocketExploded>,
) {
    for (rocket_tf, rocket, mut state) in &mut q_rockets {
        if *state != RocketState::PendingDetonate {
            continue;
        }
        *state = RocketState::PendingReturn;

        let center = rocket_tf.translation;
        exploded.write(RocketExploded { position: center });

        for (enemy, enemy_tf, life, mut vel) in &mut q_enemies {
            if !matches!(life, EnemyLifeState::Alive) {
                continue;
            }
            let dist = enemy_tf.translation.distance(center);
            if dist >= rocket.splash_radius {
                continue;
            }

            damage.write(DamageEnemy {
                target: enemy,
                raw: rocket.damage,
                falloff: Some(SplashFalloff {
                    distance: dist,
                    radius: rocket.splash_radius,
                }),
            });

            // Knockback away from the blast, biased upward.
            let push = (enemy_tf.translation - center + Vec3::Y * 2.0).normalize_or_zero();
            vel.0 += push * tunables.rocket_knockback;
        }
    }
}

/// Remove rockets that time out or leave the playable volume without
/// intersecting anything. No damage, no explosion notification.
pub fn expire_rockets(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    mut q_rockets: Query<(&Transform, &mut Rocket, &mut RocketState), With<PooledRocket>>,
) {
    for (tf, mut rocket, mut state) in &mut q_rockets {
        if *state != RocketState::Active {
            continue;
        }
        rocket.lifetime.tick(time.delta());
        if rocket.lifetime.is_finished() || tf.translation.y < tunables.kill_plane_y {
            *state = RocketState::PendingReturn;
        }
    }
}
