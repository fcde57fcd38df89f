//! Projectiles plugin: pooled rocket entities.
//!
//! # Data flow
//! ```text
//! FixedUpdate
//!   (A) Producer: weapons::fire_control writes SpawnRocketRequest
//!   (B) Consumer: allocator pops the pool, arms the rocket, sets velocity
//!   (C) expire_rockets: lifetime / kill-plane cleanup
//!
//! FixedPostUpdate
//!   (D) Physics emits CollisionStart messages (Avian sensors)
//!   (E) process_rocket_intersections: Active -> PendingDetonate
//!   (F) detonate_rockets: splash DamageEnemy broadcast + knockback,
//!       PendingDetonate -> PendingReturn
//!   (G) return_to_pool_commit: PendingReturn -> Inactive, push free list
//! ```
//!
//! Producers never touch `RocketPool`; the allocator is its single writer.
//! Pool recycling mutates component values only (visibility, layers,
//! velocity), never archetypes.

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod components;
pub mod detonate;
pub mod messages;
pub mod pool;

use avian3d::collision::narrow_phase::CollisionEventSystems;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;

pub use messages::{RocketExploded, SpawnRocketRequest};

pub struct ProjectilesPlugin;

/// Maintain rocket message buffers.
///
/// Messages are double-buffered; `update()` advances buffers.
fn update_rocket_messages(
    mut spawns: ResMut<Messages<messages::SpawnRocketRequest>>,
    mut explosions: ResMut<Messages<messages::RocketExploded>>,
) {
    spawns.update();
    explosions.update();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        // Pool + pre-spawn. The magazine holds one rocket and the reserve
        // five; eight pooled entities cover every in-flight combination.
        app.insert_resource(pool::RocketPool::new(8))
            .add_systems(Startup, pool::init_rocket_pool)
            .add_systems(OnExit(GameState::InGame), pool::recall_all_rockets);

        app.init_resource::<Messages<messages::SpawnRocketRequest>>();
        app.init_resource::<Messages<messages::RocketExploded>>();
        app.add_systems(PostUpdate, update_rocket_messages);

        app.add_systems(
            FixedUpdate,
            (
                allocator::allocate_rockets_from_pool
                    .after(crate::plugins::weapons::fire_control),
                detonate::expire_rockets.after(allocator::allocate_rockets_from_pool),
            )
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedPostUpdate,
            (
                collision::process_rocket_intersections.after(CollisionEventSystems),
                detonate::detonate_rockets
                    .after(collision::process_rocket_intersections)
                    .before(crate::plugins::combat::apply_enemy_damage),
                commit::return_to_pool_commit.after(detonate::detonate_rockets),
            )
                .run_if(in_state(GameState::InGame)),
        );
    }
}
