//! Buffered rocket messages.
//!
//! Producers create *intent*; the allocator is the single writer that
//! mutates the pool. This is a producer → queue → consumer pipeline.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnRocketRequest {
    pub origin: Vec3,
    pub dir: Vec3,
    pub damage: f32,
    pub owner: Option<Entity>,
}

/// Observational: a rocket detonated (audio/VFX seam).
#[derive(Message, Clone, Copy, Debug)]
pub struct RocketExploded {
    pub position: Vec3,
}
