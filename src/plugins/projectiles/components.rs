use bevy::prelude::*;

/// Marker: entity belongs to the rocket pool for its whole lifetime.
#[derive(Component)]
pub struct PooledRocket;

/// Rocket lifecycle.
///
/// `PendingDetonate` and `PendingReturn` are one-tick transit states:
/// collision marks, detonation broadcasts, commit recycles. The split keeps
/// each write site single-purpose and makes "explodes exactly once" a state
/// machine fact rather than a flag dance.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RocketState {
    #[default]
    Inactive,
    Active,
    PendingDetonate,
    PendingReturn,
}

#[derive(Component, Debug, Clone)]
pub struct Rocket {
    pub damage: f32,
    pub splash_radius: f32,
    /// Excluded from intersection handling (no self-damage on launch).
    pub owner: Option<Entity>,
    pub lifetime: Timer,
}

impl Rocket {
    pub fn idle() -> Self {
        Self {
            damage: 0.0,
            splash_radius: 0.0,
            owner: None,
            lifetime: Timer::from_seconds(0.0, TimerMode::Once),
        }
    }

    #[inline]
    pub fn reset_for_launch(
        &mut self,
        damage: f32,
        splash_radius: f32,
        owner: Option<Entity>,
        lifetime: f32,
    ) {
        self.damage = damage;
        self.splash_radius = splash_radius;
        self.owner = owner;
        self.lifetime = Timer::from_seconds(lifetime, TimerMode::Once);
    }
}
