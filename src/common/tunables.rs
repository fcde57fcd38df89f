//! Tunable gameplay constants.
//!
//! Every probability and timing constant the simulation branches on
//! lives here, so tests can pin them and balancing stays in one place.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub player_speed: f32,
    pub sprint_multiplier: f32,
    pub crouch_multiplier: f32,
    pub jump_force: f32,
    pub eye_height: f32,
    pub crouch_eye_height: f32,

    pub max_hp: i32,
    pub max_armor: i32,

    /// Probability that a resolved enemy hit is a critical (doubled) hit.
    pub crit_chance: f32,

    pub contact_damage: i32,
    /// Minimum seconds between contact damage events from one enemy.
    pub contact_cooldown: f32,

    pub grunt_hp: i32,
    pub grunt_speed: f32,
    pub grunt_score: u32,
    pub boss_hp: i32,
    pub boss_speed: f32,
    pub boss_score: u32,
    /// Seconds the boss chases before picking a dash or jump.
    pub boss_dwell: f32,
    pub boss_dash_multiplier: f32,
    pub boss_dash_duration: f32,
    pub boss_jump_duration: f32,
    pub boss_attack_damage: i32,
    pub boss_attack_range: f32,
    pub boss_attack_cooldown: f32,

    pub arena_half_extent: f32,
    /// Entities below this height are dead by fall-through.
    pub kill_plane_y: f32,

    pub boss_wave_interval: u32,
    pub spawn_ring_min: f32,
    pub spawn_ring_max: f32,
    pub wave_advance_delay: f32,

    pub hitscan_range: f32,
    pub rocket_speed: f32,
    pub rocket_splash_radius: f32,
    pub rocket_lifetime: f32,
    pub rocket_knockback: f32,

    pub heal_pickup: i32,
    pub armor_pickup: i32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            player_speed: 6.0,
            sprint_multiplier: 1.6,
            crouch_multiplier: 0.5,
            jump_force: 6.0,
            eye_height: 1.6,
            crouch_eye_height: 0.8,

            max_hp: 100,
            max_armor: 50,

            crit_chance: 0.2,

            contact_damage: 5,
            contact_cooldown: 0.5,

            grunt_hp: 50,
            grunt_speed: 3.0,
            grunt_score: 50,
            boss_hp: 1000,
            boss_speed: 5.0,
            boss_score: 500,
            boss_dwell: 5.0,
            boss_dash_multiplier: 4.0,
            boss_dash_duration: 0.5,
            boss_jump_duration: 2.0,
            boss_attack_damage: 10,
            boss_attack_range: 20.0,
            boss_attack_cooldown: 2.0,

            arena_half_extent: 30.0,
            kill_plane_y: -20.0,

            boss_wave_interval: 5,
            spawn_ring_min: 15.0,
            spawn_ring_max: 30.0,
            wave_advance_delay: 1.0,

            hitscan_range: 100.0,
            rocket_speed: 25.0,
            rocket_splash_radius: 5.0,
            rocket_lifetime: 6.0,
            rocket_knockback: 20.0,

            heal_pickup: 50,
            armor_pickup: 25,
        }
    }
}
