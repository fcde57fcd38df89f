//! Static per-weapon specifications. Loaded once, never mutated.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Rifle,
    Shotgun,
    Smg,
    Rocket,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Rifle,
        WeaponKind::Shotgun,
        WeaponKind::Smg,
        WeaponKind::Rocket,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            WeaponKind::Rifle => 0,
            WeaponKind::Shotgun => 1,
            WeaponKind::Smg => 2,
            WeaponKind::Rocket => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WeaponSpec {
    pub name: &'static str,
    /// Damage per hit (per pellet for the shotgun).
    pub damage: f32,
    /// Seconds between shots.
    pub fire_interval: f32,
    pub mag_size: u32,
    /// Seconds to complete a reload.
    pub reload_time: f32,
    pub spread: f32,
    /// Simultaneous hit-scan rays per trigger pull.
    pub pellets: u32,
    pub automatic: bool,
    pub recoil: f32,
    /// True for weapons that launch a physical projectile instead of rays.
    pub projectile: bool,
    pub initial_reserve: u32,
}

#[derive(Resource, Debug, Clone)]
pub struct WeaponTable {
    specs: [WeaponSpec; 4],
}

impl WeaponTable {
    #[inline]
    pub fn spec(&self, kind: WeaponKind) -> &WeaponSpec {
        &self.specs[kind.index()]
    }
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            specs: [
                WeaponSpec {
                    name: "Assault Rifle",
                    damage: 15.0,
                    fire_interval: 0.1,
                    mag_size: 30,
                    reload_time: 2.0,
                    spread: 0.05,
                    pellets: 1,
                    automatic: true,
                    recoil: 0.1,
                    projectile: false,
                    initial_reserve: 120,
                },
                WeaponSpec {
                    name: "Pump Shotgun",
                    damage: 12.0,
                    fire_interval: 0.8,
                    mag_size: 8,
                    reload_time: 3.0,
                    spread: 0.2,
                    pellets: 8,
                    automatic: false,
                    recoil: 0.5,
                    projectile: false,
                    initial_reserve: 32,
                },
                WeaponSpec {
                    name: "Vector SMG",
                    damage: 8.0,
                    fire_interval: 0.05,
                    mag_size: 40,
                    reload_time: 1.5,
                    spread: 0.12,
                    pellets: 1,
                    automatic: true,
                    recoil: 0.08,
                    projectile: false,
                    initial_reserve: 200,
                },
                WeaponSpec {
                    name: "Doombringer",
                    damage: 150.0,
                    fire_interval: 1.5,
                    mag_size: 1,
                    reload_time: 2.5,
                    spread: 0.01,
                    pellets: 1,
                    automatic: false,
                    recoil: 1.0,
                    projectile: true,
                    initial_reserve: 5,
                },
            ],
        }
    }
}
