//! Weapon plugin: firing cadence, ammo economy, reload, recoil, hit-scans.
//!
//! Per-weapon state machine: Idle <-> Firing <-> Reloading.
//! - firing is gated by cadence, the reloading flag, and sprint posture;
//! - an empty magazine at a fire attempt starts a reload instead
//!   (no ammo consumed, no fire event);
//! - reload blocks firing and weapon switching and resolves after the
//!   weapon's fixed duration.
//!
//! Semi-automatic weapons are strictly edge-triggered: one shot per trigger
//! press, still cadence-gated. Holding the trigger does not re-fire them.
//!
//! Fire events follow the producer → message → consumer shape: this module
//! writes `HitscanVolley` / `SpawnRocketRequest`, and `resolve_hitscans`
//! turns volleys into per-pellet ray casts with independent jitter.

use avian3d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::{layers::Layer, rng::GameRng, state::GameState, tunables::Tunables};
use crate::plugins::combat::DamageEnemy;
use crate::plugins::enemies::Enemy;
use crate::plugins::player::{LookAngles, Player, PlayerInput};
use crate::plugins::projectiles::messages::SpawnRocketRequest;

pub mod specs;

use specs::{WeaponKind, WeaponSpec};
pub use specs::WeaponTable;

// -----------------------------------------------------------------------------
// Loadout
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default)]
pub struct AmmoSlot {
    pub mag: u32,
    pub reserve: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireAttempt {
    /// A round left the magazine.
    Fired,
    /// Magazine empty; a reload was started instead (if possible).
    AutoReload,
    /// Reloading; no effect.
    Blocked,
}

/// Magazine/reserve state for every weapon plus the active selector and
/// the exclusive reloading flag.
#[derive(Resource, Debug)]
pub struct Loadout {
    slots: [AmmoSlot; 4],
    pub current: WeaponKind,
    reload: Option<Timer>,
}

impl Loadout {
    pub fn new(table: &WeaponTable) -> Self {
        let mut slots = [AmmoSlot::default(); 4];
        for kind in WeaponKind::ALL {
            let spec = table.spec(kind);
            slots[kind.index()] = AmmoSlot {
                mag: spec.mag_size,
                reserve: spec.initial_reserve,
            };
        }
        Self {
            slots,
            current: WeaponKind::Rifle,
            reload: None,
        }
    }

    #[inline]
    pub fn slot(&self, kind: WeaponKind) -> AmmoSlot {
        self.slots[kind.index()]
    }

    #[inline]
    pub fn is_reloading(&self) -> bool {
        self.reload.is_some()
    }

    /// Switching is a silent no-op while reloading; selecting the current
    /// weapon again is idempotent.
    pub fn switch_weapon(&mut self, kind: WeaponKind) -> bool {
        if self.is_reloading() {
            return false;
        }
        self.current = kind;
        true
    }

    /// Attempt to consume one round from the active magazine.
    pub fn try_fire(&mut self, spec: &WeaponSpec) -> FireAttempt {
        if self.is_reloading() {
            return FireAttempt::Blocked;
        }
        let slot = &mut self.slots[self.current.index()];
        if slot.mag > 0 {
            slot.mag -= 1;
            FireAttempt::Fired
        } else {
            self.begin_reload(spec);
            FireAttempt::AutoReload
        }
    }

    /// Start a reload. Never starts when the magazine is full, the reserve
    /// is empty, or a reload is already running.
    pub fn begin_reload(&mut self, spec: &WeaponSpec) -> bool {
        if self.is_reloading() {
            return false;
        }
        let slot = self.slot(self.current);
        if slot.mag >= spec.mag_size || slot.reserve == 0 {
            return false;
        }
        self.reload = Some(Timer::from_seconds(spec.reload_time, TimerMode::Once));
        true
    }

    /// Advance the reload timer; on completion move rounds from reserve to
    /// magazine, never above capacity, never leaving reserve negative.
    pub fn tick_reload(&mut self, dt: std::time::Duration, spec: &WeaponSpec) -> bool {
        let Some(timer) = &mut self.reload else {
            return false;
        };
        timer.tick(dt);
        if !timer.is_finished() {
            return false;
        }
        self.reload = None;

        let slot = &mut self.slots[self.current.index()];
        let to_load = (spec.mag_size - slot.mag).min(slot.reserve);
        slot.mag += to_load;
        slot.reserve -= to_load;
        true
    }

    /// Add reserve rounds to the active weapon (ammo pickup).
    pub fn add_reserve(&mut self, amount: u32) {
        self.slots[self.current.index()].reserve += amount;
    }
}

// -----------------------------------------------------------------------------
// Fire control + recoil
// -----------------------------------------------------------------------------

/// Cadence gate and the semi-auto trigger latch.
#[derive(Resource, Debug)]
pub struct FireControl {
    pub since_last_shot: f32,
}

impl Default for FireControl {
    fn default() -> Self {
        // Large enough that the first trigger pull always passes the gate.
        Self {
            since_last_shot: f32::MAX,
        }
    }
}

/// Recoil accumulator: positional kick plus pitch/yaw kick, exponentially
/// decayed toward zero every tick. Read by the render collaborator.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Recoil {
    pub offset: Vec3,
    pub rot: Vec2,
    /// Muzzle flash ticks remaining.
    pub flash: u8,
}

impl Recoil {
    const RECOVERY_RATE: f32 = 5.0;
    const FLASH_TICKS: u8 = 3;

    pub fn kick(&mut self, spec: &WeaponSpec, rng: &mut GameRng) {
        self.offset.z += 0.2;
        self.rot.x += spec.recoil;
        self.rot.y += (rng.random_f32() - 0.5) * spec.recoil;
        self.flash = Self::FLASH_TICKS;
    }

    pub fn decay(&mut self, dt: f32) {
        let alpha = 1.0 - (-Self::RECOVERY_RATE * dt).exp();
        self.offset = self.offset.lerp(Vec3::ZERO, alpha);
        self.rot = self.rot.lerp(Vec2::ZERO, alpha);
        self.flash = self.flash.saturating_sub(1);
    }
}

// -----------------------------------------------------------------------------
// Messages
// -----------------------------------------------------------------------------

/// One trigger pull's worth of hit-scan rays. The consumer fans this out
/// into `pellets` independent casts.
#[derive(Message, Clone, Copy, Debug)]
pub struct HitscanVolley {
    pub origin: Vec3,
    pub dir: Vec3,
    pub damage: f32,
    pub pellets: u32,
    pub spread: f32,
}

/// Observational: a shot was fired (audio/VFX seam).
#[derive(Message, Clone, Copy, Debug)]
pub struct ShotFired {
    pub kind: WeaponKind,
}

/// Observational: a reload began (audio/VFX seam).
#[derive(Message, Clone, Copy, Debug)]
pub struct ReloadStarted {
    pub kind: WeaponKind,
}

// -----------------------------------------------------------------------------
// Plugin wiring
// -----------------------------------------------------------------------------

fn update_weapon_messages(
    mut volleys: ResMut<Messages<HitscanVolley>>,
    mut shots: ResMut<Messages<ShotFired>>,
    mut reloads: ResMut<Messages<ReloadStarted>>,
) {
    volleys.update();
    shots.update();
    reloads.update();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Messages<HitscanVolley>>();
    app.init_resource::<Messages<ShotFired>>();
    app.init_resource::<Messages<ReloadStarted>>();
    app.add_systems(PostUpdate, update_weapon_messages);

    app.add_systems(OnEnter(GameState::InGame), reset_weapon_state);

    app.add_systems(
        FixedUpdate,
        (
            handle_weapon_actions,
            fire_control.after(handle_weapon_actions),
            resolve_hitscans.after(fire_control),
        )
            .run_if(in_state(GameState::InGame)),
    );
}

fn reset_weapon_state(mut commands: Commands, table: Res<WeaponTable>) {
    commands.insert_resource(Loadout::new(&table));
    commands.insert_resource(FireControl::default());
    commands.insert_resource(Recoil::default());
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

/// Weapon switching, manual reload, and reload completion.
fn handle_weapon_actions(
    time: Res<Time<Fixed>>,
    table: Res<WeaponTable>,
    mut input: ResMut<PlayerInput>,
    mut loadout: ResMut<Loadout>,
    mut reloads: MessageWriter<ReloadStarted>,
) {
    if let Some(kind) = input.switch_to.take() {
        // Silent no-op while reloading; routine input race, not an error.
        loadout.switch_weapon(kind);
    }

    if std::mem::take(&mut input.reload_pressed) {
        let spec = table.spec(loadout.current);
        if loadout.begin_reload(spec) {
            reloads.write(ReloadStarted {
                kind: loadout.current,
            });
        }
    }

    let spec = table.spec(loadout.current);
    loadout.tick_reload(time.delta(), spec);
}

/// Fire decision for the current tick: emits exactly one fire event per
/// successful trigger pull (a hit-scan volley or one rocket spawn request).
pub fn fire_control(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    table: Res<WeaponTable>,
    look: Res<LookAngles>,
    mut input: ResMut<PlayerInput>,
    mut loadout: ResMut<Loadout>,
    mut control: ResMut<FireControl>,
    mut recoil: ResMut<Recoil>,
    mut rng: ResMut<GameRng>,
    q_player: Query<(Entity, &Transform), With<Player>>,
    mut volleys: MessageWriter<HitscanVolley>,
    mut rockets: MessageWriter<SpawnRocketRequest>,
    mut shots: MessageWriter<ShotFired>,
    mut reloads: MessageWriter<ReloadStarted>,
) {
    let dt = time.delta_secs();
    control.since_last_shot = control.since_last_shot.max(0.0) + dt;
    recoil.decay(dt);

    let spec = table.spec(loadout.current);
    let triggered = if spec.automatic {
        input.fire_held
    } else {
        std::mem::take(&mut input.fire_pressed)
    };
    // A held trigger must not bank an edge for later ticks.
    if spec.automatic {
        input.fire_pressed = false;
    }

    if !triggered || input.sprint {
        return;
    }
    if control.since_last_shot < spec.fire_interval {
        return;
    }

    let Ok((player, player_tf)) = q_player.single() else {
        return;
    };

    match loadout.try_fire(spec) {
        FireAttempt::Blocked => return,
        FireAttempt::AutoReload => {
            if loadout.is_reloading() {
                reloads.write(ReloadStarted {
                    kind: loadout.current,
                });
            }
            return;
        }
        FireAttempt::Fired => {}
    }

    control.since_last_shot = 0.0;
    recoil.kick(spec, &mut rng);
    shots.write(ShotFired {
        kind: loadout.current,
    });

    let origin = player_tf.translation + Vec3::Y * tunables.eye_height;
    let dir = look.forward();

    if spec.projectile {
        rockets.write(SpawnRocketRequest {
            // Nudged forward so the sensor does not trip on the player.
            origin: origin + dir,
            dir,
            damage: spec.damage,
            owner: Some(player),
        });
    } else {
        volleys.write(HitscanVolley {
            origin,
            dir,
            damage: spec.damage,
            pellets: spec.pellets,
            spread: spec.spread,
        });
    }
}

/// Fan a volley out into per-pellet ray casts. Each pellet gets its own
/// spread jitter; crit rolls happen downstream per resolved hit.
pub fn resolve_hitscans(
    mut reader: MessageReader<HitscanVolley>,
    tunables: Res<Tunables>,
    mut rng: ResMut<GameRng>,
    spatial: SpatialQuery,
    q_enemies: Query<(), With<Enemy>>,
    mut damage: MessageWriter<DamageEnemy>,
) {
    let filter = SpatialQueryFilter::from_mask([Layer::World, Layer::Enemy]);

    for volley in reader.read() {
        for _ in 0..volley.pellets {
            let mut dir = volley.dir;
            dir.x += (rng.random_f32() - 0.5) * volley.spread;
            dir.y += (rng.random_f32() - 0.5) * volley.spread;
            let Ok(dir) = Dir3::new(dir) else {
                continue;
            };

            let Some(hit) =
                spatial.cast_ray(volley.origin, dir, tunables.hitscan_range, true, &filter)
            else {
                continue;
            };
            if q_enemies.contains(hit.entity) {
                damage.write(DamageEnemy {
                    target: hit.entity,
                    raw: volley.damage,
                    falloff: None,
                });
            }
        }
    }
}
