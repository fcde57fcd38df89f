//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input devices, accumulate into the `PlayerInput` snapshot
//!   (edges are latched so a press between fixed ticks is never lost)
//! - FixedUpdate: apply look + locomotion to the dynamic rigid body
//! - FixedPostUpdate: contact damage intake from collision messages
//!
//! `PlayerVitals` is the single source of truth for hp/armor; the combat
//! plugin is its only writer during play.

use avian3d::collision::narrow_phase::CollisionEventSystems;
use avian3d::prelude::*;
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::combat::DamagePlayer;
use crate::plugins::enemies::{ContactCooldown, Enemy, EnemyLifeState};
use crate::plugins::weapons::specs::WeaponKind;

#[derive(Component)]
pub struct Player;

// -----------------------------------------------------------------------------
// Vitals
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Player already dead; the hit was a no-op.
    Ignored,
    Applied,
    /// Health crossed to zero on this hit. Reported exactly once.
    Died,
}

/// Player health and armor. Armor absorbs before health; health is floored
/// at zero; death flips `alive` exactly once and further damage is ignored.
#[derive(Resource, Debug, Clone)]
pub struct PlayerVitals {
    pub hp: i32,
    pub max_hp: i32,
    pub armor: i32,
    pub max_armor: i32,
    alive: bool,
}

impl PlayerVitals {
    pub fn new(max_hp: i32, max_armor: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            armor: 0,
            max_armor,
            alive: true,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        let absorbed = self.armor.min(amount.max(0));
        self.armor -= absorbed;
        self.hp = (self.hp - (amount.max(0) - absorbed)).max(0);

        if self.hp == 0 {
            self.alive = false;
            DamageOutcome::Died
        } else {
            DamageOutcome::Applied
        }
    }

    pub fn heal(&mut self, amount: i32) {
        if self.alive {
            self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        }
    }

    pub fn add_armor(&mut self, amount: i32) {
        if self.alive {
            self.armor = (self.armor + amount.max(0)).min(self.max_armor);
        }
    }
}

// -----------------------------------------------------------------------------
// Input snapshot
// -----------------------------------------------------------------------------

/// Abstract input snapshot for one fixed tick.
///
/// Held states are overwritten every frame; edge-triggered fields
/// (`jump`, `fire_pressed`, `reload_pressed`, `switch_to`) are latched on
/// press and cleared by the system that consumes them.
#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    pub look_delta: Vec2,
    pub jump: bool,
    pub sprint: bool,
    pub crouch: bool,
    pub fire_held: bool,
    pub fire_pressed: bool,
    pub reload_pressed: bool,
    pub switch_to: Option<WeaponKind>,
}

/// First-person look state. Pitch is clamped just short of straight up/down.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl LookAngles {
    pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.1;
    pub const SENSITIVITY: f32 = 0.002;

    pub fn apply_delta(&mut self, delta: Vec2) {
        self.yaw -= delta.x * Self::SENSITIVITY;
        self.pitch = (self.pitch - delta.y * Self::SENSITIVITY)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// World-space aim direction.
    pub fn forward(&self) -> Vec3 {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0) * Vec3::NEG_Z
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

// -----------------------------------------------------------------------------
// Plugin wiring
// -----------------------------------------------------------------------------

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default());

    app.add_systems(OnEnter(GameState::InGame), (reset_player_state, spawn));

    app.add_systems(Update, gather_input.run_if(in_state(GameState::InGame)));

    app.add_systems(
        FixedUpdate,
        (apply_look, apply_movement.after(apply_look)).run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        contact_damage
            .after(CollisionEventSystems)
            .before(crate::plugins::combat::apply_player_damage)
            .run_if(in_state(GameState::InGame)),
    );
}

fn reset_player_state(mut commands: Commands, tunables: Res<Tunables>) {
    commands.insert_resource(PlayerVitals::new(tunables.max_hp, tunables.max_armor));
    commands.insert_resource(LookAngles::default());
    commands.insert_resource(PlayerInput::default());
}

fn spawn(mut commands: Commands) {
    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::World, Layer::Enemy, Layer::Pickup],
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        Transform::from_xyz(0.0, 5.0, 0.0),
        RigidBody::Dynamic,
        Collider::capsule(0.5, 1.6),
        LockedAxes::ROTATION_LOCKED,
        layers,
        LinearVelocity::ZERO,
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));
}

// -----------------------------------------------------------------------------
// Input sampling (Update, per frame)
// -----------------------------------------------------------------------------

fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut motion: MessageReader<MouseMotion>,
    mut input: ResMut<PlayerInput>,
) {
    let Some(keys) = keys else { return };

    let mut axis = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }
    input.move_axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec2::ZERO
    };

    input.sprint = keys.pressed(KeyCode::ShiftLeft);
    input.crouch = keys.pressed(KeyCode::ControlLeft);
    if keys.just_pressed(KeyCode::Space) {
        input.jump = true;
    }
    if keys.just_pressed(KeyCode::KeyR) {
        input.reload_pressed = true;
    }

    for (code, kind) in [
        (KeyCode::Digit1, WeaponKind::Rifle),
        (KeyCode::Digit2, WeaponKind::Shotgun),
        (KeyCode::Digit3, WeaponKind::Smg),
        (KeyCode::Digit4, WeaponKind::Rocket),
    ] {
        if keys.just_pressed(code) {
            input.switch_to = Some(kind);
        }
    }

    if let Some(buttons) = buttons {
        input.fire_held = buttons.pressed(MouseButton::Left);
        if buttons.just_pressed(MouseButton::Left) {
            input.fire_pressed = true;
        }
    }

    for ev in motion.read() {
        input.look_delta += ev.delta;
    }
}

// -----------------------------------------------------------------------------
// Fixed-step locomotion
// -----------------------------------------------------------------------------

fn apply_look(mut input: ResMut<PlayerInput>, mut look: ResMut<LookAngles>) {
    let delta = std::mem::take(&mut input.look_delta);
    look.apply_delta(delta);
}

/// Set horizontal velocity from the move axis rotated by the look yaw,
/// preserving the vertical component for gravity; jump only when a short
/// downward ray confirms ground contact.
fn apply_movement(
    tunables: Res<Tunables>,
    look: Res<LookAngles>,
    mut input: ResMut<PlayerInput>,
    spatial: SpatialQuery,
    mut q_player: Query<(Entity, &Transform, &mut LinearVelocity), With<Player>>,
) {
    let Ok((entity, tf, mut vel)) = q_player.single_mut() else {
        return;
    };

    let mut speed = tunables.player_speed;
    if input.sprint {
        speed *= tunables.sprint_multiplier;
    }
    if input.crouch {
        speed *= tunables.crouch_multiplier;
    }

    // W is always "forward" relative to where the player is looking.
    let horizontal =
        Quat::from_rotation_y(look.yaw) * Vec3::new(input.move_axis.x, 0.0, -input.move_axis.y);
    vel.x = horizontal.x * speed;
    vel.z = horizontal.z * speed;

    if std::mem::take(&mut input.jump) {
        let filter = SpatialQueryFilter::from_mask(Layer::World).with_excluded_entities([entity]);
        let grounded = spatial
            .cast_ray(tf.translation, Dir3::NEG_Y, 1.1, true, &filter)
            .is_some();
        if grounded && vel.y.abs() < 0.1 {
            vel.y += tunables.jump_force;
        }
    }
}

// -----------------------------------------------------------------------------
// Contact damage intake
// -----------------------------------------------------------------------------

/// Enemy body touching the player deals flat contact damage, gated by a
/// per-enemy cooldown so sustained contact cannot re-trigger every tick.
pub fn contact_damage(
    mut started: MessageReader<CollisionStart>,
    tunables: Res<Tunables>,
    q_player: Query<(), With<Player>>,
    mut q_enemies: Query<(&EnemyLifeState, &mut ContactCooldown), With<Enemy>>,
    mut damage: MessageWriter<DamagePlayer>,
) {
    for ev in started.read() {
        let (a, b) = (
            ev.body1.unwrap_or(ev.collider1),
            ev.body2.unwrap_or(ev.collider2),
        );

        let enemy = if q_player.contains(a) {
            b
        } else if q_player.contains(b) {
            a
        } else {
            continue;
        };

        let Ok((life, mut cooldown)) = q_enemies.get_mut(enemy) else {
            continue;
        };
        if !matches!(life, EnemyLifeState::Alive) || !cooldown.0.is_finished() {
            continue;
        }

        cooldown.0 = Timer::from_seconds(tunables.contact_cooldown, TimerMode::Once);
        damage.write(DamagePlayer {
            amount: tunables.contact_damage,
        });
    }
}

#[cfg(test)]
mod tests;
