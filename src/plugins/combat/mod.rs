//! Combat plugin: damage resolution, score, and floating damage text.
//!
//! Damage is a producer → queue → consumer pipeline:
//! - producers (hit-scan resolution, rocket detonation, enemy attacks)
//!   write `DamageEnemy` / `DamagePlayer` messages;
//! - the consumers in this module are the only writers of enemy `Health`
//!   and `PlayerVitals`.
//!
//! That single-writer rule is what makes the ordering invariants cheap to
//! uphold: a target removed earlier in the tick simply fails the query
//! lookup and the message is dropped (an already-dead entity never takes
//! further damage), and armor-before-health arithmetic lives in exactly
//! one place.

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::rng::GameRng;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{Enemy, EnemyLifeState, Health};
use crate::plugins::player::PlayerVitals;

// -----------------------------------------------------------------------------
// Pure resolution
// -----------------------------------------------------------------------------

/// Distance falloff parameters for splash damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplashFalloff {
    pub distance: f32,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedDamage {
    pub amount: i32,
    pub is_crit: bool,
}

/// Linear splash scale `1 - distance/radius`, clamped to `[0, 1]`.
#[inline]
pub fn splash_scale(falloff: SplashFalloff) -> f32 {
    if falloff.radius <= 0.0 {
        return 0.0;
    }
    (1.0 - falloff.distance / falloff.radius).clamp(0.0, 1.0)
}

/// Resolve raw damage into a final applied amount.
///
/// Splash scaling happens before the floor; the crit doubling after it.
/// The caller supplies the crit roll so resolution itself stays pure.
pub fn resolve_damage(raw: f32, falloff: Option<SplashFalloff>, is_crit: bool) -> ResolvedDamage {
    let scaled = match falloff {
        Some(f) => raw * splash_scale(f),
        None => raw,
    };
    let floored = scaled.floor() as i32;
    ResolvedDamage {
        amount: if is_crit { floored * 2 } else { floored },
        is_crit,
    }
}

// -----------------------------------------------------------------------------
// Messages
// -----------------------------------------------------------------------------

/// Damage intent against one enemy. `falloff` is set for splash sources.
#[derive(Message, Clone, Copy, Debug)]
pub struct DamageEnemy {
    pub target: Entity,
    pub raw: f32,
    pub falloff: Option<SplashFalloff>,
}

/// Damage intent against the player. Enemy damage is raw (no crit roll);
/// armor-then-health absorption happens at application time.
#[derive(Message, Clone, Copy, Debug)]
pub struct DamagePlayer {
    pub amount: i32,
}

/// Observational: a resolved hit landed on an enemy (audio/VFX seam).
#[derive(Message, Clone, Copy, Debug)]
pub struct HitLanded {
    pub crit: bool,
}

// -----------------------------------------------------------------------------
// Resources
// -----------------------------------------------------------------------------

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Score {
    pub points: u32,
    pub enemies_killed: u32,
}

/// One floating damage number, owned by the core, displayed by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct DamageText {
    pub id: u64,
    pub position: Vec3,
    pub value: i32,
    pub crit: bool,
    /// Creation time in elapsed seconds; the renderer decides when to
    /// call `remove`, the core never inspects display timing.
    pub spawned_at: f64,
}

#[derive(Resource, Debug, Default)]
pub struct DamageTexts {
    entries: Vec<DamageText>,
    next_id: u64,
}

impl DamageTexts {
    pub fn add(&mut self, position: Vec3, value: i32, crit: bool, now: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(DamageText {
            id,
            position,
            value,
            crit,
            spawned_at: now,
        });
        id
    }

    /// Remove by id; unknown ids are a safe no-op.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t.id != id);
        self.entries.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &DamageText> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Plugin wiring
// -----------------------------------------------------------------------------

fn update_combat_messages(
    mut enemy_msgs: ResMut<Messages<DamageEnemy>>,
    mut player_msgs: ResMut<Messages<DamagePlayer>>,
    mut hit_msgs: ResMut<Messages<HitLanded>>,
) {
    enemy_msgs.update();
    player_msgs.update();
    hit_msgs.update();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Messages<DamageEnemy>>();
    app.init_resource::<Messages<DamagePlayer>>();
    app.init_resource::<Messages<HitLanded>>();
    app.add_systems(PostUpdate, update_combat_messages);

    app.add_systems(OnEnter(GameState::InGame), reset_combat_state);

    // Damage application happens after all producers of this tick:
    // hit-scans (FixedUpdate) and detonations (FixedPostUpdate, ordered
    // before this via the projectiles plugin).
    app.add_systems(
        FixedPostUpdate,
        (apply_enemy_damage, apply_player_damage.after(apply_enemy_damage))
            .run_if(in_state(GameState::InGame)),
    );
}

fn reset_combat_state(mut commands: Commands) {
    commands.insert_resource(Score::default());
    commands.insert_resource(DamageTexts::default());
}

// -----------------------------------------------------------------------------
// Consumers
// -----------------------------------------------------------------------------

/// Apply queued enemy damage: crit roll, health subtraction, damage text.
///
/// Targets that are gone or no longer `Alive` are skipped; deletion and
/// message delivery are not atomically ordered across a tick, so a stale
/// target is routine, not a fault.
pub fn apply_enemy_damage(
    mut reader: MessageReader<DamageEnemy>,
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut rng: ResMut<GameRng>,
    mut texts: ResMut<DamageTexts>,
    mut hits: MessageWriter<HitLanded>,
    mut q_enemies: Query<(&Transform, &EnemyLifeState, &mut Health), With<Enemy>>,
) {
    let now = time.elapsed_secs_f64();

    for msg in reader.read() {
        let Ok((tf, life, mut health)) = q_enemies.get_mut(msg.target) else {
            continue;
        };
        if !matches!(life, EnemyLifeState::Alive) {
            continue;
        }

        let resolved = resolve_damage(msg.raw, msg.falloff, rng.chance(tunables.crit_chance));
        if resolved.amount <= 0 {
            continue;
        }

        health.hp -= resolved.amount;

        texts.add(
            tf.translation + Vec3::Y * 2.0,
            resolved.amount,
            resolved.is_crit,
            now,
        );
        hits.write(HitLanded {
            crit: resolved.is_crit,
        });
    }
}

/// Apply queued player damage and flip to `GameOver` on death.
///
/// `PlayerVitals::take_damage` is idempotent after death, so late messages
/// in the same tick cannot produce a second death transition.
pub fn apply_player_damage(
    mut reader: MessageReader<DamagePlayer>,
    mut vitals: ResMut<PlayerVitals>,
    mut next: ResMut<NextState<GameState>>,
) {
    for msg in reader.read() {
        if vitals.take_damage(msg.amount) == crate::plugins::player::DamageOutcome::Died {
            next.set(GameState::GameOver);
        }
    }
}
