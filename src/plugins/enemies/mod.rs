//! Enemies plugin: grunt chase AI, the multi-phase boss, and the
//! Alive → Dying → Dead life-state machine.
//!
//! Design points:
//! - AI state and health/damage state are orthogonal: damage messages are
//!   accepted in any movement state, and movement systems only check the
//!   life state.
//! - The life-state machine is the single place a death can be observed.
//!   `death_trigger` fires the `EnemyDied` callback exactly once (the
//!   Alive -> Dying edge), regardless of how many damage events landed in
//!   the tick or whether the enemy fell out of the world instead.
//! - Despawning is deferred: dying enemies stop interacting immediately
//!   (collision filters cleared, no structural change), animate out, then
//!   get a `PendingDespawn` marker that a PostUpdate sweep removes.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, rng::GameRng, state::GameState, tunables::Tunables};
use crate::plugins::combat::DamagePlayer;
use crate::plugins::player::Player;

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

/// Enemy identity; `score` is credited on death (zeroed for fall-through).
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy {
    pub score: u32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Grunt,
    Boss,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub hp: i32,
}

/// Enemy lifecycle state machine.
///
/// - Alive: normal gameplay.
/// - Dying: short transition animation; no longer interacts or takes damage.
/// - Dead: terminal marker to stop further state transitions.
#[derive(Component, Debug, Clone)]
pub enum EnemyLifeState {
    Alive,
    Dying { timer: Timer },
    Dead,
}

/// Marker: enemy should be removed from the world.
///
/// We don't despawn immediately in the fixed step; we mark and despawn
/// later, keeping structural changes centralized.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

/// Gate between contact damage events from this enemy.
#[derive(Component, Debug, Clone)]
pub struct ContactCooldown(pub Timer);

impl Default for ContactCooldown {
    fn default() -> Self {
        // Starts elapsed so the first contact always lands.
        let mut timer = Timer::from_seconds(0.0, TimerMode::Once);
        timer.tick(std::time::Duration::ZERO);
        Self(timer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossState {
    Chase,
    Dash,
    Jump,
}

/// Boss movement FSM plus the independent ranged-attack cooldown.
///
/// The attack check runs every tick irrespective of movement state; only
/// the dwell timer resets on transitions.
#[derive(Component, Debug)]
pub struct BossBrain {
    pub state: BossState,
    pub state_timer: f32,
    pub attack_cooldown: f32,
}

impl Default for BossBrain {
    fn default() -> Self {
        Self {
            state: BossState::Chase,
            state_timer: 0.0,
            attack_cooldown: 0.0,
        }
    }
}

// -----------------------------------------------------------------------------
// Messages
// -----------------------------------------------------------------------------

/// Death callback: emitted exactly once per enemy, on the Alive -> Dying
/// edge. Consumed by the wave director for score credit and population
/// bookkeeping.
#[derive(Message, Clone, Copy, Debug)]
pub struct EnemyDied {
    pub entity: Entity,
    pub score: u32,
}

// -----------------------------------------------------------------------------
// Plugin wiring
// -----------------------------------------------------------------------------

fn update_enemy_messages(mut died: ResMut<bevy::ecs::message::Messages<EnemyDied>>) {
    died.update();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<bevy::ecs::message::Messages<EnemyDied>>();
    app.add_systems(PostUpdate, update_enemy_messages);

    app.add_systems(
        FixedUpdate,
        (
            grunt_chase,
            boss_behavior,
            boss_ranged_attack,
            tick_contact_cooldowns,
            fall_out_check,
        )
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        (
            death_trigger.after(crate::plugins::combat::apply_enemy_damage),
            death_progress.after(death_trigger),
        )
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        PostUpdate,
        despawn_marked_enemies.run_if(in_state(GameState::InGame)),
    );
}

// -----------------------------------------------------------------------------
// Spawning
// -----------------------------------------------------------------------------

/// Collision layers for an enemy that should no longer interact with
/// anything; membership stays so no structural change is needed.
#[inline]
fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

#[inline]
fn active_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::World, Layer::Player, Layer::Rocket])
}

/// Spawn one enemy at a position. Used by the wave director.
pub fn spawn_enemy(
    commands: &mut Commands,
    kind: EnemyKind,
    position: Vec3,
    tunables: &Tunables,
) -> Entity {
    let (hp, score, radius, length, name) = match kind {
        EnemyKind::Grunt => (tunables.grunt_hp, tunables.grunt_score, 0.8, 0.8, "Grunt"),
        EnemyKind::Boss => (tunables.boss_hp, tunables.boss_score, 1.5, 2.0, "Boss"),
    };

    let mut e = commands.spawn((
        Name::new(name),
        Enemy { score },
        kind,
        Health { hp },
        EnemyLifeState::Alive,
        ContactCooldown::default(),
        Transform::from_translation(position),
        RigidBody::Dynamic,
        Collider::capsule(radius, length),
        LockedAxes::new().lock_rotation_x().lock_rotation_z(),
        active_enemy_layers(),
        LinearVelocity::ZERO,
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));

    if kind == EnemyKind::Boss {
        e.insert(BossBrain::default());
    }

    e.id()
}

// -----------------------------------------------------------------------------
// Movement AI
// -----------------------------------------------------------------------------

/// Horizontal direction from an enemy to the player, ignoring height.
#[inline]
fn horizontal_to_player(enemy: Vec3, player: Vec3) -> Vec3 {
    Vec3::new(player.x - enemy.x, 0.0, player.z - enemy.z).normalize_or_zero()
}

/// Grunts chase: horizontal velocity toward the player at grunt speed,
/// gravity passed through on the vertical axis, facing the move direction.
fn grunt_chase(
    tunables: Res<Tunables>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_grunts: Query<
        (&EnemyKind, &EnemyLifeState, &mut Transform, &mut LinearVelocity),
        (With<Enemy>, Without<Player>),
    >,
) {
    let Ok(player_tf) = q_player.single() else {
        return;
    };
    let player_pos = player_tf.translation;

    for (kind, life, mut tf, mut vel) in &mut q_grunts {
        if *kind != EnemyKind::Grunt || !matches!(life, EnemyLifeState::Alive) {
            continue;
        }
        let dir = horizontal_to_player(tf.translation, player_pos);
        vel.x = dir.x * tunables.grunt_speed;
        vel.z = dir.z * tunables.grunt_speed;

        let angle = dir.x.atan2(dir.z);
        tf.rotation = Quat::from_rotation_y(angle);
    }
}

/// Boss movement cycle: Chase for a dwell, then an even-odds Dash or Jump,
/// then back to Chase. Dwell timers reset to zero on every transition.
fn boss_behavior(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    mut rng: ResMut<GameRng>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_boss: Query<
        (&EnemyLifeState, &Transform, &mut LinearVelocity, &mut BossBrain),
        With<Enemy>,
    >,
) {
    let Ok(player_tf) = q_player.single() else {
        return;
    };
    let player_pos = player_tf.translation;
    let dt = time.delta_secs();

    for (life, tf, mut vel, mut brain) in &mut q_boss {
        if !matches!(life, EnemyLifeState::Alive) {
            continue;
        }
        brain.state_timer += dt;
        let dir = horizontal_to_player(tf.translation, player_pos);

        match brain.state {
            BossState::Chase => {
                vel.x = dir.x * tunables.boss_speed;
                vel.z = dir.z * tunables.boss_speed;
                if brain.state_timer > tunables.boss_dwell {
                    brain.state_timer = 0.0;
                    if rng.chance(0.5) {
                        brain.state = BossState::Dash;
                    } else {
                        brain.state = BossState::Jump;
                        // Single upward-and-forward impulse at state entry.
                        vel.0 += Vec3::new(dir.x * 10.0, 20.0, dir.z * 10.0);
                    }
                }
            }
            BossState::Dash => {
                let speed = tunables.boss_speed * tunables.boss_dash_multiplier;
                vel.0 = Vec3::new(dir.x * speed, 0.0, dir.z * speed);
                if brain.state_timer > tunables.boss_dash_duration {
                    brain.state = BossState::Chase;
                    brain.state_timer = 0.0;
                }
            }
            BossState::Jump => {
                if brain.state_timer > tunables.boss_jump_duration {
                    brain.state = BossState::Chase;
                    brain.state_timer = 0.0;
                }
            }
        }
    }
}

/// Independent periodic ranged attack: direct fixed damage whenever the
/// player is in range and the cooldown has elapsed, in any movement state.
fn boss_ranged_attack(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_boss: Query<(&EnemyLifeState, &Transform, &mut BossBrain), With<Enemy>>,
    mut damage: MessageWriter<DamagePlayer>,
) {
    let Ok(player_tf) = q_player.single() else {
        return;
    };
    let dt = time.delta_secs();

    for (life, tf, mut brain) in &mut q_boss {
        if !matches!(life, EnemyLifeState::Alive) {
            continue;
        }
        brain.attack_cooldown = (brain.attack_cooldown - dt).max(0.0);
        if brain.attack_cooldown > 0.0 {
            continue;
        }
        if tf.translation.distance(player_tf.translation) < tunables.boss_attack_range {
            damage.write(DamagePlayer {
                amount: tunables.boss_attack_damage,
            });
            brain.attack_cooldown = tunables.boss_attack_cooldown;
        }
    }
}

fn tick_contact_cooldowns(time: Res<Time<Fixed>>, mut q: Query<&mut ContactCooldown>) {
    for mut cooldown in &mut q {
        cooldown.0.tick(time.delta());
    }
}

/// Falling out of the playable volume kills without score credit.
fn fall_out_check(
    tunables: Res<Tunables>,
    mut q: Query<(&Transform, &EnemyLifeState, &mut Enemy, &mut Health)>,
) {
    for (tf, life, mut enemy, mut health) in &mut q {
        if !matches!(life, EnemyLifeState::Alive) {
            continue;
        }
        if tf.translation.y < tunables.kill_plane_y {
            enemy.score = 0;
            health.hp = 0;
        }
    }
}

// -----------------------------------------------------------------------------
// Death lifecycle
// -----------------------------------------------------------------------------

/// Transition Alive -> Dying when HP drops to 0 and fire the death
/// callback. This system does not despawn; it only transitions state and
/// enforces "dying invariants" (stop collision interaction).
pub fn death_trigger(
    mut q: Query<
        (Entity, &Enemy, &Health, &mut EnemyLifeState, &mut CollisionLayers),
        Without<PendingDespawn>,
    >,
    mut died: MessageWriter<EnemyDied>,
) {
    for (entity, enemy, health, mut life, mut layers) in &mut q {
        if !matches!(*life, EnemyLifeState::Alive) {
            continue;
        }
        if health.hp <= 0 {
            *life = EnemyLifeState::Dying {
                timer: Timer::from_seconds(0.35, TimerMode::Once),
            };
            *layers = non_interacting_enemy_layers();
            died.write(EnemyDied {
                entity,
                score: enemy.score,
            });
        }
    }
}

/// Animate the Dying state (shrink out) and mark PendingDespawn when done.
pub fn death_progress(
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut q: Query<
        (Entity, &mut EnemyLifeState, &mut Transform),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (e, mut life, mut tf) in &mut q {
        let EnemyLifeState::Dying { timer } = &mut *life else {
            continue;
        };

        timer.tick(time.delta());

        let dur = timer.duration().as_secs_f32().max(0.0001);
        let t = (timer.elapsed_secs() / dur).clamp(0.0, 1.0);
        tf.scale = Vec3::splat(1.0 - t);

        if timer.is_finished() {
            *life = EnemyLifeState::Dead;
            commands.entity(e).insert(PendingDespawn);
        }
    }
}

/// Despawn enemies marked for removal.
fn despawn_marked_enemies(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
