//! Wave director: rosters, spawn placement, and progression.
//!
//! Progression is driven entirely by the `EnemyDied` callback: the live
//! counter decrements, score is credited, and when the counter hits zero
//! a single advance timer is armed. The timer guard means overlapping
//! deaths in one tick can never double-advance a wave.

use bevy::prelude::*;

use crate::common::{rng::GameRng, state::GameState, tunables::Tunables};
use crate::plugins::combat::Score;
use crate::plugins::enemies::{self, EnemyDied, EnemyKind};

/// Wave progression state.
#[derive(Resource, Debug)]
pub struct WaveState {
    /// 1-based wave number.
    pub wave: u32,
    /// Enemies from the current roster still alive.
    pub live: u32,
    /// Armed once when `live` reaches zero; fires the next wave.
    pub advance_timer: Option<Timer>,
}

impl WaveState {
    fn new() -> Self {
        Self {
            wave: 1,
            live: 0,
            advance_timer: None,
        }
    }
}

/// Roster for a wave: grunt count plus whether a boss joins.
///
/// Every Nth wave adds a boss on top of the grunt roster, which keeps
/// growing through boss waves.
pub fn roster(wave: u32, boss_interval: u32) -> (u32, bool) {
    let grunts = wave * 3 + 2;
    let boss = boss_interval > 0 && wave % boss_interval == 0;
    (grunts, boss)
}

fn spawn_roster(
    commands: &mut Commands,
    state: &mut WaveState,
    rng: &mut GameRng,
    tunables: &Tunables,
) {
    let (grunts, boss) = roster(state.wave, tunables.boss_wave_interval);

    for _ in 0..grunts {
        let angle = rng.random_f32() * std::f32::consts::TAU;
        let radius = rng.random_range(tunables.spawn_ring_min, tunables.spawn_ring_max);
        let pos = Vec3::new(angle.cos() * radius, 2.0, angle.sin() * radius);
        enemies::spawn_enemy(commands, EnemyKind::Grunt, pos, tunables);
    }

    let mut live = grunts;
    if boss {
        enemies::spawn_enemy(commands, EnemyKind::Boss, Vec3::new(0.0, 5.0, -20.0), tunables);
        live += 1;
    }

    state.live = live;
    state.advance_timer = None;
    info!(wave = state.wave, grunts, boss, "wave spawned");
}

fn start_first_wave(
    mut commands: Commands,
    mut rng: ResMut<GameRng>,
    tunables: Res<Tunables>,
) {
    let mut state = WaveState::new();
    spawn_roster(&mut commands, &mut state, &mut rng, &tunables);
    commands.insert_resource(state);
}

/// Drain death callbacks: score credit, live-count bookkeeping, and the
/// guarded arming of the advance timer.
pub fn handle_enemy_deaths(
    mut deaths: MessageReader<EnemyDied>,
    tunables: Res<Tunables>,
    mut state: ResMut<WaveState>,
    mut score: ResMut<Score>,
) {
    for death in deaths.read() {
        score.points += death.score;
        score.enemies_killed += 1;
        state.live = state.live.saturating_sub(1);

        if state.live == 0 && state.advance_timer.is_none() {
            state.advance_timer = Some(Timer::from_seconds(
                tunables.wave_advance_delay,
                TimerMode::Once,
            ));
        }
    }
}

/// Tick the armed advance timer and spawn the next roster when it fires.
pub fn advance_wave(
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut state: ResMut<WaveState>,
    mut rng: ResMut<GameRng>,
    tunables: Res<Tunables>,
) {
    let Some(timer) = state.advance_timer.as_mut() else {
        return;
    };
    timer.tick(time.delta());
    if !timer.is_finished() {
        return;
    }

    state.wave += 1;
    spawn_roster(&mut commands, &mut state, &mut rng, &tunables);
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), start_first_wave);

    app.add_systems(
        FixedPostUpdate,
        handle_enemy_deaths
            .after(crate::plugins::enemies::death_trigger)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        advance_wave.run_if(in_state(GameState::InGame)),
    );
}

#[cfg(test)]
mod tests;
