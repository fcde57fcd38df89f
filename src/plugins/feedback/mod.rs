//! Feedback plugin: log drains for observational messages and damage-text
//! expiry. A renderer would replace this with audio/VFX/HUD consumers.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::combat::{DamageTexts, HitLanded};
use crate::plugins::enemies::EnemyDied;
use crate::plugins::projectiles::RocketExploded;
use crate::plugins::weapons::{ReloadStarted, ShotFired};

const DAMAGE_TEXT_LIFETIME: f64 = 1.0;

fn log_feedback(
    mut shots: MessageReader<ShotFired>,
    mut reloads: MessageReader<ReloadStarted>,
    mut hits: MessageReader<HitLanded>,
    mut explosions: MessageReader<RocketExploded>,
    mut deaths: MessageReader<EnemyDied>,
) {
    for shot in shots.read() {
        debug!(kind = ?shot.kind, "shot fired");
    }
    for reload in reloads.read() {
        debug!(kind = ?reload.kind, "reload started");
    }
    for hit in hits.read() {
        debug!(crit = hit.crit, "hit landed");
    }
    for explosion in explosions.read() {
        debug!(position = ?explosion.position, "rocket exploded");
    }
    for death in deaths.read() {
        debug!(entity = ?death.entity, score = death.score, "enemy died");
    }
}

/// Expire floating damage numbers the renderer never claimed.
fn expire_damage_texts(time: Res<Time>, mut texts: ResMut<DamageTexts>) {
    let now = time.elapsed_secs_f64();
    let expired: Vec<u64> = texts
        .iter()
        .filter(|t| now - t.spawned_at > DAMAGE_TEXT_LIFETIME)
        .map(|t| t.id)
        .collect();
    for id in expired {
        texts.remove(id);
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (log_feedback, expire_damage_texts).run_if(in_state(GameState::InGame)),
    );
}
