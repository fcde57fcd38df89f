//! Core plugin: shared resources every other gameplay plugin reads.

use bevy::prelude::*;

use crate::common::{rng::GameRng, state::GameState, tunables::Tunables};
use crate::plugins::weapons::WeaponTable;

pub fn plugin(app: &mut App) {
    app.init_state::<GameState>();
    app.insert_resource(Tunables::default());
    app.insert_resource(WeaponTable::default());
    app.insert_resource(GameRng::from_entropy());
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.06, 0.08)));

    app.add_systems(
        Update,
        restart_on_enter.run_if(in_state(GameState::GameOver)),
    );
}

/// Re-entering `InGame` is a full reset: `DespawnOnExit` cleared the
/// arena on the way out and every `OnEnter(InGame)` system re-inserts
/// fresh session resources.
fn restart_on_enter(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut next: ResMut<NextState<GameState>>,
) {
    let Some(keys) = keys else { return };
    if keys.just_pressed(KeyCode::Enter) {
        next.set(GameState::InGame);
    }
}
