//! Global state machine.
//!
//! `GameOver` halts all simulation mutation: every gameplay system runs
//! under `in_state(GameState::InGame)`. Reset is a state round-trip
//! (`InGame -> GameOver -> InGame`): `DespawnOnExit(InGame)` clears the
//! arena and the `OnEnter(InGame)` systems re-insert fresh resources.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    GameOver,
}
