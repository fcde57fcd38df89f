//! First-person camera (render-only).
//!
//! The camera mirrors simulation state each frame: player position plus
//! eye height, look rotation, and the current recoil offsets. It never
//! writes back into the simulation.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::player::{LookAngles, Player, PlayerInput};
use crate::plugins::weapons::Recoil;

#[derive(Component)]
struct FpsCamera;

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("FpsCamera"),
        FpsCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.6, 0.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn sync_camera(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    look: Res<LookAngles>,
    recoil: Res<Recoil>,
    q_player: Query<&Transform, (With<Player>, Without<FpsCamera>)>,
    mut q_camera: Query<&mut Transform, With<FpsCamera>>,
) {
    let Ok(player_tf) = q_player.single() else {
        return;
    };
    let Ok(mut cam_tf) = q_camera.single_mut() else {
        return;
    };

    let eye = if input.crouch {
        tunables.crouch_eye_height
    } else {
        tunables.eye_height
    };

    let base = look.rotation();
    let kick = Quat::from_euler(EulerRot::YXZ, recoil.rot.y, recoil.rot.x, 0.0);
    cam_tf.rotation = base * kick;
    cam_tf.translation = player_tf.translation + Vec3::Y * eye + base * recoil.offset;
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera);
    app.add_systems(PostUpdate, sync_camera.run_if(in_state(GameState::InGame)));
}
