//! Animation sync — NavAgent → параметры аниматора.
//!
//! Симуляция выставляет walking/speed по фактическому состоянию движения,
//! движковый слой читает AnimatorParams и гоняет blend tree сам.

use bevy::prelude::*;

use crate::components::{AnimatorParams, NavAgent};
use crate::SimulationSet;

/// Система: параметры аниматора навигационных агентов
///
/// walking = агент реально движется (не Stop, есть цель дальше stopping
/// distance); speed — текущая скорость path-follower'а.
pub fn sync_nav_animation(
    mut agents: Query<(&Transform, &NavAgent, &mut AnimatorParams)>,
) {
    for (transform, nav, mut params) in agents.iter_mut() {
        let moving = !nav.is_stopped
            && nav.speed > 0.0
            && !nav.arrived(transform.translation)
            && nav.destination.is_some();

        if params.walking != moving {
            params.walking = moving;
        }
        let speed = if moving { nav.speed } else { 0.0 };
        if params.speed != speed {
            params.speed = speed;
        }
    }
}

/// Animation Plugin
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, sync_nav_animation.in_set(SimulationSet::Animate));
    }
}
