//! Navigation boundary — применение команд движения и headless path-follower.
//!
//! Архитектура:
//! - AI/collector системы пишут MovementCommand (intent)
//! - apply_movement_commands транслирует intent в NavAgent поля — ровно так же
//!   движковый слой кормил бы свой NavigationAgent
//! - advance_nav_agents — headless заглушка решателя пути: прямолинейное
//!   движение к destination. В движковой сборке система выключена, Transform
//!   двигает navmesh-агент.

use bevy::prelude::*;

use crate::components::{MovementCommand, NavAgent, SpeedProfile};
use crate::SimulationSet;

/// Система: MovementCommand → NavAgent
pub fn apply_movement_commands(
    mut agents: Query<(&MovementCommand, &SpeedProfile, &mut NavAgent), Changed<MovementCommand>>,
) {
    for (command, profile, mut agent) in agents.iter_mut() {
        match command {
            MovementCommand::Idle => {}
            MovementCommand::MoveTo { target, pace } => {
                agent.destination = Some(*target);
                agent.speed = profile.speed(*pace);
                agent.is_stopped = false;
            }
            MovementCommand::Stop => {
                // destination сохраняется: ожидание идёт "на точке"
                agent.speed = 0.0;
                agent.is_stopped = true;
            }
        }
    }
}

/// Система: headless интеграция движения
///
/// Двигает Transform по прямой к destination, останавливаясь внутри
/// stopping_distance, и разворачивает агента по ходу движения.
pub fn advance_nav_agents(
    mut agents: Query<(&mut Transform, &NavAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, agent) in agents.iter_mut() {
        if agent.is_stopped || agent.speed <= 0.0 {
            continue;
        }
        let Some(destination) = agent.destination else {
            continue;
        };

        let to_target = destination - transform.translation;
        let distance = to_target.length();
        if distance <= agent.stopping_distance {
            continue;
        }
        let Some(direction) = to_target.try_normalize() else {
            continue;
        };

        let step = (agent.speed * delta).min(distance);
        transform.translation += direction * step;

        // поворот по ходу движения (только горизонтальная составляющая)
        let planar = Vec3::new(direction.x, 0.0, direction.z);
        if planar.length_squared() > 1e-6 {
            transform.look_to(planar.normalize(), Vec3::Y);
        }
    }
}

/// Navigation Plugin (порядок: применить команды, потом шаг интеграции)
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (apply_movement_commands, advance_nav_agents)
                .chain()
                .in_set(SimulationSet::Act),
        );
    }
}
