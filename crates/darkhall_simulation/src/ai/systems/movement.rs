//! AI movement systems.

use bevy::prelude::*;

use crate::ai::systems::fsm::chase_wait_zone;
use crate::ai::{AiConfig, AiState, TargetMemory};
use crate::components::{ChaseTarget, MovementCommand, NavAgent, Pace, PatrolRoute};

/// Система: AI movement intent from state
///
/// Конвертирует AiState → MovementCommand для path-follower'а.
/// Патруль и осмотр ходят шагом, преследование — бегом, ожидание — Stop.
pub fn ai_movement_from_state(
    mut agents: Query<(
        &Transform,
        &AiState,
        &TargetMemory,
        &PatrolRoute,
        &NavAgent,
        &AiConfig,
        &mut MovementCommand,
    )>,
    targets: Query<&Transform, With<ChaseTarget>>,
) {
    for (transform, state, memory, route, nav, config, mut command) in agents.iter_mut() {
        let position = transform.translation;

        let next = match state {
            AiState::Patrolling { rotate_timer, .. } => {
                if let Some(last_seen) = memory.last_known_position {
                    let investigating_done =
                        position.distance(last_seen) <= config.investigate_tolerance;
                    if *rotate_timer > 0.0 || investigating_done {
                        // оглядываемся или ждём на точке осмотра
                        MovementCommand::Stop
                    } else {
                        MovementCommand::MoveTo { target: last_seen, pace: Pace::Walk }
                    }
                } else {
                    let waypoint = route.current_waypoint();
                    if nav.destination == Some(waypoint) && nav.arrived(position) {
                        // ждём на waypoint
                        MovementCommand::Stop
                    } else {
                        MovementCommand::MoveTo { target: waypoint, pace: Pace::Walk }
                    }
                }
            }

            AiState::Chasing { captured, .. } => {
                if *captured {
                    // цель поймана: замираем, новых destination не запрашиваем
                    MovementCommand::Stop
                } else if chase_wait_zone(position, nav, memory, &targets, config) {
                    MovementCommand::Stop
                } else if let Some(chase_point) = memory.last_known_position {
                    // пока цель видна chase_point обновляется каждый тик,
                    // после потери контакта остаётся последняя позиция
                    MovementCommand::MoveTo { target: chase_point, pace: Pace::Run }
                } else {
                    MovementCommand::Idle
                }
            }
        };

        // guard от спама Changed<MovementCommand>
        if *command != next {
            *command = next;
        }
    }
}
