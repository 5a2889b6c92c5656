//! FSM патрульного AI: переходы Patrolling ↔ Chasing.
//!
//! Порядок внутри тика: sense_targets уже отработал, память о цели свежая.
//! Движение агент не трогает — intent выдаёт ai_movement_from_state.

use bevy::prelude::*;

use crate::ai::{AiConfig, AiState, DisturbanceHeard, TargetCaptured, TargetMemory};
use crate::components::{ChaseTarget, NavAgent, PatrolRoute};

/// Система: применение внешних capture событий
///
/// Контактный триггер движка сообщает что агент дотянулся до цели.
/// Флаг замораживает преследование: таймеры и destination больше не трогаются.
pub fn handle_capture_events(
    mut events: EventReader<TargetCaptured>,
    mut agents: Query<&mut AiState>,
) {
    for event in events.read() {
        let Ok(mut state) = agents.get_mut(event.agent) else {
            continue;
        };
        match *state {
            AiState::Chasing { wait_timer, captured: false } => {
                *state = AiState::Chasing { wait_timer, captured: true };
                crate::log(&format!("AI: {:?} captured its target, freezing", event.agent));
            }
            AiState::Chasing { .. } => {}
            AiState::Patrolling { .. } => {
                crate::log_warning(&format!(
                    "AI: capture event for {:?} ignored (not chasing)",
                    event.agent
                ));
            }
        }
    }
}

/// Система: реакция на шум
///
/// Патрулирующие агенты в радиусе запоминают источник как точку осмотра:
/// сначала пауза "оглядеться" (rotate_timer), потом поход к точке.
/// Преследователи не отвлекаются.
pub fn ai_react_to_disturbance(
    mut events: EventReader<DisturbanceHeard>,
    mut agents: Query<(Entity, &Transform, &mut AiState, &mut TargetMemory, &AiConfig)>,
) {
    for event in events.read() {
        for (entity, transform, mut state, mut memory, config) in agents.iter_mut() {
            if !state.is_patrolling() {
                continue;
            }
            let distance = transform.translation.distance(event.position);
            if distance > event.radius {
                continue;
            }
            memory.last_known_position = Some(event.position);
            *state = AiState::Patrolling {
                wait_timer: config.wait_time,
                rotate_timer: config.rotate_time,
            };
            crate::log(&format!(
                "🔊 {:?} heard a disturbance at {:?} ({:.1}m away)",
                entity, event.position, distance
            ));
        }
    }
}

/// Система: AI FSM transitions
///
/// Переходы:
/// - Patrolling → Chasing: цель видна (sensing этого тика)
/// - Chasing → Patrolling: дошли, переждали, цель не поймана и дальше
///   lost_threshold
/// Остальное — self-loops с тиканьем таймеров (ожидание на waypoint,
/// осмотр последней известной позиции, пережидание рядом с целью).
pub fn ai_fsm_transitions(
    mut agents: Query<(
        Entity,
        &Transform,
        &mut AiState,
        &mut TargetMemory,
        &mut PatrolRoute,
        &NavAgent,
        &AiConfig,
    )>,
    targets: Query<&Transform, With<ChaseTarget>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, mut state, mut memory, mut route, nav, config) in agents.iter_mut() {
        let position = transform.translation;

        let next = match state.as_ref() {
            AiState::Patrolling { wait_timer, rotate_timer } => {
                if memory.in_sight {
                    crate::log(&format!("⚔️ {:?} Patrolling → Chasing", entity));
                    AiState::Chasing {
                        wait_timer: config.wait_time,
                        captured: false,
                    }
                } else if let Some(last_seen) = memory.last_known_position {
                    // осмотр последней известной позиции (или источника шума)
                    if *rotate_timer > 0.0 {
                        // сначала оглядываемся на месте
                        AiState::Patrolling {
                            wait_timer: *wait_timer,
                            rotate_timer: (*rotate_timer - delta).max(0.0),
                        }
                    } else if position.distance(last_seen) <= config.investigate_tolerance {
                        if *wait_timer <= 0.0 {
                            // никого не нашли — возвращаемся на маршрут
                            memory.clear();
                            crate::log(&format!(
                                "🚶 {:?} investigation over, back to route",
                                entity
                            ));
                            AiState::Patrolling {
                                wait_timer: config.wait_time,
                                rotate_timer: config.rotate_time,
                            }
                        } else {
                            AiState::Patrolling {
                                wait_timer: (*wait_timer - delta).max(0.0),
                                rotate_timer: 0.0,
                            }
                        }
                    } else {
                        // идём к точке осмотра (intent выдаст movement система)
                        continue;
                    }
                } else {
                    let waypoint = route.current_waypoint();
                    let at_waypoint = nav.destination == Some(waypoint) && nav.arrived(position);
                    if at_waypoint {
                        if *wait_timer <= 0.0 {
                            route.advance();
                            crate::log(&format!(
                                "AI: {:?} waypoint reached, next = {}",
                                entity,
                                route.current_index()
                            ));
                            AiState::Patrolling {
                                wait_timer: config.wait_time,
                                rotate_timer: *rotate_timer,
                            }
                        } else {
                            AiState::Patrolling {
                                wait_timer: (*wait_timer - delta).max(0.0),
                                rotate_timer: *rotate_timer,
                            }
                        }
                    } else {
                        // в пути к waypoint, состояние не меняется
                        continue;
                    }
                }
            }

            AiState::Chasing { wait_timer, captured } => {
                if *captured {
                    // замороженное под-состояние: никаких таймерных переходов
                    continue;
                }

                if chase_wait_zone(position, nav, &memory, &targets, config) {
                    let target_distance = live_target_distance(position, &memory, &targets);
                    // исчезнувшая цель тоже считается потерянной
                    let target_lost =
                        target_distance.map_or(true, |distance| distance >= config.lost_threshold);
                    if *wait_timer <= 0.0 && target_lost {
                        memory.clear();
                        crate::log(&format!("AI: {:?} Chasing → Patrolling (target lost)", entity));
                        AiState::Patrolling {
                            wait_timer: config.wait_time,
                            rotate_timer: config.rotate_time,
                        }
                    } else {
                        AiState::Chasing {
                            wait_timer: (*wait_timer - delta).max(0.0),
                            captured: false,
                        }
                    }
                } else {
                    // бежим к цели
                    continue;
                }
            }
        };

        *state = next;
    }
}

/// Helper: дистанция до живой цели (None если entity исчезла или не было цели)
pub(crate) fn live_target_distance(
    position: Vec3,
    memory: &TargetMemory,
    targets: &Query<&Transform, With<ChaseTarget>>,
) -> Option<f32> {
    let target = memory.target?;
    let transform = targets.get(target).ok()?;
    Some(position.distance(transform.translation))
}

/// Helper: преследователь стоит и пережидает
///
/// true когда агент дошёл до точки назначения либо цель ближе close_threshold
/// (вплотную к цели новые destination не запрашиваются).
pub(crate) fn chase_wait_zone(
    position: Vec3,
    nav: &NavAgent,
    memory: &TargetMemory,
    targets: &Query<&Transform, With<ChaseTarget>>,
    config: &AiConfig,
) -> bool {
    if nav.arrived(position) {
        return true;
    }
    let distance = live_target_distance(position, memory, targets)
        .or_else(|| memory.last_known_position.map(|p| position.distance(p)));
    distance.map_or(false, |d| d < config.close_threshold)
}
