//! AI decision-making module
//!
//! Патрульный FSM: обход waypoint-маршрута, обнаружение цели (радиус + конус
//! обзора + line-of-sight), преследование с ожиданием на последней известной
//! позиции, осмотр источников шума.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{AiConfig, AiState, TargetMemory, VisionConfig};
pub use events::{DisturbanceHeard, PerceptionEvent, TargetCaptured};

use crate::components::{Agent, PatrolRoute};
use crate::SimulationSet;

/// AI Plugin
///
/// Порядок выполнения в FixedUpdate:
/// 1. sense_targets — обзор (Sense)
/// 2. handle_capture_events / ai_react_to_disturbance — внешние стимулы
/// 3. ai_fsm_transitions — обновление FSM state
/// 4. ai_movement_from_state — state → MovementCommand
pub struct AiPlugin;

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PerceptionEvent>()
            .add_event::<TargetCaptured>()
            .add_event::<DisturbanceHeard>()
            .add_systems(
                FixedUpdate,
                systems::sense_targets.in_set(SimulationSet::Sense),
            )
            .add_systems(
                FixedUpdate,
                (
                    systems::handle_capture_events,
                    systems::ai_react_to_disturbance,
                    systems::ai_fsm_transitions,
                    systems::ai_movement_from_state,
                )
                    .chain() // последовательное выполнение для детерминизма
                    .in_set(SimulationSet::Think),
            );
    }
}

/// Spawn helper: патрульный агент с маршрутом
///
/// Маршрут валидируется при создании (PatrolRoute::new), здесь уже не падает.
pub fn spawn_patrol_agent(commands: &mut Commands, position: Vec3, route: PatrolRoute) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Agent,
            route,
            AiState::default(),
            AiConfig::default(),
            VisionConfig::default(),
            TargetMemory::default(),
        ))
        .id()
}
