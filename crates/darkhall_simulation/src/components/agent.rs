//! Базовые компоненты агентов: Agent, PatrolRoute, ChaseTarget

use bevy::prelude::*;

use crate::error::ConfigError;

/// Патрулирующий агент (враг)
///
/// Автоматически добавляет NavAgent, MovementCommand, SpeedProfile и
/// AnimatorParams через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    crate::components::NavAgent,
    crate::components::MovementCommand,
    crate::components::SpeedProfile,
    crate::components::AnimatorParams
)]
pub struct Agent;

/// Маркер цели преследования (игрок)
///
/// Явная ссылка вместо глобального поиска по тегу: sensing система перебирает
/// entities с этим маркером.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ChaseTarget;

/// Циклический маршрут патруля
///
/// Инварианты:
/// - waypoints непустой (проверяется в конструкторе, fail fast)
/// - current всегда в [0; waypoints.len())
#[derive(Component, Debug, Clone)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    current: usize,
}

impl PatrolRoute {
    /// Создать маршрут. Пустой список точек — ошибка конфигурации.
    pub fn new(waypoints: Vec<Vec3>) -> Result<Self, ConfigError> {
        if waypoints.is_empty() {
            return Err(ConfigError::EmptyPatrolRoute);
        }
        Ok(Self { waypoints, current: 0 })
    }

    pub fn current_waypoint(&self) -> Vec3 {
        self.waypoints[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Следующая точка маршрута (с циклическим переходом)
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.waypoints.len();
    }
}
