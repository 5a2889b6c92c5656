//! Config-time ошибки.
//!
//! Все ошибки в симуляции — ошибки конфигурации при создании агентов.
//! Runtime системы — тотальные функции над валидным состоянием и не падают.

use thiserror::Error;

/// Ошибка конфигурации агента (fail fast при спавне, не в рантайме)
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Патрульный маршрут без точек — раньше это был unguarded runtime fault
    #[error("patrol route requires at least one waypoint")]
    EmptyPatrolRoute,

    /// Скорость должна быть положительной
    #[error("speed must be positive, got {0}")]
    NonPositiveSpeed(f32),

    /// Радиус обзора должен быть положительным
    #[error("view radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    /// Угол обзора задаётся в градусах, (0; 360]
    #[error("view angle must be in (0; 360] degrees, got {0}")]
    InvalidViewAngle(f32),
}
