//! Perception components: зрение и память о цели.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Параметры зрения агента
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct VisionConfig {
    /// Радиус обзора (метры)
    pub view_radius: f32,
    /// Полный угол конуса обзора (градусы); в проверке используется половина
    pub view_angle: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            view_radius: 360.0,
            view_angle: 180.0,
        }
    }
}

impl VisionConfig {
    /// Валидирующий конструктор
    pub fn new(view_radius: f32, view_angle: f32) -> Result<Self, ConfigError> {
        if view_radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(view_radius));
        }
        if view_angle <= 0.0 || view_angle > 360.0 {
            return Err(ConfigError::InvalidViewAngle(view_angle));
        }
        Ok(Self { view_radius, view_angle })
    }

    pub fn half_angle_rad(&self) -> f32 {
        (self.view_angle * 0.5).to_radians()
    }
}

/// Память агента о цели
///
/// in_sight и target обновляются каждый тик sensing системой.
/// last_known_position переживает потерю контакта и сбрасывается только когда
/// агент прекращает преследование/осмотр.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct TargetMemory {
    /// Цель видна в этом тике
    pub in_sight: bool,
    /// Последняя увиденная цель
    pub target: Option<Entity>,
    /// Последняя известная позиция цели (или источник шума)
    pub last_known_position: Option<Vec3>,
}

impl TargetMemory {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
