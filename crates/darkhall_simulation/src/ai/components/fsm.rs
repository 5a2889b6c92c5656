//! FSM AI components (state machine, config).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// AI FSM состояния патрульного агента
///
/// Ровно два режима. Таймеры живут внутри вариантов и сбрасываются на
/// конфигурационные значения при входе в состояние.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AiState {
    /// Patrolling — обход точек маршрута по кругу
    Patrolling {
        /// Ожидание на точке (waypoint или точка осмотра)
        wait_timer: f32,
        /// Пауза "оглядеться" перед походом к источнику шума
        rotate_timer: f32,
    },

    /// Chasing — преследование обнаруженной цели
    Chasing {
        /// Ожидание на последней известной позиции цели
        wait_timer: f32,
        /// Цель поймана (внешнее событие): агент замирает,
        /// таймерные переходы отключены
        captured: bool,
    },
}

impl Default for AiState {
    fn default() -> Self {
        let config = AiConfig::default();
        Self::Patrolling {
            wait_timer: config.wait_time,
            rotate_timer: config.rotate_time,
        }
    }
}

impl AiState {
    pub fn is_patrolling(&self) -> bool {
        matches!(self, Self::Patrolling { .. })
    }

    pub fn is_chasing(&self) -> bool {
        matches!(self, Self::Chasing { .. })
    }
}

/// Параметры патрульного AI
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct AiConfig {
    /// Ожидание на точке (секунды)
    pub wait_time: f32,
    /// Пауза перед осмотром источника шума (секунды)
    pub rotate_time: f32,
    /// Дистанция, за которой преследуемая цель считается потерянной (метры)
    pub lost_threshold: f32,
    /// Дистанция "цель рядом": преследователь замирает и пережидает (метры)
    pub close_threshold: f32,
    /// Радиус прибытия к точке осмотра (метры)
    pub investigate_tolerance: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            wait_time: 4.0,
            rotate_time: 2.0,
            lost_threshold: 6.0,
            close_threshold: 2.5,
            investigate_tolerance: 0.3,
        }
    }
}
