//! Movement компоненты: команды перемещения, path-follower boundary, скорости

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Профиль скорости (walk/run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum Pace {
    Walk,
    Run,
}

/// Команда движения для агента (intent, выполняется path-follower'ом)
///
/// Архитектура:
/// - AI/collector системы пишут MovementCommand (high-level intent)
/// - navigation слой читает и конвертирует в NavAgent target + speed
/// - в движковой сборке ту же команду читает NavigationAgent
#[derive(Component, Debug, Clone, PartialEq)]
pub enum MovementCommand {
    /// Ничего не менять (не трогать текущий target)
    Idle,
    /// Двигаться к позиции с заданным профилем скорости
    MoveTo { target: Vec3, pace: Pace },
    /// Остановиться немедленно (speed = 0, target сохраняется)
    Stop,
}

impl Default for MovementCommand {
    fn default() -> Self {
        Self::Idle
    }
}

/// Скорости агента по профилям (метры/сек)
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct SpeedProfile {
    pub walk: f32,
    pub run: f32,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self { walk: 6.0, run: 9.0 }
    }
}

impl SpeedProfile {
    /// Валидирующий конструктор (скорости строго положительные)
    pub fn new(walk: f32, run: f32) -> Result<Self, ConfigError> {
        if walk <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(walk));
        }
        if run <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(run));
        }
        Ok(Self { walk, run })
    }

    pub fn speed(&self, pace: Pace) -> f32 {
        match pace {
            Pace::Walk => self.walk,
            Pace::Run => self.run,
        }
    }
}

/// Граница path-follower'а (контракт внешнего NavigationAgent)
///
/// Симуляция пишет destination/speed/is_stopped, headless интегратор двигает
/// Transform по прямой. В движковой сборке эти же поля транслируются в
/// настоящий navmesh-агент, который и решает путь.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub speed: f32,
    /// Дистанция, с которой цель считается достигнутой
    pub stopping_distance: f32,
    pub is_stopped: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 0.0,
            stopping_distance: 0.2,
            is_stopped: false,
        }
    }
}

impl NavAgent {
    /// Остаток пути до текущей цели (INFINITY если цели нет)
    pub fn remaining_distance(&self, position: Vec3) -> f32 {
        self.destination
            .map_or(f32::INFINITY, |destination| position.distance(destination))
    }

    /// Агент дошёл до цели (в пределах stopping_distance)
    pub fn arrived(&self, position: Vec3) -> bool {
        self.remaining_distance(position) <= self.stopping_distance
    }
}

/// Скорость тела (для kinematic персонажа, интегрируется в Transform)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_agent_no_destination_never_arrives() {
        let agent = NavAgent::default();
        assert_eq!(agent.remaining_distance(Vec3::ZERO), f32::INFINITY);
        assert!(!agent.arrived(Vec3::ZERO));
    }

    #[test]
    fn test_nav_agent_arrival_tolerance() {
        let agent = NavAgent {
            destination: Some(Vec3::new(1.0, 0.0, 0.0)),
            ..default()
        };
        assert!(agent.arrived(Vec3::new(0.9, 0.0, 0.0)));
        assert!(!agent.arrived(Vec3::ZERO));
    }

    #[test]
    fn test_speed_profile_validation() {
        assert!(SpeedProfile::new(6.0, 9.0).is_ok());
        assert_eq!(
            SpeedProfile::new(0.0, 9.0).unwrap_err(),
            ConfigError::NonPositiveSpeed(0.0)
        );
        assert_eq!(
            SpeedProfile::new(6.0, -1.0).unwrap_err(),
            ConfigError::NonPositiveSpeed(-1.0)
        );
    }

    #[test]
    fn test_speed_profile_lookup() {
        let profile = SpeedProfile::default();
        assert_eq!(profile.speed(Pace::Walk), 6.0);
        assert_eq!(profile.speed(Pace::Run), 9.0);
    }
}
