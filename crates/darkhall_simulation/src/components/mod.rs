//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - agent: патрульный агент, маршрут, маркер цели (Agent, PatrolRoute, ChaseTarget)
//! - movement: навигация и команды перемещения (MovementCommand, NavAgent, SpeedProfile)
//! - animation: параметры анимации для движкового слоя (AnimatorParams)

pub mod agent;
pub mod animation;
pub mod movement;

// Re-exports для удобного импорта
pub use agent::*;
pub use animation::*;
pub use movement::*;
