//! AI Events — входящие стимулы и уведомления о восприятии
//!
//! Симуляция сама считает видимость (sensing каждый тик), события нужны
//! движковому слою и тестам: входящие стимулы (захват, шум) и уведомления
//! о смене контакта.

use bevy::prelude::*;

/// Уведомление о смене сенсорного контакта (edge-triggered)
#[derive(Event, Debug, Clone)]
pub enum PerceptionEvent {
    /// Цель появилась в поле зрения
    TargetSpotted { observer: Entity, target: Entity },
    /// Цель пропала из поля зрения (позиция остаётся в TargetMemory)
    TargetLost { observer: Entity, target: Entity },
}

/// Внешнее событие: агент дотянулся до цели (контактный триггер движка)
///
/// FSM его не выводит сам — только применяет: преследование замирает.
#[derive(Event, Debug, Clone)]
pub struct TargetCaptured {
    pub agent: Entity,
}

/// Внешнее событие: шум в мире (хлопнула дверь, упал предмет)
///
/// Патрулирующие агенты в радиусе идут осматривать источник.
#[derive(Event, Debug, Clone)]
pub struct DisturbanceHeard {
    pub position: Vec3,
    /// Радиус слышимости
    pub radius: f32,
}
