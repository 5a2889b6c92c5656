//! Параметры анимации для движкового слоя
//!
//! Симуляция только выставляет флаги/значения, сама анимация живёт в движке.
//! Типизированная замена string-keyed animator параметрам.

use bevy::prelude::*;

/// Именованные параметры аниматора ("walking", "speed", "grounded")
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimatorParams {
    pub walking: bool,
    pub speed: f32,
    pub grounded: bool,
}
