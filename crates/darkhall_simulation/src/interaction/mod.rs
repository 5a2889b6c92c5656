//! Raycast interaction — фокус и диспетчеризация нажатий.
//!
//! Сам raycast — движковый: камера-слой каждый кадр кастует луч вперёд и
//! присылает RayHitReport. Здесь только фильтр по маркеру Interactable,
//! трекинг текущего фокуса и раздача InteractPressed дверям.

use bevy::prelude::*;

use crate::door::{Door, DoorToggled};
use crate::SimulationSet;

/// Маркер интерактивного объекта
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Interactable;

/// Сторона, которая интерактирует (игрок)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Interactor {
    /// Максимальная дистанция луча (читается движковым raycast слоем)
    pub range: f32,
    /// Объект под прицелом (UI слой показывает иконку руки по этому полю)
    pub focused: Option<Entity>,
}

impl Default for Interactor {
    fn default() -> Self {
        Self { range: 3.5, focused: None }
    }
}

/// Отчёт движкового raycast: что под прицелом в этом кадре
#[derive(Event, Debug, Clone)]
pub struct RayHitReport {
    pub interactor: Entity,
    /// Попадание луча (None — луч ушёл в пустоту)
    pub hit: Option<Entity>,
}

/// Нажатие клавиши взаимодействия
#[derive(Event, Debug, Clone)]
pub struct InteractPressed {
    pub interactor: Entity,
}

/// Система: обновление фокуса по отчётам raycast
///
/// Фокусом становится только entity с маркером Interactable.
pub fn update_interaction_focus(
    mut reports: EventReader<RayHitReport>,
    mut interactors: Query<&mut Interactor>,
    interactables: Query<(), With<Interactable>>,
) {
    for report in reports.read() {
        let Ok(mut interactor) = interactors.get_mut(report.interactor) else {
            continue;
        };
        let focused = report.hit.filter(|&hit| interactables.get(hit).is_ok());
        if interactor.focused != focused {
            interactor.focused = focused;
        }
    }
}

/// Система: раздача нажатий сфокусированным объектам
pub fn dispatch_interactions(
    mut presses: EventReader<InteractPressed>,
    interactors: Query<&Interactor>,
    doors: Query<(), With<Door>>,
    mut toggles: EventWriter<DoorToggled>,
) {
    for press in presses.read() {
        let Ok(interactor) = interactors.get(press.interactor) else {
            continue;
        };
        let Some(focused) = interactor.focused else {
            continue;
        };
        if doors.get(focused).is_ok() {
            toggles.write(DoorToggled { door: focused });
        }
    }
}

/// Interaction Plugin
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RayHitReport>()
            .add_event::<InteractPressed>()
            .add_systems(
                FixedUpdate,
                update_interaction_focus.in_set(SimulationSet::Sense),
            )
            .add_systems(FixedUpdate, dispatch_interactions.in_set(SimulationSet::Think));
    }
}
