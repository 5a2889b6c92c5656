//! Hinged door — открытие/закрытие поворотом вокруг петли.
//!
//! Toggle приходит событием (от interaction слоя), поворот анимируется в
//! FixedUpdate: yaw двигается к target_yaw по кратчайшей дуге с точным
//! защёлкиванием на цели.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::SimulationSet;

/// Параметры двери
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct DoorConfig {
    /// Угол открытия (радианы, по модулю)
    pub open_angle: f32,
    /// Угловая скорость поворота (радианы/сек)
    pub rotate_speed: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            open_angle: 90f32.to_radians(),
            rotate_speed: 180f32.to_radians(),
        }
    }
}

/// Состояние дверной петли
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Door {
    pub is_open: bool,
    /// Текущий угол петли (радианы)
    pub yaw: f32,
    pub closed_yaw: f32,
    pub open_yaw: f32,
    pub target_yaw: f32,
}

impl Default for Door {
    fn default() -> Self {
        Self::new(0.0, &DoorConfig::default())
    }
}

impl Door {
    /// Дверь в закрытом положении с петлёй на заданном yaw
    pub fn new(closed_yaw: f32, config: &DoorConfig) -> Self {
        let open_yaw = (closed_yaw + config.open_angle.abs()).rem_euclid(TAU);
        Self {
            is_open: false,
            yaw: closed_yaw,
            closed_yaw,
            open_yaw,
            target_yaw: closed_yaw,
        }
    }

    /// Переключить: открыть ↔ закрыть (работает и посреди поворота)
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
        self.target_yaw = if self.is_open { self.open_yaw } else { self.closed_yaw };
    }
}

/// Событие: дверь переключили
#[derive(Event, Debug, Clone)]
pub struct DoorToggled {
    pub door: Entity,
}

/// Система: применение toggle событий
pub fn handle_door_toggles(mut events: EventReader<DoorToggled>, mut doors: Query<&mut Door>) {
    for event in events.read() {
        if let Ok(mut door) = doors.get_mut(event.door) {
            door.toggle();
            crate::log(&format!(
                "Door {:?}: {} to {:.0}°",
                event.door,
                if door.is_open { "opening" } else { "closing" },
                door.target_yaw.to_degrees()
            ));
        }
    }
}

/// Система: поворот петли к target_yaw
pub fn animate_doors(
    mut doors: Query<(&mut Door, &DoorConfig, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut door, config, mut transform) in doors.iter_mut() {
        if door.yaw == door.target_yaw {
            continue;
        }
        door.yaw = move_towards_angle(door.yaw, door.target_yaw, config.rotate_speed * delta);
        transform.rotation = Quat::from_rotation_y(door.yaw);
    }
}

/// Кратчайший поворот от `from` к `to`, не дальше чем на `max_step`
///
/// На дистанции меньше шага защёлкивается ровно на `to`.
pub fn move_towards_angle(from: f32, to: f32, max_step: f32) -> f32 {
    let diff = normalize_angle(to - from);
    if diff.abs() <= max_step {
        to
    } else {
        from + max_step.copysign(diff)
    }
}

/// Приведение угла к (-PI; PI]
fn normalize_angle(mut angle: f32) -> f32 {
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Door Plugin
pub struct DoorPlugin;

impl Plugin for DoorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DoorToggled>().add_systems(
            FixedUpdate,
            (handle_door_toggles, animate_doors)
                .chain()
                .in_set(SimulationSet::Act),
        );
    }
}
