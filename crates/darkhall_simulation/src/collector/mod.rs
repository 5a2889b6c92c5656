//! Collector NPC — блуждание по миру и сбор предметов.
//!
//! Поведение:
//! - Roam: периодический repath к случайной точке в roam_radius
//! - скан ближайшего предмета (Collectible) в scan_radius, с шансом
//!   chance_to_chase переключение на ToItem
//! - ToItem: подход к предмету, в pickup_range бросок chance_to_pick_up;
//!   подобрали или нет — цель сбрасывается и NPC снова блуждает
//!
//! Все броски — из DeterministicRng (воспроизводимость прогонов).

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::components::{MovementCommand, NavAgent, Pace};
use crate::{DeterministicRng, SimulationSet};

/// Маркер собираемого предмета
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Collectible;

/// Состояние collector NPC
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum CollectorState {
    /// Блуждание по случайным точкам
    Roam {
        /// Время до следующего repath
        repath_timer: f32,
    },
    /// Подход к выбранному предмету
    ToItem {
        target: Entity,
        repath_timer: f32,
    },
}

impl Default for CollectorState {
    fn default() -> Self {
        Self::Roam { repath_timer: 0.0 }
    }
}

/// Параметры collector NPC
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct CollectorConfig {
    /// Радиус блуждания (метры)
    pub roam_radius: f32,
    /// Интервал между repath (секунды)
    pub repath_interval: f32,
    /// Радиус поиска предметов (метры)
    pub scan_radius: f32,
    /// Дистанция подбора (метры)
    pub pickup_range: f32,
    /// Шанс погнаться за предметом (за тик скана)
    pub chance_to_chase: f32,
    /// Шанс подобрать предмет у цели
    pub chance_to_pick_up: f32,
    /// Радиус прибытия к roam точке
    pub arrive_tolerance: f32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            roam_radius: 10.0,
            repath_interval: 0.5,
            scan_radius: 12.0,
            pickup_range: 1.5,
            chance_to_chase: 0.6,
            chance_to_pick_up: 0.7,
            arrive_tolerance: 0.3,
        }
    }
}

/// Система: поведение collector NPC
pub fn collector_behavior(
    mut commands: Commands,
    mut collectors: Query<(
        Entity,
        &Transform,
        &NavAgent,
        &CollectorConfig,
        &mut CollectorState,
        &mut MovementCommand,
    )>,
    items: Query<(Entity, &Transform), With<Collectible>>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, nav, config, mut state, mut command) in collectors.iter_mut() {
        let position = transform.translation;

        let next = match state.as_ref() {
            CollectorState::Roam { repath_timer } => {
                let mut timer = (*repath_timer - delta).max(0.0);

                // периодический repath к случайной точке
                let path_finished = nav.destination.is_none()
                    || nav.remaining_distance(position) < config.arrive_tolerance;
                if timer <= 0.0 && path_finished {
                    let roam_target = random_roam_point(position, config.roam_radius, &mut rng.rng);
                    *command = MovementCommand::MoveTo { target: roam_target, pace: Pace::Walk };
                    timer = config.repath_interval;
                }

                // ищем ближайший предмет и иногда решаем за ним сходить
                let nearest = nearest_collectible(
                    position,
                    config.scan_radius,
                    items.iter().map(|(item, t)| (item, t.translation)),
                );
                match nearest {
                    Some((item, item_position)) if rng.rng.gen::<f32>() < config.chance_to_chase => {
                        *command = MovementCommand::MoveTo { target: item_position, pace: Pace::Walk };
                        CollectorState::ToItem { target: item, repath_timer: config.repath_interval }
                    }
                    _ => CollectorState::Roam { repath_timer: timer },
                }
            }

            CollectorState::ToItem { target, repath_timer } => match items.get(*target) {
                // предмет исчез — возвращаемся к блужданию
                Err(_) => CollectorState::Roam { repath_timer: 0.0 },
                Ok((_, item_transform)) => {
                    let item_position = item_transform.translation;

                    // периодически обновляем путь (предмет могли подвинуть)
                    let mut timer = (*repath_timer - delta).max(0.0);
                    if timer <= 0.0 {
                        *command =
                            MovementCommand::MoveTo { target: item_position, pace: Pace::Walk };
                        timer = config.repath_interval;
                    }

                    if position.distance(item_position) <= config.pickup_range {
                        if rng.rng.gen::<f32>() < config.chance_to_pick_up {
                            commands.entity(*target).despawn();
                            crate::log(&format!("Collector {:?} picked up {:?}", entity, target));
                        }
                        // подобрали или нет — цель сбрасывается
                        CollectorState::Roam { repath_timer: 0.0 }
                    } else {
                        CollectorState::ToItem { target: *target, repath_timer: timer }
                    }
                }
            },
        };

        if *state != next {
            *state = next;
        }
    }
}

/// Helper: случайная точка блуждания вокруг origin
fn random_roam_point(origin: Vec3, radius: f32, rng: &mut ChaCha8Rng) -> Vec3 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let distance = rng.gen::<f32>() * radius;
    origin + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Helper: ближайший предмет в радиусе
fn nearest_collectible(
    position: Vec3,
    radius: f32,
    items: impl Iterator<Item = (Entity, Vec3)>,
) -> Option<(Entity, Vec3)> {
    let mut best: Option<(Entity, Vec3, f32)> = None;
    for (item, item_position) in items {
        let distance = position.distance(item_position);
        if distance > radius {
            continue;
        }
        if best.map_or(true, |(_, _, best_distance)| distance < best_distance) {
            best = Some((item, item_position, distance));
        }
    }
    best.map(|(item, item_position, _)| (item, item_position))
}

/// Collector Plugin
pub struct CollectorPlugin;

impl Plugin for CollectorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, collector_behavior.in_set(SimulationSet::Think));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_roam_point_within_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let origin = Vec3::new(3.0, 0.0, -2.0);
        for _ in 0..100 {
            let point = random_roam_point(origin, 10.0, &mut rng);
            assert!(origin.distance(point) <= 10.0 + 1e-4);
            assert_eq!(point.y, origin.y);
        }
    }

    #[test]
    fn test_nearest_collectible_picks_closest_in_radius() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let c = Entity::from_raw(3);
        let items = vec![
            (a, Vec3::new(5.0, 0.0, 0.0)),
            (b, Vec3::new(2.0, 0.0, 0.0)),
            (c, Vec3::new(30.0, 0.0, 0.0)), // вне радиуса
        ];

        let nearest = nearest_collectible(Vec3::ZERO, 12.0, items.into_iter());
        assert_eq!(nearest.map(|(item, _)| item), Some(b));
    }

    #[test]
    fn test_nearest_collectible_empty() {
        assert!(nearest_collectible(Vec3::ZERO, 12.0, std::iter::empty()).is_none());
    }
}
