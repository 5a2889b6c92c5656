//! Sensing: радиус + конус обзора + line-of-sight.
//!
//! Выполняется каждый тик до FSM переходов, независимо от состояния агента.
//! Overlap-кандидаты — entities с маркером ChaseTarget; occlusion делегируется
//! инжектированному SightProbe (движковый raycast).

use bevy::prelude::*;

use crate::ai::{PerceptionEvent, TargetMemory, VisionConfig};
use crate::components::ChaseTarget;
use crate::sensors::{SightProbe, SightProbeHandle};

/// Система: обновление TargetMemory по результатам обзора
///
/// Из нескольких видимых кандидатов выигрывает ближайший (исходное поведение
/// "кто последним прошёл проверку" было случайным — фиксируем явный tie-break).
pub fn sense_targets(
    mut observers: Query<(Entity, &Transform, &VisionConfig, &mut TargetMemory)>,
    candidates: Query<(Entity, &Transform), With<ChaseTarget>>,
    sight: Res<SightProbeHandle>,
    mut events: EventWriter<PerceptionEvent>,
) {
    for (observer, transform, vision, mut memory) in observers.iter_mut() {
        let was_in_sight = memory.in_sight;

        let mut nearest: Option<(Entity, Vec3, f32)> = None;
        for (candidate, candidate_transform) in candidates.iter() {
            if candidate == observer {
                continue;
            }
            let position = candidate_transform.translation;
            let Some(distance) = candidate_visible(transform, vision, position, sight.0.as_ref())
            else {
                continue;
            };
            let closer = nearest.map_or(true, |(_, _, best)| distance < best);
            if closer {
                nearest = Some((candidate, position, distance));
            }
        }

        match nearest {
            Some((target, position, _)) => {
                memory.in_sight = true;
                memory.target = Some(target);
                memory.last_known_position = Some(position);
                if !was_in_sight {
                    events.write(PerceptionEvent::TargetSpotted { observer, target });
                    crate::log(&format!("👁️ {:?} spotted target {:?}", observer, target));
                }
            }
            None => {
                memory.in_sight = false;
                if was_in_sight {
                    if let Some(target) = memory.target {
                        events.write(PerceptionEvent::TargetLost { observer, target });
                        crate::log(&format!("👻 {:?} lost sight of {:?}", observer, target));
                    }
                }
                // last_known_position остаётся до сброса в FSM
            }
        }
    }
}

/// Helper: проходит ли кандидат все проверки видимости
///
/// Возвращает дистанцию до кандидата (для выбора ближайшего) или None.
pub(crate) fn candidate_visible(
    observer: &Transform,
    vision: &VisionConfig,
    target: Vec3,
    sight: &dyn SightProbe,
) -> Option<f32> {
    let origin = observer.translation;
    let to_target = target - origin;
    let distance = to_target.length();

    if distance > vision.view_radius {
        return None;
    }

    if let Some(direction) = to_target.try_normalize() {
        let forward = *observer.forward();
        if forward.angle_between(direction) > vision.half_angle_rad() {
            return None;
        }
        if !sight.line_clear(origin, target) {
            return None;
        }
    }
    // нулевая дистанция — кандидат вплотную, виден всегда

    Some(distance)
}
