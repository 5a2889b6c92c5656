//! Внешние физические запросы — trait-object ресурсы.
//!
//! Симуляция не делает raycast/overlap сама: line-of-sight и ground check —
//! движковые запросы. Движковый слой инжектит свои реализации при старте,
//! headless режим работает на заглушках.

use bevy::prelude::*;

/// Запрос прямой видимости (движковый raycast по маске препятствий)
pub trait SightProbe: Send + Sync {
    /// true если между точками нет препятствий
    fn line_clear(&self, from: Vec3, to: Vec3) -> bool;
}

/// Обёртка для замыканий: FnSightProbe(|from, to| ...) — удобно в тестах
pub struct FnSightProbe<F>(pub F);

impl<F> SightProbe for FnSightProbe<F>
where
    F: Fn(Vec3, Vec3) -> bool + Send + Sync,
{
    fn line_clear(&self, from: Vec3, to: Vec3) -> bool {
        (self.0)(from, to)
    }
}

#[derive(Resource)]
pub struct SightProbeHandle(pub Box<dyn SightProbe>);

/// Headless-заглушка: препятствий нет, видимость всегда чистая
pub struct AlwaysClear;

impl SightProbe for AlwaysClear {
    fn line_clear(&self, _from: Vec3, _to: Vec3) -> bool {
        true
    }
}

/// Проверка опоры под ногами (движковый sphere check у стоп персонажа)
pub trait GroundProbe: Send + Sync {
    fn grounded(&self, point: Vec3, radius: f32) -> bool;
}

#[derive(Resource)]
pub struct GroundProbeHandle(pub Box<dyn GroundProbe>);

/// Headless-заглушка: плоский пол на фиксированной высоте
pub struct FlatFloor {
    pub height: f32,
}

impl GroundProbe for FlatFloor {
    fn grounded(&self, point: Vec3, radius: f32) -> bool {
        point.y - radius <= self.height + 1e-3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_floor_grounded() {
        let floor = FlatFloor { height: 0.0 };
        assert!(floor.grounded(Vec3::new(0.0, 0.1, 0.0), 0.2));
        assert!(!floor.grounded(Vec3::new(0.0, 1.0, 0.0), 0.2));
    }

    #[test]
    fn test_closure_probe() {
        let wall_at_x5 = FnSightProbe(|from: Vec3, to: Vec3| !(from.x < 5.0 && to.x > 5.0));
        assert!(wall_at_x5.line_clear(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)));
        assert!(!wall_at_x5.line_clear(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0)));
    }
}
