//! DARKHALL Simulation Core
//!
//! ECS-симуляция stealth-демо на Bevy 0.16 (strategic layer).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (AI решения, таймеры, intents)
//! - движок = tactical layer (navmesh, физика, рендер, анимация)
//!
//! Граница проходит по типам: MovementCommand/NavAgent/AnimatorParams наружу,
//! RayHitReport/TargetCaptured/DisturbanceHeard внутрь, SightProbe/GroundProbe
//! как инжектированные запросы.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod collector;
pub mod components;
pub mod door;
pub mod error;
pub mod interaction;
pub mod logger;
pub mod navigation;
pub mod player;
pub mod sensors;

// Re-export базовых типов для удобства
pub use ai::{
    spawn_patrol_agent, AiConfig, AiPlugin, AiState, DisturbanceHeard, PerceptionEvent,
    TargetCaptured, TargetMemory, VisionConfig,
};
pub use animation::AnimationPlugin;
pub use collector::{Collectible, CollectorConfig, CollectorPlugin, CollectorState};
pub use components::*;
pub use door::{Door, DoorConfig, DoorPlugin, DoorToggled};
pub use error::ConfigError;
pub use interaction::{
    InteractPressed, Interactable, InteractionPlugin, Interactor, RayHitReport,
};
pub use navigation::NavigationPlugin;
pub use player::{
    spawn_player_character, JumpState, PlayerController, PlayerInput, PlayerPlugin,
};
pub use sensors::{
    AlwaysClear, FlatFloor, FnSightProbe, GroundProbe, GroundProbeHandle, SightProbe,
    SightProbeHandle,
};

// Re-export logger функций (crate::log как короткий путь)
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};

/// Фазы одного тика симуляции (FixedUpdate)
///
/// Sense → Think → Act → Animate: sensing всегда раньше FSM переходов,
/// intents применяются после решений, анимация читает итоговое движение.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Sense,
    Think,
    Act,
    Animate,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Sense,
                    SimulationSet::Think,
                    SimulationSet::Act,
                    SimulationSet::Animate,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((
                AiPlugin,
                NavigationPlugin,
                PlayerPlugin,
                CollectorPlugin,
                InteractionPlugin,
                DoorPlugin,
                AnimationPlugin,
            ));

        // Ресурсы по умолчанию — не перетираем инжектированные движком/тестом
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
        if !app.world().contains_resource::<SightProbeHandle>() {
            app.insert_resource(SightProbeHandle(Box::new(AlwaysClear)));
        }
        if !app.world().contains_resource::<GroundProbeHandle>() {
            app.insert_resource(GroundProbeHandle(Box::new(FlatFloor { height: 0.0 })));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Собирает компоненты в детерминированный байтовый формат (сортировка по
/// Entity ID, сериализация через Debug).
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
