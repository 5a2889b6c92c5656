//! Kinematic first-person контроллер
//!
//! Архитектура:
//! - Rapier для коллизий (RigidBody::KinematicPositionBased)
//! - Custom velocity integration (не используем Rapier forces)
//! - Gravity + ground probe + планарное движение + прыжок с задержкой
//!
//! Ground check — внешний физический запрос (GroundProbe ресурс),
//! headless режим работает на FlatFloor заглушке.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{AnimatorParams, PhysicsBody};
use crate::sensors::GroundProbeHandle;
use crate::SimulationSet;

/// Параметры first-person контроллера
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct PlayerController {
    /// Скорость шага (m/s)
    pub walk_speed: f32,
    /// Скорость бега (m/s)
    pub run_speed: f32,
    /// Гравитация (m/s², отрицательная)
    pub gravity: f32,
    /// Высота прыжка (метры)
    pub jump_height: f32,
    /// Задержка между нажатием и отрывом (секунды)
    pub jump_delay: f32,
    /// Радиус сферы ground probe
    pub ground_probe_radius: f32,
    /// Смещение probe-точки вверх от стоп
    pub ground_probe_offset: f32,
    /// На земле ли персонаж (обновляется probe системой)
    pub grounded: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_speed: 9.0,
            gravity: -24.0,
            jump_height: 1.6,
            jump_delay: 1.0,
            ground_probe_radius: 0.2,
            ground_probe_offset: 0.05,
            grounded: false,
        }
    }
}

/// Входные данные игрока (заполняются движковым input слоем или тестом)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// Планарные оси: x = strafe, y = вперёд/назад
    pub axis: Vec2,
    /// Бег зажат
    pub run: bool,
    /// Прыжок нажат в этом тике (edge)
    pub jump_pressed: bool,
    /// Прыжок удерживается
    pub jump_held: bool,
}

/// Состояние очереди прыжка
///
/// Прыжок не применяется сразу: нажатие ставит его в очередь с таймером,
/// отрыв происходит по истечении задержки и только если персонаж всё ещё
/// на земле. Повторное взведение — после приземления с отпущенной клавишей.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct JumpState {
    pub queued: bool,
    pub timer: f32,
    pub armed: bool,
}

impl Default for JumpState {
    fn default() -> Self {
        Self { queued: false, timer: 0.0, armed: true }
    }
}

/// Система: ground probe (внешний sphere check у стоп)
pub fn probe_ground(
    mut players: Query<(&Transform, &mut PlayerController)>,
    probe: Res<GroundProbeHandle>,
) {
    for (transform, mut controller) in players.iter_mut() {
        let feet = transform.translation + Vec3::Y * controller.ground_probe_offset;
        let grounded = probe.0.grounded(feet, controller.ground_probe_radius);
        if controller.grounded != grounded {
            controller.grounded = grounded;
        }
    }
}

/// Система: планарное движение + гравитация + постановка прыжка в очередь
pub fn apply_player_input(
    mut players: Query<(
        &Transform,
        &PlayerInput,
        &PlayerController,
        &mut JumpState,
        &mut PhysicsBody,
    )>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (transform, input, controller, mut jump, mut body) in players.iter_mut() {
        // планарное движение вдоль forward/right тела
        let forward = *transform.forward();
        let right = *transform.right();
        let direction = (right * input.axis.x + forward * input.axis.y).normalize_or_zero();

        let moving = direction.length_squared() > 0.0;
        let running = moving && input.run;
        let speed = if running {
            controller.run_speed
        } else if moving {
            controller.walk_speed
        } else {
            0.0
        };

        body.velocity.x = direction.x * speed;
        body.velocity.z = direction.z * speed;

        // прижимаемся к полу пока стоим
        if controller.grounded && body.velocity.y < 0.0 {
            body.velocity.y = -4.0;
        }

        // постановка прыжка в очередь (отрыв позже, в handle_jump_delay)
        if controller.grounded && input.jump_pressed && !jump.queued && jump.armed {
            jump.queued = true;
            jump.timer = controller.jump_delay.max(0.0);
            jump.armed = false; // взведётся после приземления с отпущенной клавишей
        }

        // гравитация
        body.velocity.y += controller.gravity * delta;

        // повторное взведение: на земле и клавиша отпущена
        if controller.grounded && !input.jump_held {
            jump.armed = true;
        }
    }
}

/// Система: отложенный отрыв
pub fn handle_jump_delay(
    mut players: Query<(&PlayerController, &mut JumpState, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, mut jump, mut body) in players.iter_mut() {
        if !jump.queued {
            continue;
        }
        jump.timer -= delta;
        if jump.timer <= 0.0 {
            // отрыв только если всё ещё на земле (никаких прыжков в воздухе)
            if controller.grounded {
                body.velocity.y = (2.0 * controller.jump_height * -controller.gravity).sqrt();
            }
            jump.queued = false;
        }
    }
}

/// Система: синхронизация velocity в Rapier
pub fn sync_velocity_to_rapier(
    mut players: Query<(&PhysicsBody, &mut Velocity), With<PlayerController>>,
) {
    for (body, mut rapier_velocity) in players.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Система: интеграция velocity → Transform (headless режим)
pub fn integrate_player_velocity(
    mut players: Query<(&PlayerController, &PhysicsBody, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, body, mut transform) in players.iter_mut() {
        let mut velocity = body.velocity;
        // на земле вертикальное падение не интегрируем (прижимная скорость
        // нужна только настоящему CharacterController)
        if controller.grounded && velocity.y < 0.0 {
            velocity.y = 0.0;
        }
        transform.translation += velocity * delta;
    }
}

/// Система: параметры аниматора игрока (idle 0 / walk 0.5 / run 1.0)
pub fn sync_player_animation(
    mut players: Query<(&PlayerInput, &PlayerController, &mut AnimatorParams)>,
) {
    for (input, controller, mut params) in players.iter_mut() {
        let moving = input.axis.length_squared() > 0.0;
        let running = moving && input.run;
        let speed = if running {
            1.0
        } else if moving {
            0.5
        } else {
            0.0
        };

        if params.speed != speed {
            params.speed = speed;
        }
        if params.walking != moving {
            params.walking = moving;
        }
        if params.grounded != controller.grounded {
            params.grounded = controller.grounded;
        }
    }
}

/// Player Plugin
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, probe_ground.in_set(SimulationSet::Sense))
            .add_systems(
                FixedUpdate,
                (apply_player_input, handle_jump_delay)
                    .chain()
                    .in_set(SimulationSet::Think),
            )
            .add_systems(
                FixedUpdate,
                (sync_velocity_to_rapier, integrate_player_velocity)
                    .chain()
                    .in_set(SimulationSet::Act),
            )
            .add_systems(FixedUpdate, sync_player_animation.in_set(SimulationSet::Animate));
    }
}

/// Spawn helper: kinematic персонаж игрока
///
/// Создаёт entity с Transform, контроллером и Rapier телом (capsule).
pub fn spawn_player_character(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            PlayerController::default(),
            PlayerInput::default(),
            JumpState::default(),
            PhysicsBody::default(),
            AnimatorParams::default(),
            // Rapier physics
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.7, 0.3), // рост ~1.4m + полусферы, радиус 0.3m
            Velocity::default(),
            CollisionGroups::new(Group::GROUP_1, Group::ALL),
        ))
        .id()
}
