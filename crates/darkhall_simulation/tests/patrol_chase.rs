//! Patrol/chase интеграционные тесты
//!
//! Прогоняют headless App с полным набором систем. Fixed schedule
//! прокручивается вручную (advance_by + run_schedule) — тик ровно 1/60 сек,
//! тайминги в тестах детерминированы.

use bevy::prelude::*;
use darkhall_simulation::*;

fn create_sim_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

fn tick(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(timestep);
    app.world_mut().run_schedule(FixedUpdate);
}

fn run_ticks(app: &mut App, count: usize) {
    for _ in 0..count {
        tick(app);
    }
}

fn spawn_patroller(app: &mut App, position: Vec3, waypoints: Vec<Vec3>) -> Entity {
    let route = PatrolRoute::new(waypoints).unwrap();
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            Agent,
            route,
            AiState::default(),
            AiConfig::default(),
            VisionConfig::default(),
            TargetMemory::default(),
        ))
        .id()
}

fn spawn_target(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Transform::from_translation(position), ChaseTarget))
        .id()
}

fn ai_state(app: &App, agent: Entity) -> AiState {
    *app.world().get::<AiState>(agent).unwrap()
}

fn nav_agent(app: &App, agent: Entity) -> NavAgent {
    app.world().get::<NavAgent>(agent).unwrap().clone()
}

/// Без цели агент вечно патрулирует и обходит точки по кругу 0,1,2,0,...
#[test]
fn test_patrol_cycles_waypoints_without_target() {
    let mut app = create_sim_app(42);
    let agent = spawn_patroller(
        &mut app,
        Vec3::ZERO,
        vec![
            Vec3::ZERO,
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 6.0),
        ],
    );

    // ~70 секунд: хватает больше чем на два полных круга (нога ~5 сек)
    let mut visited = vec![0];
    for _ in 0..4200 {
        tick(&mut app);

        let state = ai_state(&app, agent);
        assert!(state.is_patrolling(), "agent left Patrolling without a target");

        let index = app.world().get::<PatrolRoute>(agent).unwrap().current_index();
        if *visited.last().unwrap() != index {
            visited.push(index);
        }
    }

    assert!(visited.len() >= 7, "too few waypoint visits: {:?}", visited);
    for (i, index) in visited.iter().enumerate() {
        assert_eq!(*index, i % 3, "out-of-order visit sequence: {:?}", visited);
    }
}

/// Сценарий: waypoints [A, B], старт на A, wait 4 сек → после ожидания
/// destination становится B и таймер сбрасывается в 4 сек.
#[test]
fn test_waypoint_wait_then_advance() {
    let mut app = create_sim_app(42);
    let a = Vec3::ZERO;
    let b = Vec3::new(8.0, 0.0, 0.0);
    let agent = spawn_patroller(&mut app, a, vec![a, b]);

    run_ticks(&mut app, 3);
    // стоим на A и ждём
    let nav = nav_agent(&app, agent);
    assert_eq!(nav.destination, Some(a));
    assert!(nav.is_stopped);
    let AiState::Patrolling { wait_timer, .. } = ai_state(&app, agent) else {
        panic!("expected Patrolling");
    };
    assert!(wait_timer < 4.0, "wait timer must be counting down");

    // ~4.2 сек: ожидание истекло, идём к B
    run_ticks(&mut app, 250);
    let nav = nav_agent(&app, agent);
    assert_eq!(nav.destination, Some(b));
    assert!(!nav.is_stopped);
    assert_eq!(
        app.world().get::<PatrolRoute>(agent).unwrap().current_index(),
        1
    );
    let AiState::Patrolling { wait_timer, .. } = ai_state(&app, agent) else {
        panic!("expected Patrolling");
    };
    assert_eq!(wait_timer, 4.0, "wait timer resets to configured default");
}

/// Прибытие на waypoint не продвигает индекс пока таймер не истёк
/// (idempotent per arrival).
#[test]
fn test_waypoint_advance_waits_for_timer() {
    let mut app = create_sim_app(42);
    let a = Vec3::ZERO;
    let b = Vec3::new(8.0, 0.0, 0.0);
    let agent = spawn_patroller(&mut app, a, vec![a, b]);

    run_ticks(&mut app, 200); // < 4 сек ожидания
    assert_eq!(
        app.world().get::<PatrolRoute>(agent).unwrap().current_index(),
        0
    );

    run_ticks(&mut app, 100); // ожидание истекло, ушли к B
    assert_eq!(
        app.world().get::<PatrolRoute>(agent).unwrap().current_index(),
        1
    );

    run_ticks(&mut app, 200); // в пути к B / ждём на B — индекс стабилен
    assert_eq!(
        app.world().get::<PatrolRoute>(agent).unwrap().current_index(),
        1
    );
}

/// Сценарий: цель входит в обзор → следующий тик Chasing, destination =
/// позиция цели, профиль скорости run.
#[test]
fn test_visible_target_triggers_chase() {
    let mut app = create_sim_app(42);
    let agent = spawn_patroller(&mut app, Vec3::ZERO, vec![Vec3::ZERO]);
    let target_position = Vec3::new(0.0, 0.0, -5.0); // прямо по курсу (forward = -Z)
    spawn_target(&mut app, target_position);

    tick(&mut app);

    assert!(ai_state(&app, agent).is_chasing());
    let memory = app.world().get::<TargetMemory>(agent).unwrap();
    assert!(memory.in_sight);
    assert_eq!(memory.last_known_position, Some(target_position));

    let nav = nav_agent(&app, agent);
    assert_eq!(nav.destination, Some(target_position));
    assert_eq!(nav.speed, SpeedProfile::default().run);
}

/// Сценарий: цель на 1.0 (ближе close_threshold 2.5) — преследователь
/// замирает и ждёт, таймер строго убывает, скорость ноль.
#[test]
fn test_chase_standoff_near_target() {
    let mut app = create_sim_app(42);
    let agent = spawn_patroller(&mut app, Vec3::ZERO, vec![Vec3::ZERO]);
    spawn_target(&mut app, Vec3::new(0.0, 0.0, -1.0));

    tick(&mut app);
    assert!(ai_state(&app, agent).is_chasing());

    let mut previous_wait = f32::INFINITY;
    for _ in 0..30 {
        tick(&mut app);

        let AiState::Chasing { wait_timer, captured } = ai_state(&app, agent) else {
            panic!("expected Chasing");
        };
        assert!(!captured);
        assert!(wait_timer < previous_wait, "wait timer must strictly decrease");
        previous_wait = wait_timer;

        let nav = nav_agent(&app, agent);
        assert!(nav.is_stopped);
        assert_eq!(nav.speed, 0.0);
    }

    // агент не сдвинулся с места
    let position = app.world().get::<Transform>(agent).unwrap().translation;
    assert!(position.distance(Vec3::ZERO) < 1e-4);
}

/// Исчезнувшая цель: добегаем до последней известной позиции, пережидаем,
/// возвращаемся в Patrolling со сброшенными таймерами и чистой памятью.
#[test]
fn test_chase_returns_to_patrol_after_losing_target() {
    let mut app = create_sim_app(42);
    let agent = spawn_patroller(&mut app, Vec3::ZERO, vec![Vec3::ZERO]);
    let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -4.0));

    tick(&mut app);
    assert!(ai_state(&app, agent).is_chasing());

    app.world_mut().despawn(target);

    // бег к последней позиции (~0.5 сек) + ожидание 4 сек + запас
    run_ticks(&mut app, 279);

    let state = ai_state(&app, agent);
    let AiState::Patrolling { wait_timer, rotate_timer } = state else {
        panic!("expected Patrolling, got {:?}", state);
    };
    assert_eq!(wait_timer, 4.0, "timers reset on re-entry");
    assert_eq!(rotate_timer, 2.0);

    let memory = app.world().get::<TargetMemory>(agent).unwrap();
    assert!(!memory.in_sight);
    assert_eq!(memory.last_known_position, None);
    assert_eq!(memory.target, None);

    // идём обратно на маршрут
    let nav = nav_agent(&app, agent);
    assert_eq!(nav.destination, Some(Vec3::ZERO));
    assert_eq!(nav.speed, SpeedProfile::default().walk);
}

/// Кандидат позади агента (вне половины угла обзора) не обнаруживается.
#[test]
fn test_fov_rejects_target_behind() {
    let mut app = create_sim_app(42);
    let route = PatrolRoute::new(vec![Vec3::ZERO]).unwrap();
    let agent = app
        .world_mut()
        .spawn((
            Transform::from_translation(Vec3::ZERO),
            Agent,
            route,
            AiState::default(),
            AiConfig::default(),
            VisionConfig::new(10.0, 90.0).unwrap(),
            TargetMemory::default(),
        ))
        .id();
    spawn_target(&mut app, Vec3::new(0.0, 0.0, 5.0)); // за спиной (+Z)
    spawn_target(&mut app, Vec3::new(0.0, 0.0, -50.0)); // по курсу, но вне радиуса

    run_ticks(&mut app, 50);

    assert!(ai_state(&app, agent).is_patrolling());
    assert!(!app.world().get::<TargetMemory>(agent).unwrap().in_sight);
}

/// Перекрытая line-of-sight не даёт обнаружить цель.
#[test]
fn test_occlusion_blocks_detection() {
    let mut app = create_headless_app(42);
    // стена: видимость всегда перекрыта
    app.insert_resource(SightProbeHandle(Box::new(FnSightProbe(
        |_from: Vec3, _to: Vec3| false,
    ))));
    app.add_plugins(SimulationPlugin);

    let agent = spawn_patroller(&mut app, Vec3::ZERO, vec![Vec3::ZERO]);
    spawn_target(&mut app, Vec3::new(0.0, 0.0, -3.0));

    run_ticks(&mut app, 50);

    assert!(ai_state(&app, agent).is_patrolling());
    assert!(!app.world().get::<TargetMemory>(agent).unwrap().in_sight);
}

/// Из нескольких видимых кандидатов выбирается ближайший.
#[test]
fn test_nearest_candidate_wins() {
    let mut app = create_sim_app(42);
    let agent = spawn_patroller(&mut app, Vec3::ZERO, vec![Vec3::ZERO]);
    let _far = spawn_target(&mut app, Vec3::new(0.0, 0.0, -7.0));
    let near = spawn_target(&mut app, Vec3::new(0.0, 0.0, -3.0));

    tick(&mut app);

    let memory = app.world().get::<TargetMemory>(agent).unwrap();
    assert_eq!(memory.target, Some(near));
}

/// Capture замораживает преследование: ни движения, ни таймерных переходов.
#[test]
fn test_captured_agent_freezes() {
    let mut app = create_sim_app(42);
    let agent = spawn_patroller(&mut app, Vec3::ZERO, vec![Vec3::ZERO]);
    let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -4.0));

    run_ticks(&mut app, 5); // разогнались за целью
    assert!(ai_state(&app, agent).is_chasing());

    app.world_mut().send_event(TargetCaptured { agent });
    tick(&mut app);

    let AiState::Chasing { wait_timer, captured } = ai_state(&app, agent) else {
        panic!("expected Chasing");
    };
    assert!(captured);
    let frozen_wait = wait_timer;
    let frozen_destination = nav_agent(&app, agent).destination;
    let frozen_position = app.world().get::<Transform>(agent).unwrap().translation;

    // цель убегает — замороженный агент не реагирует
    app.world_mut().get_mut::<Transform>(target).unwrap().translation =
        Vec3::new(0.0, 0.0, -30.0);
    run_ticks(&mut app, 100);

    let AiState::Chasing { wait_timer, captured } = ai_state(&app, agent) else {
        panic!("expected Chasing");
    };
    assert!(captured);
    assert_eq!(wait_timer, frozen_wait, "no timer-driven transitions once captured");

    let nav = nav_agent(&app, agent);
    assert!(nav.is_stopped);
    assert_eq!(nav.destination, frozen_destination, "no new chase destinations");
    let position = app.world().get::<Transform>(agent).unwrap().translation;
    assert!(position.distance(frozen_position) < 1e-4);
}

/// Capture вне преследования игнорируется.
#[test]
fn test_capture_ignored_while_patrolling() {
    let mut app = create_sim_app(42);
    let agent = spawn_patroller(&mut app, Vec3::ZERO, vec![Vec3::ZERO]);

    app.world_mut().send_event(TargetCaptured { agent });
    run_ticks(&mut app, 5);

    assert!(ai_state(&app, agent).is_patrolling());
}

/// Шум: пауза "оглядеться", поход к источнику, ожидание, возврат на маршрут.
#[test]
fn test_disturbance_investigation_cycle() {
    let mut app = create_sim_app(42);
    let agent = spawn_patroller(&mut app, Vec3::ZERO, vec![Vec3::ZERO]);
    let noise = Vec3::new(3.0, 0.0, 0.0);

    run_ticks(&mut app, 5);
    app.world_mut().send_event(DisturbanceHeard { position: noise, radius: 20.0 });
    tick(&mut app);

    let memory = app.world().get::<TargetMemory>(agent).unwrap();
    assert_eq!(memory.last_known_position, Some(noise));

    // фаза 1: стоим и оглядываемся (rotate_timer тикает)
    run_ticks(&mut app, 60);
    let AiState::Patrolling { rotate_timer, .. } = ai_state(&app, agent) else {
        panic!("expected Patrolling");
    };
    assert!(rotate_timer > 0.0 && rotate_timer < 2.0);
    assert!(nav_agent(&app, agent).is_stopped);

    // фаза 2: идём к источнику
    run_ticks(&mut app, 80); // rotate (2 сек) истёк
    assert_eq!(nav_agent(&app, agent).destination, Some(noise));

    // фаза 3: дождались, осмотр окончен — память чистая, снова маршрут
    run_ticks(&mut app, 320);
    let memory = app.world().get::<TargetMemory>(agent).unwrap();
    assert_eq!(memory.last_known_position, None);
    assert_eq!(nav_agent(&app, agent).destination, Some(Vec3::ZERO));
    assert!(ai_state(&app, agent).is_patrolling());
}
