//! Headless симуляция DARKHALL
//!
//! Прогоняет сцену (патрульный, игрок-цель, collector, дверь) без рендера.
//! Fixed schedule прокручивается вручную — тик ровно 1/60 сек, прогон
//! воспроизводим.

use bevy::prelude::*;
use darkhall_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting DARKHALL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    // Патрульный по квадрату 12x12
    let route = PatrolRoute::new(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(12.0, 0.0, 0.0),
        Vec3::new(12.0, 0.0, 12.0),
        Vec3::new(0.0, 0.0, 12.0),
    ])
    .expect("non-empty route");
    let patroller = spawn_patrol_agent(&mut app.world_mut().commands(), Vec3::ZERO, route);

    // Игрок (цель преследования) в стороне от маршрута
    let player = spawn_player_character(&mut app.world_mut().commands(), Vec3::new(20.0, 0.0, 20.0));
    app.world_mut().commands().entity(player).insert(ChaseTarget);

    // Collector с предметами
    app.world_mut().spawn((
        Transform::from_translation(Vec3::new(-8.0, 0.0, -8.0)),
        Agent,
        CollectorState::default(),
        CollectorConfig::default(),
    ));
    for offset in [Vec3::new(-5.0, 0.0, -9.0), Vec3::new(-11.0, 0.0, -4.0)] {
        app.world_mut().spawn((Transform::from_translation(offset), Collectible));
    }

    // Дверь
    app.world_mut().spawn((
        Transform::from_translation(Vec3::new(6.0, 0.0, 6.0)),
        Door::default(),
        DoorConfig::default(),
        Interactable,
    ));

    // применяем отложенные spawn команды до первого тика
    app.world_mut().flush();

    // 1200 тиков = 20 секунд симуляции
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    for tick in 0..1200 {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(timestep);
        app.world_mut().run_schedule(FixedUpdate);

        if tick % 120 == 0 {
            let state = app.world().get::<AiState>(patroller).cloned();
            let position = app
                .world()
                .get::<Transform>(patroller)
                .map(|t| t.translation)
                .unwrap_or(Vec3::ZERO);
            println!(
                "Tick {}: patroller at ({:.1}, {:.1}) state {:?}",
                tick, position.x, position.z, state
            );
        }
    }

    println!("Simulation complete!");
}
