use std::time::Duration;

use glam::Vec2;
use nightfall_core::{Command, EnemyKind, EnemyProfile, Event, Phase};
use nightfall_system_horde::{Config, HordeScheduler};
use nightfall_world::{self as world, query, World};

fn pump(world: &mut World, horde: &mut HordeScheduler, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }

    let mut seen = Vec::new();
    while !events.is_empty() {
        seen.extend(events.iter().cloned());
        let mut commands = Vec::new();
        let mut notices = Vec::new();
        {
            let view = query::night_view(world);
            horde.handle(&events, &view, &mut commands, &mut notices);
        }
        events = notices;
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
    seen
}

fn tick(world: &mut World, horde: &mut HordeScheduler, seconds: u64) -> Vec<Event> {
    pump(
        world,
        horde,
        vec![Command::Tick {
            dt: Duration::from_secs(seconds),
        }],
    )
}

fn quick_config(enemies: u32) -> Config {
    Config::new(vec![EnemyProfile::new(EnemyKind::new(1), 10.0)])
        .with_enemy_counts(enemies, 0)
        .with_spawn_intervals(
            Duration::from_secs(1),
            Duration::ZERO,
            Duration::from_secs(1),
        )
        .with_warm_up_delay(Duration::from_secs(1))
        .with_min_player_distance(0.0)
}

fn prepared_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartDayCycle, &mut events);
    world::apply(
        &mut world,
        Command::RegisterSpawnPoint {
            name: "north".to_owned(),
            position: Vec2::new(0.0, 20.0),
        },
        &mut events,
    );
    world
}

fn kill_all(world: &mut World, horde: &mut HordeScheduler) -> Vec<Event> {
    let commands = query::enemy_view(world)
        .iter()
        .map(|enemy| Command::DamageEnemy {
            enemy: enemy.id,
            amount: 1_000.0,
        })
        .collect();
    pump(world, horde, commands)
}

fn assert_counters_consistent(horde: &HordeScheduler) {
    if let Some(session) = horde.session() {
        assert!(session.killed_count() <= session.spawned_count() || session.is_completed());
        assert!(session.spawned_count() <= session.target_kill_count());
        assert!((0.0..=1.0).contains(&horde.horde_progress()));
    }
}

fn horde_ended(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::HordeEnded { .. }))
        .count()
}

#[test]
fn night_spawns_until_target_and_ends_on_last_kill() {
    let mut world = prepared_world();
    let mut horde = HordeScheduler::new(quick_config(3));

    let started = pump(&mut world, &mut horde, vec![Command::TransitionToNight]);
    assert!(started.contains(&Event::HordeStarted {
        day: 1,
        target: 3,
        interval: Duration::from_secs(1),
    }));

    for _ in 0..5 {
        let _ = tick(&mut world, &mut horde, 1);
        assert_counters_consistent(&horde);
    }
    let session = horde.session().expect("horde session");
    assert_eq!(session.spawned_count(), 3);
    assert_eq!(session.active_enemies().len(), 3);
    assert!(!horde.is_spawning());
    assert_eq!(horde.remaining_enemies(), 3);

    let events = kill_all(&mut world, &mut horde);

    assert_eq!(horde_ended(&events), 1);
    assert_eq!(query::phase(&world), Phase::Digging);
    assert_eq!(horde.remaining_enemies(), 0);
    assert_eq!(horde.horde_progress(), 1.0);
}

#[test]
fn pausing_suspends_the_spawn_loop() {
    let mut world = prepared_world();
    let mut horde = HordeScheduler::new(quick_config(3));
    let _ = pump(&mut world, &mut horde, vec![Command::TransitionToNight]);

    let _ = pump(
        &mut world,
        &mut horde,
        vec![Command::SetPhase {
            phase: Phase::Paused,
        }],
    );
    for _ in 0..10 {
        let _ = tick(&mut world, &mut horde, 1);
    }
    assert_eq!(horde.session().map(|session| session.spawned_count()), Some(0));

    let _ = pump(
        &mut world,
        &mut horde,
        vec![Command::SetPhase { phase: Phase::Night }],
    );
    let _ = tick(&mut world, &mut horde, 1);
    assert_eq!(horde.session().map(|session| session.spawned_count()), Some(1));
}

#[test]
fn end_night_outside_the_night_is_a_no_op() {
    let mut world = prepared_world();
    let mut horde = HordeScheduler::new(quick_config(3));
    let mut commands = Vec::new();
    let mut notices = Vec::new();

    let view = query::night_view(&world);
    assert!(!horde.end_night(&view, &mut commands, &mut notices));

    assert!(commands.is_empty());
    assert!(notices.is_empty());
    assert_eq!(query::phase(&world), Phase::Digging);
}

#[test]
fn end_night_clears_live_enemies_and_finalizes_once() {
    let mut world = prepared_world();
    let mut horde = HordeScheduler::new(quick_config(4));
    let _ = pump(&mut world, &mut horde, vec![Command::TransitionToNight]);
    let _ = tick(&mut world, &mut horde, 2);
    assert_eq!(query::enemy_view(&world).len(), 2);

    let mut commands = Vec::new();
    let mut notices = Vec::new();
    {
        let view = query::night_view(&world);
        assert!(horde.end_night(&view, &mut commands, &mut notices));
        assert!(!horde.end_night(&view, &mut commands, &mut notices));
    }
    let mut events = notices;
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    let events = {
        let mut commands = Vec::new();
        let mut notices = Vec::new();
        let view = query::night_view(&world);
        horde.handle(&events, &view, &mut commands, &mut notices);
        assert!(commands.is_empty());
        events
    };

    assert_eq!(horde_ended(&events), 1);
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::phase(&world), Phase::Digging);
    assert_eq!(horde.remaining_enemies(), 0);
    assert!(!horde.is_spawning());
}

#[test]
fn healthless_enemies_are_despawned_by_end_night() {
    let mut world = prepared_world();
    let mut horde = HordeScheduler::new(
        Config::new(vec![EnemyProfile::without_health(EnemyKind::new(9))])
            .with_enemy_counts(1, 0)
            .with_warm_up_delay(Duration::ZERO),
    );
    let _ = pump(&mut world, &mut horde, vec![Command::TransitionToNight]);
    let _ = tick(&mut world, &mut horde, 1);
    assert_eq!(query::enemy_view(&world).len(), 1);

    let mut commands = Vec::new();
    let mut notices = Vec::new();
    {
        let view = query::night_view(&world);
        assert!(horde.end_night(&view, &mut commands, &mut notices));
    }

    assert!(commands
        .iter()
        .any(|command| matches!(command, Command::DespawnEnemy { .. })));
    assert!(!commands
        .iter()
        .any(|command| matches!(command, Command::KillEnemy { .. })));
}

#[test]
fn boss_nights_hold_the_horde_open_until_the_boss_falls() {
    let mut world = prepared_world();
    let mut horde = HordeScheduler::new(quick_config(1));
    let _ = pump(&mut world, &mut horde, vec![Command::TransitionToNight]);

    let mut commands = Vec::new();
    let mut notices = Vec::new();
    {
        let view = query::night_view(&world);
        horde.handle(
            &[Event::BossNightStarted { day: 1 }],
            &view,
            &mut commands,
            &mut notices,
        );
    }
    let _ = tick(&mut world, &mut horde, 2);
    let cleared = kill_all(&mut world, &mut horde);
    assert_eq!(horde_ended(&cleared), 0);
    assert_eq!(query::phase(&world), Phase::Night);

    let mut events = Vec::new();
    {
        let view = query::night_view(&world);
        horde.handle(
            &[Event::BossNightCompleted { day: 1, reward: 100 }],
            &view,
            &mut commands,
            &mut events,
        );
    }

    assert_eq!(horde_ended(&events), 1);
    assert!(commands.contains(&Command::SetPhase {
        phase: Phase::Digging
    }));
}

#[test]
fn game_over_abandons_the_session() {
    let mut world = prepared_world();
    let mut horde = HordeScheduler::new(quick_config(3));
    let _ = pump(&mut world, &mut horde, vec![Command::TransitionToNight]);
    let _ = tick(&mut world, &mut horde, 1);

    let _ = pump(
        &mut world,
        &mut horde,
        vec![Command::SetPhase {
            phase: Phase::GameOver,
        }],
    );

    assert!(horde.session().is_none());
    assert!(!horde.is_spawning());
}

#[test]
fn later_nights_raise_the_target() {
    let mut world = prepared_world();
    let mut horde = HordeScheduler::new(
        Config::new(vec![EnemyProfile::new(EnemyKind::new(1), 10.0)]).with_enemy_counts(5, 2),
    );

    let mut started = Vec::new();
    for _ in 0..3 {
        let events = pump(&mut world, &mut horde, vec![Command::TransitionToNight]);
        started.extend(events.into_iter().filter_map(|event| match event {
            Event::HordeStarted { target, .. } => Some(target),
            _ => None,
        }));
        let _ = pump(&mut world, &mut horde, vec![Command::StartDayCycle]);
    }

    assert_eq!(started, vec![5, 7, 9]);
    assert_eq!(horde.session().map(|session| session.day()), Some(3));
}
