use std::{
    cell::RefCell,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    rc::Rc,
    time::Duration,
};

use glam::Vec2;
use nightfall_core::{Command, EnemyKind, EnemyProfile, Event};
use nightfall_director::{Config, Director};
use nightfall_system_boss as boss;
use nightfall_system_horde as horde;
use nightfall_world::query;

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(11);
    let second = replay(11);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.days, 6);
}

#[test]
fn different_seeds_diverge() {
    let first = replay(11);
    let second = replay(12);

    assert_ne!(first.fingerprint(), second.fingerprint());
}

fn replay(seed: u64) -> ReplayOutcome {
    let config = Config::default()
        .with_horde(
            horde::Config::new(vec![
                EnemyProfile::new(EnemyKind::new(1), 20.0),
                EnemyProfile::new(EnemyKind::new(2), 35.0),
                EnemyProfile::without_health(EnemyKind::new(3)),
            ])
            .with_enemy_counts(4, 1)
            .with_rng_seed(seed),
        )
        .with_boss(
            boss::Config::new(vec![
                EnemyProfile::new(EnemyKind::new(40), 150.0),
                EnemyProfile::new(EnemyKind::new(41), 180.0),
            ])
            .with_boss_night_interval(3)
            .with_rng_seed(seed),
        );
    let mut director = Director::new(config).expect("valid configuration");
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let _ = director.subscribe(move |event: &Event| sink.borrow_mut().push(EventRecord::from(event)));

    director.start_day_cycle();
    for (index, position) in [
        Vec2::new(20.0, 0.0),
        Vec2::new(0.0, 20.0),
        Vec2::new(-20.0, 0.0),
        Vec2::new(0.0, -20.0),
    ]
    .into_iter()
    .enumerate()
    {
        director.submit(Command::RegisterSpawnPoint {
            name: format!("gate-{index}"),
            position,
        });
    }

    for _ in 0..6 {
        director.transition_to_night();
        for step in 0..120 {
            director.tick(Duration::from_millis(250));
            if step % 8 == 7 {
                let damageable: Vec<_> = query::enemy_view(director.world())
                    .iter()
                    .filter(|enemy| enemy.is_damageable())
                    .map(|enemy| enemy.id)
                    .collect();
                for enemy in damageable {
                    director.submit(Command::DamageEnemy {
                        enemy,
                        amount: 25.0,
                    });
                }
            }
        }
        let _ = director.end_night();
    }

    let events = log.borrow().clone();
    ReplayOutcome {
        days: director.current_day(),
        gold: query::gold(director.world()),
        events,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    days: u32,
    gold: u32,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Spawned {
        enemy: u32,
        kind: u32,
        spawn_point: u32,
    },
    Died {
        enemy: u32,
    },
    Gold {
        amount: u32,
        total: u32,
    },
    Other(String),
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::EnemySpawned {
                enemy,
                kind,
                spawn_point,
                ..
            } => Self::Spawned {
                enemy: enemy.get(),
                kind: kind.get(),
                spawn_point: spawn_point.get(),
            },
            Event::EnemyDied { enemy, .. } => Self::Died { enemy: enemy.get() },
            Event::GoldGranted { amount, total } => Self::Gold {
                amount: *amount,
                total: *total,
            },
            other => Self::Other(format!("{other:?}")),
        }
    }
}
