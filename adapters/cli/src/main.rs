#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Nightfall nights headlessly and reports the outcome.

mod config;

use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use nightfall_core::{Command, EnemyRole, Event, Phase, TributeAward};
use nightfall_director::Director;
use nightfall_world::query;

use config::Scenario;

#[derive(Debug, Parser)]
#[command(name = "nightfall", version)]
#[command(about = "Simulates Nightfall nights without a renderer and prints a report")]
struct Args {
    /// Scenario file describing the systems and the map
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of nights to simulate
    #[arg(long, default_value_t = 5)]
    nights: u32,

    /// Simulation step in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Seed overriding the scenario's generators
    #[arg(long)]
    seed: Option<u64>,

    /// Damage per second the defences deal to every live enemy
    #[arg(long, default_value_t = 12.0)]
    defence: f32,

    /// Damage per second each live enemy deals to the home
    #[arg(long, default_value_t = 0.25)]
    siege: f32,

    /// Seconds after which an unfinished night is skipped
    #[arg(long, default_value_t = 240)]
    night_limit: u64,
}

#[derive(Clone, Copy, Debug, Default)]
struct NightReport {
    day: u32,
    horde_kills: u32,
    boss_night: bool,
    boss_defeated: bool,
    boss_reward: u32,
    tribute: Option<TributeAward>,
    skipped: bool,
    home_health: f32,
    gold: u32,
}

/// Entry point for the Nightfall command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario = match &args.config {
        Some(path) => config::load(path, args.seed)?,
        None => Scenario::fallback(args.seed)?,
    };

    let reports = simulate(&args, scenario)?;
    for report in &reports {
        println!("{}", describe(report));
    }
    if let Some(last) = reports.last() {
        println!(
            "survived {} of {} nights with {} gold",
            reports.iter().filter(|report| report.home_health > 0.0).count(),
            args.nights,
            last.gold
        );
    }
    Ok(())
}

fn simulate(args: &Args, scenario: Scenario) -> Result<Vec<NightReport>> {
    let mut director =
        Director::new(scenario.config).context("scenario configuration is invalid")?;
    let current = Rc::new(RefCell::new(NightReport::default()));
    let sink = Rc::clone(&current);
    let _ = director.subscribe(move |event| record(&mut sink.borrow_mut(), event));

    director.start_day_cycle();
    for (name, position) in scenario.spawn_points {
        director.submit(Command::RegisterSpawnPoint { name, position });
    }
    for name in scenario.markers {
        director.submit(Command::RegisterNightMarker { name });
    }

    let step = Duration::from_millis(args.tick_ms.max(1));
    let limit = Duration::from_secs(args.night_limit);
    let mut reports = Vec::new();

    for _ in 0..args.nights {
        *current.borrow_mut() = NightReport::default();
        director.transition_to_night();

        let mut elapsed = Duration::ZERO;
        while director.current_phase() == Phase::Night {
            if elapsed >= limit {
                log::warn!(
                    "night {} outlasted {:?}; skipping to dawn",
                    director.current_day(),
                    limit
                );
                current.borrow_mut().skipped = true;
                let _ = director.end_night();
                break;
            }

            director.tick(step);
            elapsed += step;
            defend(&mut director, step, args.defence, args.siege);
        }

        let mut report = *current.borrow();
        report.day = director.current_day();
        report.home_health = query::home_health(director.world());
        report.gold = query::gold(director.world());
        reports.push(report);

        if director.current_phase() == Phase::GameOver {
            log::info!("the home fell on night {}", report.day);
            break;
        }
    }

    Ok(reports)
}

fn defend(director: &mut Director, step: Duration, defence: f32, siege: f32) {
    let seconds = step.as_secs_f32();
    let enemies = query::enemy_view(director.world());
    if enemies.is_empty() {
        return;
    }

    let hits: Vec<_> = enemies
        .iter()
        .filter(|enemy| enemy.is_damageable())
        .map(|enemy| Command::DamageEnemy {
            enemy: enemy.id,
            amount: defence * seconds,
        })
        .collect();
    for hit in hits {
        director.submit(hit);
    }

    director.submit(Command::DamageHome {
        amount: siege * seconds * enemies.len() as f32,
    });
    if query::home_health(director.world()) <= 0.0 {
        director.set_phase(Phase::GameOver);
    }
}

fn record(report: &mut NightReport, event: &Event) {
    match event {
        Event::HordeProgress { killed, .. } => report.horde_kills = *killed,
        Event::BossNightStarted { .. } => report.boss_night = true,
        Event::BossNightCompleted { reward, .. } => {
            report.boss_defeated = true;
            report.boss_reward = *reward;
        }
        Event::TributeEvaluated { award } => report.tribute = Some(*award),
        Event::EnemySpawned {
            role: EnemyRole::Boss,
            enemy,
            ..
        } => log::info!("boss {} entered the field", enemy.get()),
        Event::PhaseChanged { from, to } => log::debug!("phase {from:?} -> {to:?}"),
        _ => {}
    }
}

fn describe(report: &NightReport) -> String {
    let boss = match (report.boss_night, report.boss_defeated) {
        (false, _) => String::from("no boss"),
        (true, true) => format!("boss slain for {} gold", report.boss_reward),
        (true, false) => String::from("boss survived"),
    };
    let tribute = report
        .tribute
        .map_or(0, |award| award.total());
    let ending = if report.skipped { " (skipped)" } else { "" };

    format!(
        "night {:>3}: {:>3} kills, {boss}, tribute {tribute}, home {:.1}, gold {}{ending}",
        report.day, report.horde_kills, report.home_health, report.gold
    )
}
