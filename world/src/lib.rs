#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Nightfall.
//!
//! The world owns the phase state machine, the day counter, and every
//! collaborator the nocturnal systems consume: damageable enemies, the
//! currency store, the lunar cycle, the spawn-point registry, and the home
//! and player health pools. All mutation goes through [`apply`].

mod clock;
mod enemies;
mod phase;

use glam::Vec2;
use nightfall_core::{Command, Event, LunarPhase, Phase, SpawnPoint, SpawnPointId};

use enemies::{DamageOutcome, Roster};
use phase::PhaseMachine;

pub use clock::PhaseClock;

const DEFAULT_HOME_HEALTH: f32 = 100.0;
const DEFAULT_PLAYER_HEALTH: f32 = 100.0;

/// Represents the authoritative Nightfall world state.
#[derive(Debug)]
pub struct World {
    phase: PhaseMachine,
    clock: PhaseClock,
    spawn_points: Vec<SpawnPoint>,
    enemies: Roster,
    player_position: Vec2,
    player_health: f32,
    home_health: f32,
    gold: u32,
    lunar_phase: LunarPhase,
    plants_destroyed: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a new world on day zero with no phase entered yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: PhaseMachine::new(),
            clock: PhaseClock::new(),
            spawn_points: Vec::new(),
            enemies: Roster::default(),
            player_position: Vec2::ZERO,
            player_health: DEFAULT_PLAYER_HEALTH,
            home_health: DEFAULT_HOME_HEALTH,
            gold: 0,
            lunar_phase: LunarPhase::New,
            plants_destroyed: 0,
        }
    }

    fn set_phase(&mut self, next: Phase, out_events: &mut Vec<Event>) {
        if self.phase.transition(next, out_events) {
            self.clock.restart_phase();
        }
    }

    fn has_spawn_point(&self, id: SpawnPointId) -> bool {
        self.spawn_points.iter().any(|point| point.id == id)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            let scale = world.phase.time_scale();
            if scale <= 0.0 || dt.is_zero() {
                return;
            }

            let scaled = if (scale - 1.0).abs() <= f32::EPSILON {
                dt
            } else {
                dt.mul_f64(f64::from(scale))
            };
            world.clock.advance(scaled);
            out_events.push(Event::TimeAdvanced { dt: scaled });
        }
        Command::SetPhase { phase } => world.set_phase(phase, out_events),
        Command::StartDayCycle => {
            world.set_phase(Phase::Digging, out_events);
            let day = world.clock.day();
            world.lunar_phase = LunarPhase::from_day(day);
            out_events.push(Event::NewDay { day });
        }
        Command::TransitionToNight => {
            if world.phase.phase() == Phase::Night {
                log::debug!("ignoring night transition while the night is already active");
                return;
            }

            let day = world.clock.advance_day();
            out_events.push(Event::DayAdvanced { day });
            world.set_phase(Phase::Night, out_events);
            out_events.push(Event::NightBegan { day });
        }
        Command::ConfigureHome { health } => {
            world.home_health = health.max(0.0);
        }
        Command::RegisterSpawnPoint { name, position } => {
            let id = SpawnPointId::new(u32::try_from(world.spawn_points.len()).unwrap_or(u32::MAX));
            world.spawn_points.push(SpawnPoint { id, name, position });
        }
        Command::RegisterNightMarker { name } => world.phase.register_marker(name),
        Command::MovePlayer { position } => {
            world.player_position = position;
        }
        Command::SetPlayerAbility { ability } => world.phase.set_ability(ability, out_events),
        Command::SetLunarPhase { phase } => {
            world.lunar_phase = phase;
        }
        Command::SpawnEnemy {
            profile,
            spawn_point,
            role,
        } => {
            if !world.has_spawn_point(spawn_point) {
                log::warn!("spawn requested at unknown spawn point {}", spawn_point.get());
                return;
            }

            let enemy = world.enemies.spawn(profile, spawn_point, role);
            out_events.push(Event::EnemySpawned {
                enemy,
                kind: profile.kind,
                role,
                spawn_point,
            });
        }
        Command::DamageEnemy { enemy, amount } => match world.enemies.damage(enemy, amount) {
            DamageOutcome::Wounded(remaining) => {
                out_events.push(Event::EnemyDamaged { enemy, remaining });
            }
            DamageOutcome::Killed(role) => out_events.push(Event::EnemyDied { enemy, role }),
            DamageOutcome::Invulnerable | DamageOutcome::Missing => {}
        },
        Command::KillEnemy { enemy } => match world.enemies.kill(enemy) {
            DamageOutcome::Killed(role) => out_events.push(Event::EnemyDied { enemy, role }),
            outcome => log::debug!("kill of enemy {} had no effect: {outcome:?}", enemy.get()),
        },
        Command::DespawnEnemy { enemy } => {
            if let Some(role) = world.enemies.despawn(enemy) {
                out_events.push(Event::EnemyDespawned { enemy, role });
            }
        }
        Command::DamageHome { amount } => {
            if amount <= 0.0 {
                return;
            }
            world.home_health = (world.home_health - amount).max(0.0);
            out_events.push(Event::HomeDamaged {
                remaining: world.home_health,
            });
        }
        Command::DamagePlayer { amount } => {
            if amount <= 0.0 {
                return;
            }
            world.player_health = (world.player_health - amount).max(0.0);
            out_events.push(Event::PlayerDamaged { amount });
        }
        Command::DestroyPlant => {
            world.plants_destroyed = world.plants_destroyed.saturating_add(1);
            out_events.push(Event::PlantDestroyed);
        }
        Command::GrantGold { amount } => {
            if amount == 0 {
                return;
            }
            world.gold = world.gold.saturating_add(amount);
            out_events.push(Event::GoldGranted {
                amount,
                total: world.gold,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use nightfall_core::{
        Ambience, CursorContext, EnemyId, EnemySnapshot, EnemyView, LunarPhase, NightView, Phase,
        PlayerAbility, SpawnPoint,
    };

    use super::{PhaseClock, World};

    /// Phase currently active.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase.phase()
    }

    /// Current value of the day counter.
    #[must_use]
    pub fn current_day(world: &World) -> u32 {
        world.clock.day()
    }

    /// Provides read-only access to the game-time clock.
    #[must_use]
    pub fn clock(world: &World) -> &PhaseClock {
        &world.clock
    }

    /// Game time spent in the active phase.
    #[must_use]
    pub fn phase_elapsed(world: &World) -> Duration {
        world.clock.in_phase()
    }

    /// Multiplier applied to incoming ticks.
    #[must_use]
    pub fn time_scale(world: &World) -> f32 {
        world.phase.time_scale()
    }

    /// Day or night theming currently applied.
    #[must_use]
    pub fn ambience(world: &World) -> Ambience {
        world.phase.ambience()
    }

    /// Ability bound to the player's primary input.
    #[must_use]
    pub fn ability(world: &World) -> PlayerAbility {
        world.phase.ability()
    }

    /// Cursor affordance currently presented.
    #[must_use]
    pub fn cursor(world: &World) -> CursorContext {
        world.phase.cursor()
    }

    /// Reports whether night-mode visuals are enabled on registered markers.
    #[must_use]
    pub fn night_mode(world: &World) -> bool {
        world.phase.night_mode()
    }

    /// Names of the registered night-mode markers.
    #[must_use]
    pub fn night_markers(world: &World) -> &[String] {
        world.phase.night_markers()
    }

    /// Registered spawn points in registration order.
    #[must_use]
    pub fn spawn_points(world: &World) -> &[SpawnPoint] {
        &world.spawn_points
    }

    /// Current player position.
    #[must_use]
    pub fn player_position(world: &World) -> Vec2 {
        world.player_position
    }

    /// Current player health.
    #[must_use]
    pub fn player_health(world: &World) -> f32 {
        world.player_health
    }

    /// Current home health.
    #[must_use]
    pub fn home_health(world: &World) -> f32 {
        world.home_health
    }

    /// Gold held in the currency store.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.gold
    }

    /// Lunar phase reported by the lunar cycle.
    #[must_use]
    pub fn lunar_phase(world: &World) -> LunarPhase {
        world.lunar_phase
    }

    /// Number of plants destroyed since the world was created.
    #[must_use]
    pub fn plants_destroyed(world: &World) -> u32 {
        world.plants_destroyed
    }

    /// Looks up a single live enemy.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        world.enemies.snapshot(enemy)
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.snapshots())
    }

    /// Captures the slice of world state consumed by the nocturnal systems.
    #[must_use]
    pub fn night_view(world: &World) -> NightView<'_> {
        NightView {
            phase: world.phase.phase(),
            day: world.clock.day(),
            lunar_phase: world.lunar_phase,
            spawn_points: &world.spawn_points,
            player_position: world.player_position,
            home_health: world.home_health,
            enemies: enemy_view(world),
        }
    }
}
