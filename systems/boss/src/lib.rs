#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Periodic boss encounter controller: arming, announcement, spawn, defeat and reward.

use std::time::Duration;

use nightfall_core::{
    Command, EnemyId, EnemyKind, EnemyProfile, EnemyRole, Event, LunarPhase, NightView, Phase,
    SpawnPointId,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_RNG_SEED: u64 = 0x626f_7373_6e69_6768;

/// Reports whether `day` hosts a boss night for the provided interval.
///
/// Always `false` when `interval` is zero.
#[must_use]
pub const fn is_boss_night_day(day: u32, interval: u32) -> bool {
    interval > 0 && day > 0 && day % interval == 0
}

/// Tuning knobs for boss nights.
#[derive(Clone, Debug)]
pub struct Config {
    boss_night_interval: u32,
    announcement_delay: Duration,
    dynamic_selection: bool,
    roster: Vec<EnemyProfile>,
    base_reward: u32,
    reward_step: u32,
    rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            boss_night_interval: 5,
            announcement_delay: Duration::from_secs(3),
            dynamic_selection: false,
            roster: vec![EnemyProfile::new(EnemyKind::new(100), 500.0)],
            base_reward: 100,
            reward_step: 50,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl Config {
    /// Creates a default configuration summoning bosses from `roster`.
    #[must_use]
    pub fn new(roster: Vec<EnemyProfile>) -> Self {
        Self {
            roster,
            ..Self::default()
        }
    }

    /// Sets how many days separate boss nights.
    #[must_use]
    pub fn with_boss_night_interval(mut self, interval: u32) -> Self {
        self.boss_night_interval = interval;
        self
    }

    /// Sets the game-time delay between the announcement and the spawn.
    #[must_use]
    pub fn with_announcement_delay(mut self, delay: Duration) -> Self {
        self.announcement_delay = delay;
        self
    }

    /// Selects bosses by lunar phase instead of round-robin.
    #[must_use]
    pub fn with_dynamic_selection(mut self, enabled: bool) -> Self {
        self.dynamic_selection = enabled;
        self
    }

    /// Sets the flat reward and the bonus added per completed interval.
    #[must_use]
    pub fn with_rewards(mut self, base: u32, step: u32) -> Self {
        self.base_reward = base;
        self.reward_step = step;
        self
    }

    /// Seeds the generator used for boss and spawn point selection.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Days between boss nights.
    #[must_use]
    pub const fn boss_night_interval(&self) -> u32 {
        self.boss_night_interval
    }

    /// Boss templates available for summoning.
    #[must_use]
    pub fn roster(&self) -> &[EnemyProfile] {
        &self.roster
    }

    /// Gold granted for defeating the boss of `day`.
    #[must_use]
    pub fn reward_for(&self, day: u32) -> u32 {
        let intervals = day.checked_div(self.boss_night_interval).unwrap_or(0);
        self.base_reward
            .saturating_add(intervals.saturating_mul(self.reward_step))
    }
}

/// Book-keeping for the boss night of the current day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BossNightState {
    has_spawned_this_night: bool,
    last_boss_night_day: Option<u32>,
    current_boss: Option<EnemyId>,
    defeated: bool,
}

impl BossNightState {
    /// Reports whether the encounter for the current night already started.
    #[must_use]
    pub const fn has_spawned_this_night(&self) -> bool {
        self.has_spawned_this_night
    }

    /// Day of the most recently started boss night.
    #[must_use]
    pub const fn last_boss_night_day(&self) -> Option<u32> {
        self.last_boss_night_day
    }

    /// Boss currently alive, if any.
    #[must_use]
    pub const fn current_boss(&self) -> Option<EnemyId> {
        self.current_boss
    }

    /// Reports whether the boss of the current night was defeated.
    #[must_use]
    pub const fn defeated(&self) -> bool {
        self.defeated
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Dormant,
    Announcing { remaining: Duration },
    Summoning,
    Engaged,
}

/// Pure system that arms, runs and resolves boss nights.
#[derive(Debug)]
pub struct BossEncounterController {
    config: Config,
    rng: ChaCha8Rng,
    state: BossNightState,
    pending_day: Option<u32>,
    stage: Stage,
    boss_night_count: u32,
}

impl Default for BossEncounterController {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl BossEncounterController {
    /// Creates a controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            state: BossNightState::default(),
            pending_day: None,
            stage: Stage::Dormant,
            boss_night_count: 0,
        }
    }

    /// Configuration the controller was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the boss night book-keeping.
    #[must_use]
    pub const fn state(&self) -> BossNightState {
        self.state
    }

    /// Day of the armed but not yet started boss night.
    #[must_use]
    pub const fn pending_day(&self) -> Option<u32> {
        self.pending_day
    }

    /// Number of boss nights started so far.
    #[must_use]
    pub const fn boss_night_count(&self) -> u32 {
        self.boss_night_count
    }

    /// Reports whether an encounter is between its start and its resolution.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.stage != Stage::Dormant
    }

    /// Reports whether `day` hosts a boss night under this configuration.
    #[must_use]
    pub const fn is_boss_night_day(&self, day: u32) -> bool {
        is_boss_night_day(day, self.config.boss_night_interval)
    }

    /// Consumes world events and the night view to drive the encounter.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: &NightView<'_>,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let mut elapsed = Duration::ZERO;

        for event in events {
            match event {
                Event::DayAdvanced { day } => self.on_day_advanced(*day),
                Event::NightBegan { .. } => {
                    let _ = self.start_boss_night(out_events);
                }
                Event::EnemySpawned {
                    enemy,
                    kind,
                    role: EnemyRole::Boss,
                    ..
                } => self.on_boss_spawned(*enemy, *kind, out, out_events),
                Event::EnemyDied { enemy, .. } | Event::EnemyDespawned { enemy, .. } => {
                    if self.state.current_boss == Some(*enemy) {
                        self.resolve_defeat(out, out_events);
                    }
                }
                Event::PhaseChanged { to, .. } if to.abandons_session() => self.abandon(),
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                _ => {}
            }
        }

        if !elapsed.is_zero() {
            self.advance(elapsed, view, out);
        }
    }

    /// Starts the armed boss night and begins the announcement countdown.
    ///
    /// Rejected when no boss night is armed, when the encounter already
    /// started this night, or when the roster is empty.
    pub fn start_boss_night(&mut self, out_events: &mut Vec<Event>) -> bool {
        let Some(day) = self.pending_day else {
            log::debug!("boss night start rejected: no boss night is armed");
            return false;
        };
        if self.state.has_spawned_this_night || self.stage != Stage::Dormant {
            log::debug!("boss night start rejected: day {day} already has its boss");
            return false;
        }
        if self.config.roster.is_empty() {
            log::warn!("boss night declined: the boss roster is empty");
            return false;
        }

        self.pending_day = None;
        self.state.has_spawned_this_night = true;
        self.state.last_boss_night_day = Some(day);
        self.state.defeated = false;
        self.boss_night_count = self.boss_night_count.saturating_add(1);
        self.stage = Stage::Announcing {
            remaining: self.config.announcement_delay,
        };

        log::info!("boss night {} begins on day {day}", self.boss_night_count);
        out_events.push(Event::BossNightStarted { day });
        true
    }

    /// Ends the encounter early.
    ///
    /// A boss with health is killed through the world and resolved by its
    /// death event. A boss without health is despawned and resolved at once.
    /// Before the boss engages the encounter is aborted without a reward.
    pub fn force_end_boss_night(
        &mut self,
        view: &NightView<'_>,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> bool {
        match self.stage {
            Stage::Dormant => {
                log::debug!("boss night force-end ignored: no encounter is running");
                false
            }
            Stage::Announcing { .. } | Stage::Summoning => {
                let day = self.state.last_boss_night_day.unwrap_or_default();
                self.stage = Stage::Dormant;
                log::info!("boss night on day {day} aborted before the boss engaged");
                out_events.push(Event::BossNightAborted { day });
                true
            }
            Stage::Engaged => {
                let Some(boss) = self.state.current_boss else {
                    self.stage = Stage::Dormant;
                    return false;
                };
                match view.enemies.get(boss) {
                    Some(snapshot) if snapshot.is_damageable() => {
                        out.push(Command::KillEnemy { enemy: boss });
                    }
                    Some(_) => {
                        out.push(Command::DespawnEnemy { enemy: boss });
                        self.resolve_defeat(out, out_events);
                    }
                    None => self.resolve_defeat(out, out_events),
                }
                true
            }
        }
    }

    fn on_day_advanced(&mut self, day: u32) {
        if !self.is_boss_night_day(day) {
            if self.stage != Stage::Dormant {
                log::warn!("day {day} began while a boss encounter was still running");
            }
            self.pending_day = None;
            self.stage = Stage::Dormant;
            self.state = BossNightState {
                last_boss_night_day: self.state.last_boss_night_day,
                ..BossNightState::default()
            };
            return;
        }

        if self.state.last_boss_night_day == Some(day) {
            log::debug!("boss night for day {day} was already consumed");
            return;
        }

        self.pending_day = Some(day);
        self.state.has_spawned_this_night = false;
        self.state.defeated = false;
    }

    fn on_boss_spawned(
        &mut self,
        enemy: EnemyId,
        kind: EnemyKind,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        if self.stage != Stage::Summoning || self.state.current_boss.is_some() {
            log::debug!("despawning unexpected boss {}", enemy.get());
            out.push(Command::DespawnEnemy { enemy });
            return;
        }

        self.state.current_boss = Some(enemy);
        self.stage = Stage::Engaged;
        out_events.push(Event::BossSpawned { boss: enemy, kind });
    }

    fn resolve_defeat(&mut self, out: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        let Some(boss) = self.state.current_boss.take() else {
            return;
        };

        let day = self.state.last_boss_night_day.unwrap_or_default();
        let reward = self.config.reward_for(day);
        self.state.defeated = true;
        self.stage = Stage::Dormant;

        log::info!("boss of day {day} defeated, granting {reward} gold");
        out_events.push(Event::BossDefeated { boss });
        out.push(Command::GrantGold { amount: reward });
        out_events.push(Event::BossNightCompleted { day, reward });
    }

    fn abandon(&mut self) {
        self.pending_day = None;
        self.stage = Stage::Dormant;
        self.state.current_boss = None;
    }

    fn advance(&mut self, elapsed: Duration, view: &NightView<'_>, out: &mut Vec<Command>) {
        let Stage::Announcing { remaining } = self.stage else {
            return;
        };
        if view.phase != Phase::Night {
            return;
        }
        if elapsed < remaining {
            self.stage = Stage::Announcing {
                remaining: remaining - elapsed,
            };
            return;
        }

        if self.summon(view, out) {
            self.stage = Stage::Summoning;
        } else {
            self.stage = Stage::Announcing {
                remaining: Duration::ZERO,
            };
        }
    }

    fn summon(&mut self, view: &NightView<'_>, out: &mut Vec<Command>) -> bool {
        if view.spawn_points.is_empty() {
            log::warn!("boss spawn delayed: no spawn points registered");
            return false;
        }
        let Some(profile) = self.select_boss(view.lunar_phase) else {
            log::warn!("boss spawn skipped: the boss roster is empty");
            return false;
        };
        let spawn_point: SpawnPointId =
            view.spawn_points[self.rng.gen_range(0..view.spawn_points.len())].id;

        out.push(Command::SpawnEnemy {
            profile,
            spawn_point,
            role: EnemyRole::Boss,
        });
        true
    }

    fn select_boss(&mut self, lunar_phase: LunarPhase) -> Option<EnemyProfile> {
        let roster = &self.config.roster;
        if roster.is_empty() {
            return None;
        }

        let index = if self.config.dynamic_selection {
            let ordinal = lunar_phase.ordinal();
            if ordinal < roster.len() {
                ordinal
            } else {
                self.rng.gen_range(0..roster.len())
            }
        } else {
            self.boss_night_count.saturating_sub(1) as usize % roster.len()
        };
        roster.get(index).copied()
    }
}
