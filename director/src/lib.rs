#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Day/night orchestration for Nightfall.
//!
//! The [`Director`] owns the world and the nocturnal systems. Every inbound
//! operation turns into commands and notices that are pumped until the
//! event cascade settles, so callers always observe a consistent state.

use std::time::Duration;

use nightfall_core::{
    Command, EnemyProfile, Event, Phase, Subscribers, SubscriptionId, TributeAward,
};
use nightfall_system_boss::{self as boss, BossEncounterController};
use nightfall_system_horde::{self as horde, HordeScheduler};
use nightfall_system_tribute::{self as tribute, RewardAuditor};
use nightfall_world::{self as world, query, World};
use thiserror::Error;

const DEFAULT_HOME_HEALTH: f32 = 100.0;
const DEFAULT_MAX_CASCADE: usize = 64;

/// Errors raised when a director configuration is unusable.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The horde could spawn with no delay between enemies.
    #[error("minimum spawn interval must be greater than zero")]
    ZeroSpawnInterval,
    /// Boss nights would never recur.
    #[error("boss night interval must be at least one day")]
    ZeroBossInterval,
    /// The home would start the run already destroyed.
    #[error("home health must be positive (got {value:.2})")]
    NonPositiveHomeHealth {
        /// Rejected health value.
        value: f32,
    },
    /// An enemy template would spawn dead.
    #[error("enemy kind {kind} must start with positive health (got {value:.2})")]
    NonPositiveEnemyHealth {
        /// Kind of the offending template.
        kind: u32,
        /// Rejected health value.
        value: f32,
    },
    /// The pump could not process a single batch.
    #[error("cascade limit must allow at least one pump iteration")]
    ZeroCascadeLimit,
}

/// Complete configuration of a director and the systems it drives.
#[derive(Clone, Debug)]
pub struct Config {
    horde: horde::Config,
    boss: boss::Config,
    tribute: tribute::Config,
    home_health: f32,
    max_cascade: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            horde: horde::Config::default(),
            boss: boss::Config::default(),
            tribute: tribute::Config::default(),
            home_health: DEFAULT_HOME_HEALTH,
            max_cascade: DEFAULT_MAX_CASCADE,
        }
    }
}

impl Config {
    /// Replaces the horde configuration.
    #[must_use]
    pub fn with_horde(mut self, horde: horde::Config) -> Self {
        self.horde = horde;
        self
    }

    /// Replaces the boss configuration.
    #[must_use]
    pub fn with_boss(mut self, boss: boss::Config) -> Self {
        self.boss = boss;
        self
    }

    /// Replaces the tribute configuration.
    #[must_use]
    pub fn with_tribute(mut self, tribute: tribute::Config) -> Self {
        self.tribute = tribute;
        self
    }

    /// Sets the health the home starts the run with.
    #[must_use]
    pub fn with_home_health(mut self, health: f32) -> Self {
        self.home_health = health;
        self
    }

    /// Caps the number of pump iterations a single operation may trigger.
    #[must_use]
    pub fn with_max_cascade(mut self, limit: usize) -> Self {
        self.max_cascade = limit;
        self
    }

    /// Horde configuration.
    #[must_use]
    pub fn horde(&self) -> &horde::Config {
        &self.horde
    }

    /// Boss configuration.
    #[must_use]
    pub fn boss(&self) -> &boss::Config {
        &self.boss
    }

    /// Tribute configuration.
    #[must_use]
    pub const fn tribute(&self) -> &tribute::Config {
        &self.tribute
    }

    /// Checks the invariants the director relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horde.min_spawn_interval().is_zero() {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        if self.boss.boss_night_interval() == 0 {
            return Err(ConfigError::ZeroBossInterval);
        }
        if self.home_health.is_nan() || self.home_health <= 0.0 {
            return Err(ConfigError::NonPositiveHomeHealth {
                value: self.home_health,
            });
        }
        if self.max_cascade == 0 {
            return Err(ConfigError::ZeroCascadeLimit);
        }

        self.horde
            .enemy_pool()
            .iter()
            .chain(self.boss.roster())
            .try_for_each(validate_profile)
    }
}

fn validate_profile(profile: &EnemyProfile) -> Result<(), ConfigError> {
    match profile.max_health {
        Some(value) if value.is_nan() || value <= 0.0 => Err(ConfigError::NonPositiveEnemyHealth {
            kind: profile.kind.get(),
            value,
        }),
        _ => Ok(()),
    }
}

/// Owns the world and orchestrates the nocturnal systems at phase boundaries.
#[derive(Debug)]
pub struct Director {
    world: World,
    horde: HordeScheduler,
    boss: BossEncounterController,
    tribute: RewardAuditor,
    subscribers: Subscribers,
    max_cascade: usize,
}

impl Director {
    /// Creates a director after validating the configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let Config {
            horde,
            boss,
            tribute,
            home_health,
            max_cascade,
        } = config;
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureHome {
                health: home_health,
            },
            &mut events,
        );

        Ok(Self {
            world,
            horde: HordeScheduler::new(horde),
            boss: BossEncounterController::new(boss),
            tribute: RewardAuditor::new(tribute),
            subscribers: Subscribers::new(),
            max_cascade,
        })
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Horde scheduler driven by the director.
    #[must_use]
    pub fn horde(&self) -> &HordeScheduler {
        &self.horde
    }

    /// Boss controller driven by the director.
    #[must_use]
    pub fn boss(&self) -> &BossEncounterController {
        &self.boss
    }

    /// Tribute auditor driven by the director.
    #[must_use]
    pub fn tribute(&self) -> &RewardAuditor {
        &self.tribute
    }

    /// Registers a listener for every event the director processes.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    /// Removes a listener, returning `false` when the handle is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Applies an arbitrary world command and settles its consequences.
    pub fn submit(&mut self, command: Command) {
        self.dispatch(vec![command], Vec::new());
    }

    /// Advances the simulation by `dt` of wall-clock time.
    pub fn tick(&mut self, dt: Duration) {
        self.submit(Command::Tick { dt });
    }

    /// Requests a transition to `phase`. Re-entering the current phase is silent.
    pub fn set_phase(&mut self, phase: Phase) {
        self.submit(Command::SetPhase { phase });
    }

    /// Phase currently active.
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Day counter value.
    #[must_use]
    pub fn current_day(&self) -> u32 {
        query::current_day(&self.world)
    }

    /// Starts a new day without advancing the day counter.
    pub fn start_day_cycle(&mut self) {
        self.submit(Command::StartDayCycle);
    }

    /// Advances the day counter and begins the night.
    pub fn transition_to_night(&mut self) {
        self.submit(Command::TransitionToNight);
    }

    /// Restarts the horde for the current night.
    pub fn start_continuous_horde(&mut self) -> bool {
        let mut notices = Vec::new();
        let started = {
            let view = query::night_view(&self.world);
            self.horde.start_continuous_horde(&view, &mut notices)
        };
        self.dispatch(Vec::new(), notices);
        started
    }

    /// Force-skips the night, ending the boss encounter and the horde.
    ///
    /// A no-op outside [`Phase::Night`].
    pub fn end_night(&mut self) -> bool {
        if self.current_phase() != Phase::Night {
            log::debug!("end of night rejected outside the night");
            return false;
        }

        let mut commands = Vec::new();
        let mut notices = Vec::new();
        let ended = {
            let view = query::night_view(&self.world);
            let boss_ended = self
                .boss
                .force_end_boss_night(&view, &mut commands, &mut notices);
            let horde_ended = self.horde.end_night(&view, &mut commands, &mut notices);
            boss_ended || horde_ended
        };
        self.dispatch(commands, notices);
        ended
    }

    /// Kills still required to clear the current horde.
    #[must_use]
    pub fn remaining_enemies(&self) -> u32 {
        self.horde.remaining_enemies()
    }

    /// Fraction of the current horde's kill target reached, within `[0, 1]`.
    #[must_use]
    pub fn horde_progress(&self) -> f32 {
        self.horde.horde_progress()
    }

    /// Starts the armed boss night, if any.
    pub fn start_boss_night(&mut self) -> bool {
        let mut notices = Vec::new();
        let started = self.boss.start_boss_night(&mut notices);
        self.dispatch(Vec::new(), notices);
        started
    }

    /// Ends the running boss encounter early.
    pub fn force_end_boss_night(&mut self) -> bool {
        let mut commands = Vec::new();
        let mut notices = Vec::new();
        let ended = {
            let view = query::night_view(&self.world);
            self.boss
                .force_end_boss_night(&view, &mut commands, &mut notices)
        };
        self.dispatch(commands, notices);
        ended
    }

    /// Reports whether `day` hosts a boss night.
    #[must_use]
    pub fn is_boss_night_day(&self, day: u32) -> bool {
        self.boss.is_boss_night_day(day)
    }

    /// Starts auditing the current night from the home's present health.
    pub fn start_night_evaluation(&mut self) {
        self.tribute
            .start_night_evaluation(query::home_health(&self.world));
    }

    /// Records that one of the player's plants was destroyed.
    pub fn notify_plant_destroyed(&mut self) {
        self.submit(Command::DestroyPlant);
    }

    /// Records that the player took damage.
    pub fn notify_player_damaged(&mut self) {
        self.tribute.notify_player_damaged();
    }

    /// Settles the audited night and grants the tribute.
    pub fn evaluate_and_grant_reward(&mut self) -> Option<TributeAward> {
        let mut commands = Vec::new();
        let mut notices = Vec::new();
        let award = self.tribute.evaluate_and_grant_reward(
            query::home_health(&self.world),
            &mut commands,
            &mut notices,
        );
        self.dispatch(commands, notices);
        award
    }

    fn dispatch(&mut self, commands: Vec<Command>, mut events: Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut iterations = 0;
        while !events.is_empty() {
            if iterations == self.max_cascade {
                log::error!(
                    "event cascade exceeded {} iterations; dropping {} events",
                    self.max_cascade,
                    events.len()
                );
                return;
            }
            iterations += 1;

            self.subscribers.publish(&events);

            let mut commands = Vec::new();
            let mut notices = Vec::new();
            {
                let view = query::night_view(&self.world);
                self.tribute
                    .handle(&events, &view, &mut commands, &mut notices);
                self.boss.handle(&events, &view, &mut commands, &mut notices);
                self.horde.handle(&events, &view, &mut commands, &mut notices);
            }

            if events
                .iter()
                .any(|event| matches!(event, Event::HordeEnded { .. }))
            {
                commands.push(Command::StartDayCycle);
            }

            events = notices;
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nightfall_core::EnemyKind;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn zero_minimum_spawn_interval_is_rejected() {
        let config = Config::default().with_horde(horde::Config::default().with_spawn_intervals(
            Duration::from_secs(1),
            Duration::ZERO,
            Duration::ZERO,
        ));

        assert_eq!(config.validate(), Err(ConfigError::ZeroSpawnInterval));
    }

    #[test]
    fn zero_boss_interval_is_rejected() {
        let config = Config::default()
            .with_boss(boss::Config::default().with_boss_night_interval(0));

        assert_eq!(config.validate(), Err(ConfigError::ZeroBossInterval));
    }

    #[test]
    fn dead_home_is_rejected() {
        let config = Config::default().with_home_health(0.0);

        assert!(matches!(
            Director::new(config),
            Err(ConfigError::NonPositiveHomeHealth { .. })
        ));
        assert!(Config::default()
            .with_home_health(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn dead_enemy_templates_are_rejected() {
        let config = Config::default().with_boss(boss::Config::new(vec![EnemyProfile::new(
            EnemyKind::new(4),
            -1.0,
        )]));

        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveEnemyHealth {
                kind: 4,
                value: -1.0
            })
        );
    }

    #[test]
    fn healthless_templates_are_accepted() {
        let config = Config::default().with_horde(horde::Config::new(vec![
            EnemyProfile::without_health(EnemyKind::new(2)),
        ]));

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_cascade_limit_is_rejected() {
        let config = Config::default().with_max_cascade(0);

        assert_eq!(config.validate(), Err(ConfigError::ZeroCascadeLimit));
    }

    #[test]
    fn errors_render_the_offending_value() {
        let error = ConfigError::NonPositiveHomeHealth { value: -3.0 };

        assert_eq!(error.to_string(), "home health must be positive (got -3.00)");
    }
}
