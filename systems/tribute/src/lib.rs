#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! End-of-night tribute audit rewarding a clean defence.

use nightfall_core::{Command, Event, NightView, TributeAward};

/// Gold granted for each clean outcome of a night.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    reward_no_plants_destroyed: u32,
    reward_home_untouched: u32,
    reward_player_unharmed: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(30, 50, 20)
    }
}

impl Config {
    /// Creates a configuration from the three bonus amounts.
    #[must_use]
    pub const fn new(
        reward_no_plants_destroyed: u32,
        reward_home_untouched: u32,
        reward_player_unharmed: u32,
    ) -> Self {
        Self {
            reward_no_plants_destroyed,
            reward_home_untouched,
            reward_player_unharmed,
        }
    }

    /// Bonus for a night without destroyed plants.
    #[must_use]
    pub const fn reward_no_plants_destroyed(&self) -> u32 {
        self.reward_no_plants_destroyed
    }

    /// Bonus for a night the home came through unscathed.
    #[must_use]
    pub const fn reward_home_untouched(&self) -> u32 {
        self.reward_home_untouched
    }

    /// Bonus for a night without player damage.
    #[must_use]
    pub const fn reward_player_unharmed(&self) -> u32 {
        self.reward_player_unharmed
    }
}

/// Observations gathered between the start and the end of a night.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TributeRecord {
    home_health_at_night_start: f32,
    any_plant_destroyed: bool,
    player_took_damage: bool,
}

impl TributeRecord {
    /// Home health captured when the night began.
    #[must_use]
    pub const fn home_health_at_night_start(&self) -> f32 {
        self.home_health_at_night_start
    }

    /// Reports whether a plant was destroyed during the night.
    #[must_use]
    pub const fn any_plant_destroyed(&self) -> bool {
        self.any_plant_destroyed
    }

    /// Reports whether the player took damage during the night.
    #[must_use]
    pub const fn player_took_damage(&self) -> bool {
        self.player_took_damage
    }
}

/// Pure system auditing each night and paying out the tribute.
#[derive(Debug, Default)]
pub struct RewardAuditor {
    config: Config,
    record: Option<TributeRecord>,
}

impl RewardAuditor {
    /// Creates an auditor using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            record: None,
        }
    }

    /// Configuration the auditor was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Record of the night under evaluation, if any.
    #[must_use]
    pub const fn record(&self) -> Option<&TributeRecord> {
        self.record.as_ref()
    }

    /// Consumes world events to follow the night and settle it when the horde ends.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: &NightView<'_>,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        for event in events {
            match event {
                Event::NightBegan { .. } => self.start_night_evaluation(view.home_health),
                Event::PlantDestroyed => self.notify_plant_destroyed(),
                Event::PlayerDamaged { .. } => self.notify_player_damaged(),
                Event::HordeEnded { .. } => {
                    let _ = self.evaluate_and_grant_reward(view.home_health, out, out_events);
                }
                _ => {}
            }
        }
    }

    /// Captures the home's health and clears both outcome flags.
    pub fn start_night_evaluation(&mut self, home_health: f32) {
        self.record = Some(TributeRecord {
            home_health_at_night_start: home_health,
            any_plant_destroyed: false,
            player_took_damage: false,
        });
    }

    /// Marks the current night as having lost a plant.
    pub fn notify_plant_destroyed(&mut self) {
        if let Some(record) = self.record.as_mut() {
            record.any_plant_destroyed = true;
        }
    }

    /// Marks the current night as having hurt the player.
    pub fn notify_player_damaged(&mut self) {
        if let Some(record) = self.record.as_mut() {
            record.player_took_damage = true;
        }
    }

    /// Settles the night, granting the earned bonuses as one gold payment.
    ///
    /// Returns `None` without side effects when no evaluation was started.
    pub fn evaluate_and_grant_reward(
        &mut self,
        current_home_health: f32,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> Option<TributeAward> {
        let Some(record) = self.record.take() else {
            log::debug!("tribute evaluation skipped: no night is being audited");
            return None;
        };

        let earned = |clean: bool, reward: u32| if clean { reward } else { 0 };
        let award = TributeAward {
            no_plants_destroyed: earned(
                !record.any_plant_destroyed,
                self.config.reward_no_plants_destroyed,
            ),
            home_untouched: earned(
                approximately(current_home_health, record.home_health_at_night_start),
                self.config.reward_home_untouched,
            ),
            player_unharmed: earned(
                !record.player_took_damage,
                self.config.reward_player_unharmed,
            ),
        };

        let total = award.total();
        log::info!("night tribute settled: {total} gold ({award:?})");
        if total > 0 {
            out.push(Command::GrantGold { amount: total });
        }
        out_events.push(Event::TributeEvaluated { award });
        Some(award)
    }
}

fn approximately(a: f32, b: f32) -> bool {
    let tolerance = (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0);
    (a - b).abs() < tolerance
}
