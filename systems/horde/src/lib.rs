#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adaptive horde scheduler that paces enemy spawns across a night.

use std::{collections::BTreeSet, time::Duration};

use glam::Vec2;
use nightfall_core::{
    Command, EnemyId, EnemyKind, EnemyProfile, EnemyRole, EnemySnapshot, Event, NightView, Phase,
    SpawnPoint, SpawnPointId,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FIRST_ACCELERATION_AFTER: Duration = Duration::from_secs(30);
const SECOND_ACCELERATION_AFTER: Duration = Duration::from_secs(60);
const FIRST_ACCELERATION_FACTOR: f64 = 0.9;
const SECOND_ACCELERATION_FACTOR: f64 = 0.75;
const DEFAULT_RNG_SEED: u64 = 0x6e69_6768_7466_616c;

/// Tuning knobs controlling horde size, pacing, and spawn placement.
#[derive(Clone, Debug)]
pub struct Config {
    base_enemies_per_night: u32,
    enemies_per_night_increment: u32,
    base_spawn_interval: Duration,
    spawn_interval_decrease_per_day: Duration,
    min_spawn_interval: Duration,
    warm_up_delay: Duration,
    min_player_distance: f32,
    random_spawn_points: bool,
    enemy_pool: Vec<EnemyProfile>,
    rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_enemies_per_night: 5,
            enemies_per_night_increment: 2,
            base_spawn_interval: Duration::from_secs(3),
            spawn_interval_decrease_per_day: Duration::from_millis(200),
            min_spawn_interval: Duration::from_millis(800),
            warm_up_delay: Duration::from_secs(2),
            min_player_distance: 8.0,
            random_spawn_points: true,
            enemy_pool: vec![EnemyProfile::new(EnemyKind::new(0), 30.0)],
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl Config {
    /// Creates a default configuration drawing enemies from the provided pool.
    #[must_use]
    pub fn new(enemy_pool: Vec<EnemyProfile>) -> Self {
        Self {
            enemy_pool,
            ..Self::default()
        }
    }

    /// Sets the kill target on the first night and its growth per subsequent night.
    #[must_use]
    pub fn with_enemy_counts(mut self, base: u32, increment_per_night: u32) -> Self {
        self.base_enemies_per_night = base;
        self.enemies_per_night_increment = increment_per_night;
        self
    }

    /// Sets the first-night spawn interval, its decrease per night, and its floor.
    #[must_use]
    pub fn with_spawn_intervals(
        mut self,
        base: Duration,
        decrease_per_day: Duration,
        minimum: Duration,
    ) -> Self {
        self.base_spawn_interval = base;
        self.spawn_interval_decrease_per_day = decrease_per_day;
        self.min_spawn_interval = minimum;
        self
    }

    /// Sets the delay between the horde starting and the first spawn.
    #[must_use]
    pub fn with_warm_up_delay(mut self, delay: Duration) -> Self {
        self.warm_up_delay = delay;
        self
    }

    /// Sets the radius around the player that random spawn selection avoids.
    #[must_use]
    pub fn with_min_player_distance(mut self, distance: f32) -> Self {
        self.min_player_distance = distance;
        self
    }

    /// Chooses between random spawn selection and round-robin.
    #[must_use]
    pub fn with_random_spawn_points(mut self, enabled: bool) -> Self {
        self.random_spawn_points = enabled;
        self
    }

    /// Seeds the generator used for spawn point and enemy selection.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Enemy templates the horde draws from.
    #[must_use]
    pub fn enemy_pool(&self) -> &[EnemyProfile] {
        &self.enemy_pool
    }

    /// Lower bound applied to the per-night spawn interval.
    #[must_use]
    pub const fn min_spawn_interval(&self) -> Duration {
        self.min_spawn_interval
    }

    /// Number of kills required to clear the horde on the provided day.
    #[must_use]
    pub fn target_kill_count(&self, day: u32) -> u32 {
        let nights_survived = day.saturating_sub(1);
        self.base_enemies_per_night
            .saturating_add(nights_survived.saturating_mul(self.enemies_per_night_increment))
    }

    /// Base interval between spawns on the provided day, floored at the minimum.
    #[must_use]
    pub fn spawn_interval(&self, day: u32) -> Duration {
        let nights_survived = day.saturating_sub(1);
        let decrease = self
            .spawn_interval_decrease_per_day
            .saturating_mul(nights_survived);
        self.base_spawn_interval
            .saturating_sub(decrease)
            .max(self.min_spawn_interval)
    }
}

/// Interval to wait before the next spawn once `elapsed` of the horde has passed.
///
/// Pacing tightens in two steps: ten percent after thirty seconds and a
/// quarter after a minute.
#[must_use]
pub fn adjusted_interval(interval: Duration, elapsed: Duration) -> Duration {
    if elapsed > SECOND_ACCELERATION_AFTER {
        interval.mul_f64(SECOND_ACCELERATION_FACTOR)
    } else if elapsed > FIRST_ACCELERATION_AFTER {
        interval.mul_f64(FIRST_ACCELERATION_FACTOR)
    } else {
        interval
    }
}

/// Per-night aggregate tracking the horde's spawn and kill counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HordeSession {
    day: u32,
    target_kill_count: u32,
    spawned_count: u32,
    killed_count: u32,
    current_spawn_interval: Duration,
    elapsed_horde_time: Duration,
    active_enemies: BTreeSet<EnemyId>,
    completed: bool,
}

impl HordeSession {
    fn new(day: u32, target_kill_count: u32, current_spawn_interval: Duration) -> Self {
        Self {
            day,
            target_kill_count,
            spawned_count: 0,
            killed_count: 0,
            current_spawn_interval,
            elapsed_horde_time: Duration::ZERO,
            active_enemies: BTreeSet::new(),
            completed: false,
        }
    }

    /// Day index the session belongs to.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Number of kills required to clear the horde.
    #[must_use]
    pub const fn target_kill_count(&self) -> u32 {
        self.target_kill_count
    }

    /// Number of spawns requested so far.
    #[must_use]
    pub const fn spawned_count(&self) -> u32 {
        self.spawned_count
    }

    /// Number of horde enemies that died so far.
    #[must_use]
    pub const fn killed_count(&self) -> u32 {
        self.killed_count
    }

    /// Base spawn interval computed for the night.
    #[must_use]
    pub const fn current_spawn_interval(&self) -> Duration {
        self.current_spawn_interval
    }

    /// Game time the spawn loop has run for.
    #[must_use]
    pub const fn elapsed_horde_time(&self) -> Duration {
        self.elapsed_horde_time
    }

    /// Live enemies spawned by this session.
    #[must_use]
    pub fn active_enemies(&self) -> &BTreeSet<EnemyId> {
        &self.active_enemies
    }

    /// Reports whether the session was finalized.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Kills still required to clear the horde.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.target_kill_count.saturating_sub(self.killed_count)
    }

    /// Fraction of the kill target reached, within `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.target_kill_count == 0 {
            return if self.completed { 1.0 } else { 0.0 };
        }
        (self.killed_count as f32 / self.target_kill_count as f32).clamp(0.0, 1.0)
    }

    fn progress_event(&self) -> Event {
        Event::HordeProgress {
            killed: self.killed_count,
            target: self.target_kill_count,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpawnLoop {
    Idle,
    Spawning { wait: Duration },
}

/// Pure system owning the nightly spawn loop and its completion detection.
#[derive(Debug)]
pub struct HordeScheduler {
    config: Config,
    rng: ChaCha8Rng,
    session: Option<HordeSession>,
    spawn_loop: SpawnLoop,
    next_spawn_point: usize,
    boss_engaged: bool,
}

impl Default for HordeScheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl HordeScheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            session: None,
            spawn_loop: SpawnLoop::Idle,
            next_spawn_point: 0,
            boss_engaged: false,
        }
    }

    /// Configuration the scheduler was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Session of the current or most recent night, if any.
    #[must_use]
    pub fn session(&self) -> Option<&HordeSession> {
        self.session.as_ref()
    }

    /// Reports whether the spawn loop is running.
    #[must_use]
    pub fn is_spawning(&self) -> bool {
        matches!(self.spawn_loop, SpawnLoop::Spawning { .. })
    }

    /// Kills still required to clear the current horde.
    #[must_use]
    pub fn remaining_enemies(&self) -> u32 {
        self.session.as_ref().map_or(0, HordeSession::remaining)
    }

    /// Fraction of the current horde's kill target reached, within `[0, 1]`.
    #[must_use]
    pub fn horde_progress(&self) -> f32 {
        self.session.as_ref().map_or(0.0, HordeSession::progress)
    }

    /// Consumes world events and the night view to drive the spawn loop.
    ///
    /// Deaths in `events` are booked before any time in `events` is spent on
    /// spawning, so completion is always detected ahead of the next spawn.
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
                Event::NightBegan { .. } => {
                    let _ = self.start_continuous_horde(view, out_events);
                }
                Event::EnemySpawned {
                    enemy,
                    role: EnemyRole::Horde,
                    ..
                } => self.register_spawn(*enemy, out),
                Event::EnemyDied { enemy, .. } | Event::EnemyDespawned { enemy, .. } => {
                    self.record_death(*enemy, out, out_events);
                }
                Event::BossNightStarted { .. } => self.boss_engaged = true,
                Event::BossNightCompleted { .. } => {
                    self.boss_engaged = false;
                    let _ = self.end_night(view, out, out_events);
                }
                Event::BossNightAborted { .. } => {
                    self.boss_engaged = false;
                    self.check_completion(out, out_events);
                }
                Event::PhaseChanged {
                    to: Phase::Night, ..
                } => self.retire_finished_session(),
                Event::PhaseChanged { to, .. } if to.abandons_session() => self.abandon(),
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                _ => {}
            }
        }

        if !elapsed.is_zero() {
            self.advance(elapsed, view, out, out_events);
        }
    }

    /// Starts a fresh horde for the current day.
    ///
    /// Rejected unless the phase is [`Phase::Night`] and the enemy pool is
    /// populated. Any running loop is cancelled first.
    pub fn start_continuous_horde(
        &mut self,
        view: &NightView<'_>,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if view.phase != Phase::Night {
            log::debug!("horde start rejected outside the night (phase {:?})", view.phase);
            return false;
        }
        if self.config.enemy_pool.is_empty() {
            log::warn!("horde start declined: the enemy pool is empty");
            return false;
        }

        self.cancel();
        let day = view.day;
        let target = self.config.target_kill_count(day);
        let interval = self.config.spawn_interval(day);
        self.session = Some(HordeSession::new(day, target, interval));
        self.spawn_loop = SpawnLoop::Spawning {
            wait: self.config.warm_up_delay,
        };

        log::info!("horde for day {day} started: {target} enemies every {interval:?}");
        out_events.push(Event::HordeStarted {
            day,
            target,
            interval,
        });
        true
    }

    /// Force-skips the night: ends every live horde enemy and finalizes the session.
    ///
    /// A no-op outside [`Phase::Night`] or once this night's session was finalized.
    /// A session finished on an earlier night is retired when the night is re-entered.
    pub fn end_night(
        &mut self,
        view: &NightView<'_>,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if view.phase != Phase::Night {
            log::debug!("end of night rejected outside the night (phase {:?})", view.phase);
            return false;
        }

        let interval = self.config.spawn_interval(view.day);
        let session = self
            .session
            .get_or_insert_with(|| HordeSession::new(view.day, 0, interval));
        if session.completed {
            log::debug!("end of night ignored: horde already finalized");
            return false;
        }

        for enemy in std::mem::take(&mut session.active_enemies) {
            book_death(session, out_events);
            let damageable = view
                .enemies
                .get(enemy)
                .map_or(true, EnemySnapshot::is_damageable);
            if damageable {
                out.push(Command::KillEnemy { enemy });
            } else {
                out.push(Command::DespawnEnemy { enemy });
            }
        }
        session.killed_count = session.target_kill_count;

        self.finalize(out, out_events);
        true
    }

    /// Stops the spawn loop. Calling it while idle is a no-op.
    pub fn cancel(&mut self) {
        self.spawn_loop = SpawnLoop::Idle;
    }

    fn abandon(&mut self) {
        self.cancel();
        self.session = None;
        self.boss_engaged = false;
    }

    fn register_spawn(&mut self, enemy: EnemyId, out: &mut Vec<Command>) {
        match self.session.as_mut() {
            Some(session) if !session.completed => {
                let _ = session.active_enemies.insert(enemy);
            }
            Some(_) => {
                log::debug!("despawning straggler {} after the horde ended", enemy.get());
                out.push(Command::DespawnEnemy { enemy });
            }
            None => log::debug!("untracked horde enemy {} spawned outside a night", enemy.get()),
        }
    }

    fn record_death(
        &mut self,
        enemy: EnemyId,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.active_enemies.remove(&enemy) {
            return;
        }

        book_death(session, out_events);
        self.check_completion(out, out_events);
    }

    /// Drops a session finalized on an earlier night once the night is entered again.
    fn retire_finished_session(&mut self) {
        if self.session.as_ref().is_some_and(|session| session.completed) {
            log::debug!("retiring the finished horde as a new night begins");
            self.session = None;
        }
    }

    fn check_completion(&mut self, out: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.completed
            || session.killed_count < session.target_kill_count
            || !session.active_enemies.is_empty()
        {
            return;
        }
        if self.boss_engaged {
            log::debug!("horde cleared; the night stays open until the boss falls");
            return;
        }

        self.finalize(out, out_events);
    }

    fn finalize(&mut self, out: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.completed {
            return;
        }

        session.completed = true;
        let day = session.day;
        self.cancel();
        self.boss_engaged = false;

        log::info!("horde for day {day} finished");
        out.push(Command::SetPhase {
            phase: Phase::Digging,
        });
        out_events.push(Event::HordeEnded { day });
    }

    fn advance(
        &mut self,
        elapsed: Duration,
        view: &NightView<'_>,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let SpawnLoop::Spawning { mut wait } = self.spawn_loop else {
            return;
        };
        if view.phase != Phase::Night {
            return;
        }

        let mut budget = elapsed;
        loop {
            let Some(session) = self.session.as_mut() else {
                self.cancel();
                return;
            };

            if budget < wait {
                session.elapsed_horde_time = session.elapsed_horde_time.saturating_add(budget);
                self.spawn_loop = SpawnLoop::Spawning {
                    wait: wait - budget,
                };
                return;
            }
            budget -= wait;
            session.elapsed_horde_time = session.elapsed_horde_time.saturating_add(wait);

            if session.spawned_count < session.target_kill_count
                && !self.spawn_one(view, out, out_events)
            {
                self.spawn_loop = SpawnLoop::Spawning {
                    wait: self.config.spawn_interval(view.day),
                };
                return;
            }

            let Some(session) = self.session.as_ref() else {
                self.cancel();
                return;
            };
            if session.spawned_count >= session.target_kill_count {
                self.cancel();
                self.check_completion(out, out_events);
                return;
            }
            wait = adjusted_interval(session.current_spawn_interval, session.elapsed_horde_time);
        }
    }

    fn spawn_one(
        &mut self,
        view: &NightView<'_>,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(spawn_point) = select_spawn_point(
            &self.config,
            &mut self.rng,
            &mut self.next_spawn_point,
            view.spawn_points,
            view.player_position,
        ) else {
            log::warn!("horde spawn skipped: no spawn points registered");
            return false;
        };
        if self.config.enemy_pool.is_empty() {
            return false;
        }
        let profile = self.config.enemy_pool[self.rng.gen_range(0..self.config.enemy_pool.len())];

        let Some(session) = self.session.as_mut() else {
            return false;
        };
        out.push(Command::SpawnEnemy {
            profile,
            spawn_point,
            role: EnemyRole::Horde,
        });
        session.spawned_count = session.spawned_count.saturating_add(1);
        out_events.push(session.progress_event());
        true
    }
}

fn book_death(session: &mut HordeSession, out_events: &mut Vec<Event>) {
    session.killed_count = session.killed_count.saturating_add(1);
    out_events.push(session.progress_event());
}

fn select_spawn_point(
    config: &Config,
    rng: &mut ChaCha8Rng,
    cursor: &mut usize,
    points: &[SpawnPoint],
    player: Vec2,
) -> Option<SpawnPointId> {
    if points.is_empty() {
        return None;
    }

    if !config.random_spawn_points {
        let point = &points[*cursor % points.len()];
        *cursor = (*cursor + 1) % points.len();
        return Some(point.id);
    }

    let distant: Vec<&SpawnPoint> = points
        .iter()
        .filter(|point| point.position.distance(player) >= config.min_player_distance)
        .collect();
    let candidates: Vec<&SpawnPoint> = if distant.is_empty() {
        points.iter().collect()
    } else {
        distant
    };
    Some(candidates[rng.gen_range(0..candidates.len())].id)
}

#[cfg(test)]
mod tests {
    use nightfall_core::{EnemyView, LunarPhase};

    use super::*;

    fn point(id: u32, x: f32) -> SpawnPoint {
        SpawnPoint {
            id: SpawnPointId::new(id),
            name: format!("point-{id}"),
            position: Vec2::new(x, 0.0),
        }
    }

    fn view(phase: Phase, day: u32, points: &[SpawnPoint]) -> NightView<'_> {
        NightView {
            phase,
            day,
            lunar_phase: LunarPhase::New,
            spawn_points: points,
            player_position: Vec2::ZERO,
            home_health: 100.0,
            enemies: EnemyView::default(),
        }
    }

    #[test]
    fn kill_target_grows_linearly_per_night() {
        let config = Config::default().with_enemy_counts(5, 2);

        assert_eq!(config.target_kill_count(1), 5);
        assert_eq!(config.target_kill_count(2), 7);
        assert_eq!(config.target_kill_count(10), 23);
        assert_eq!(config.target_kill_count(0), 5);
    }

    #[test]
    fn spawn_interval_shrinks_to_its_floor() {
        let config = Config::default().with_spawn_intervals(
            Duration::from_secs(3),
            Duration::from_millis(500),
            Duration::from_secs(1),
        );

        assert_eq!(config.spawn_interval(1), Duration::from_secs(3));
        assert_eq!(config.spawn_interval(2), Duration::from_millis(2_500));
        assert_eq!(config.spawn_interval(5), Duration::from_secs(1));
        assert_eq!(config.spawn_interval(40), Duration::from_secs(1));
    }

    #[test]
    fn adjusted_interval_steps_at_thirty_and_sixty_seconds() {
        let interval = Duration::from_secs(2);

        assert_eq!(adjusted_interval(interval, Duration::from_secs(30)), interval);
        assert_eq!(
            adjusted_interval(interval, Duration::from_millis(30_001)),
            Duration::from_millis(1_800)
        );
        assert_eq!(
            adjusted_interval(interval, Duration::from_secs(60)),
            Duration::from_millis(1_800)
        );
        assert_eq!(
            adjusted_interval(interval, Duration::from_secs(61)),
            Duration::from_millis(1_500)
        );
    }

    #[test]
    fn random_selection_prefers_points_away_from_the_player() {
        let config = Config::default().with_min_player_distance(5.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut cursor = 0;
        let points = [point(0, 1.0), point(1, 20.0), point(2, 2.0)];

        for _ in 0..32 {
            let selected =
                select_spawn_point(&config, &mut rng, &mut cursor, &points, Vec2::ZERO);
            assert_eq!(selected, Some(SpawnPointId::new(1)));
        }
    }

    #[test]
    fn random_selection_falls_back_to_every_point() {
        let config = Config::default().with_min_player_distance(100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut cursor = 0;
        let points = [point(0, 1.0), point(1, 2.0)];

        let selected = select_spawn_point(&config, &mut rng, &mut cursor, &points, Vec2::ZERO);

        assert!(selected.is_some());
    }

    #[test]
    fn round_robin_cycles_through_points() {
        let config = Config::default().with_random_spawn_points(false);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut cursor = 0;
        let points = [point(0, 1.0), point(1, 2.0), point(2, 3.0)];

        let order: Vec<_> = (0..4)
            .filter_map(|_| {
                select_spawn_point(&config, &mut rng, &mut cursor, &points, Vec2::ZERO)
            })
            .map(|id| id.get())
            .collect();

        assert_eq!(order, vec![0, 1, 2, 0]);
        assert_eq!(
            select_spawn_point(&config, &mut rng, &mut cursor, &[], Vec2::ZERO),
            None
        );
    }

    #[test]
    fn horde_start_is_rejected_outside_the_night() {
        let mut scheduler = HordeScheduler::default();
        let mut notices = Vec::new();

        assert!(!scheduler.start_continuous_horde(&view(Phase::Digging, 1, &[]), &mut notices));
        assert!(notices.is_empty());
        assert!(scheduler.session().is_none());
        assert!(!scheduler.is_spawning());
    }

    #[test]
    fn horde_start_is_declined_without_an_enemy_pool() {
        let mut scheduler = HordeScheduler::new(Config::new(Vec::new()));
        let mut notices = Vec::new();

        assert!(!scheduler.start_continuous_horde(&view(Phase::Night, 1, &[]), &mut notices));
        assert!(notices.is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut scheduler = HordeScheduler::default();
        scheduler.cancel();
        scheduler.cancel();
        assert!(!scheduler.is_spawning());

        let mut notices = Vec::new();
        assert!(scheduler.start_continuous_horde(&view(Phase::Night, 1, &[]), &mut notices));
        assert!(scheduler.is_spawning());
        scheduler.cancel();
        scheduler.cancel();
        assert!(!scheduler.is_spawning());
    }

    #[test]
    fn reentering_the_night_lets_end_night_finalize_again() {
        let mut scheduler = HordeScheduler::default();
        let night = view(Phase::Night, 3, &[]);
        let entered = [Event::PhaseChanged {
            from: Phase::Digging,
            to: Phase::Night,
        }];

        for _ in 0..2 {
            let mut commands = Vec::new();
            let mut notices = Vec::new();
            scheduler.handle(&entered, &night, &mut commands, &mut notices);

            assert!(scheduler.end_night(&night, &mut commands, &mut notices));
            assert!(notices.contains(&Event::HordeEnded { day: 3 }));
            assert!(scheduler.session().is_some_and(HordeSession::is_completed));
        }

        let mut commands = Vec::new();
        let mut notices = Vec::new();
        assert!(!scheduler.end_night(&night, &mut commands, &mut notices));
        assert!(notices.is_empty());
    }

    #[test]
    fn progress_is_zero_before_any_horde() {
        let scheduler = HordeScheduler::default();

        assert_eq!(scheduler.remaining_enemies(), 0);
        assert_eq!(scheduler.horde_progress(), 0.0);
    }
}
