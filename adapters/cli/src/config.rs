//! TOML scenario files describing the systems and the map of a headless run.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use nightfall_core::EnemyProfile;
use nightfall_director::Config;
use nightfall_system_boss as boss;
use nightfall_system_horde as horde;
use nightfall_system_tribute as tribute;
use serde::Deserialize;

/// Everything needed to boot a director and lay out its map.
#[derive(Clone, Debug)]
pub(crate) struct Scenario {
    pub(crate) config: Config,
    pub(crate) spawn_points: Vec<(String, Vec2)>,
    pub(crate) markers: Vec<String>,
}

impl Scenario {
    /// Default systems with four gates around the origin.
    pub(crate) fn fallback(seed: Option<u64>) -> Result<Self> {
        ScenarioFile::default().into_scenario(seed)
    }
}

/// Reads and resolves the scenario at `path`.
pub(crate) fn load(path: &Path, seed: Option<u64>) -> Result<Scenario> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario at {}", path.display()))?;
    parse(&contents, seed).with_context(|| format!("invalid scenario {}", path.display()))
}

/// Parses a scenario from TOML text, overriding the generator seeds when `seed` is set.
pub(crate) fn parse(contents: &str, seed: Option<u64>) -> Result<Scenario> {
    let file: ScenarioFile =
        toml::from_str(contents).context("failed to parse scenario toml contents")?;
    file.into_scenario(seed)
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScenarioFile {
    home_health: f32,
    max_cascade: usize,
    seed: u64,
    horde: HordeSection,
    boss: BossSection,
    tribute: TributeSection,
    spawn_points: Vec<SpawnPointEntry>,
    markers: Vec<String>,
}

impl Default for ScenarioFile {
    fn default() -> Self {
        let gates = [
            ("north", [0.0, 20.0]),
            ("east", [20.0, 0.0]),
            ("south", [0.0, -20.0]),
            ("west", [-20.0, 0.0]),
        ];
        Self {
            home_health: 100.0,
            max_cascade: 64,
            seed: 0x6e69_6768_7466_616c,
            horde: HordeSection::default(),
            boss: BossSection::default(),
            tribute: TributeSection::default(),
            spawn_points: gates
                .into_iter()
                .map(|(name, position)| SpawnPointEntry {
                    name: name.to_owned(),
                    position,
                })
                .collect(),
            markers: Vec::new(),
        }
    }
}

impl ScenarioFile {
    fn into_scenario(self, seed: Option<u64>) -> Result<Scenario> {
        let seed = seed.unwrap_or(self.seed);
        let horde = self.horde.into_config(seed)?;
        let boss = self.boss.into_config(seed)?;
        let tribute = tribute::Config::new(
            self.tribute.no_plants_destroyed,
            self.tribute.home_untouched,
            self.tribute.player_unharmed,
        );

        let config = Config::default()
            .with_horde(horde)
            .with_boss(boss)
            .with_tribute(tribute)
            .with_home_health(self.home_health)
            .with_max_cascade(self.max_cascade);
        config.validate()?;

        Ok(Scenario {
            config,
            spawn_points: self
                .spawn_points
                .into_iter()
                .map(|entry| (entry.name, Vec2::from_array(entry.position)))
                .collect(),
            markers: self.markers,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HordeSection {
    base_enemies_per_night: u32,
    enemies_per_night_increment: u32,
    base_spawn_interval: f32,
    spawn_interval_decrease_per_day: f32,
    min_spawn_interval: f32,
    warm_up_delay: f32,
    min_player_distance: f32,
    random_spawn_points: bool,
    enemy_pool: Vec<EnemyProfile>,
}

impl Default for HordeSection {
    fn default() -> Self {
        Self {
            base_enemies_per_night: 5,
            enemies_per_night_increment: 2,
            base_spawn_interval: 3.0,
            spawn_interval_decrease_per_day: 0.2,
            min_spawn_interval: 0.8,
            warm_up_delay: 2.0,
            min_player_distance: 8.0,
            random_spawn_points: true,
            enemy_pool: horde::Config::default().enemy_pool().to_vec(),
        }
    }
}

impl HordeSection {
    fn into_config(self, seed: u64) -> Result<horde::Config> {
        Ok(horde::Config::new(self.enemy_pool)
            .with_enemy_counts(self.base_enemies_per_night, self.enemies_per_night_increment)
            .with_spawn_intervals(
                seconds("horde.base_spawn_interval", self.base_spawn_interval)?,
                seconds(
                    "horde.spawn_interval_decrease_per_day",
                    self.spawn_interval_decrease_per_day,
                )?,
                seconds("horde.min_spawn_interval", self.min_spawn_interval)?,
            )
            .with_warm_up_delay(seconds("horde.warm_up_delay", self.warm_up_delay)?)
            .with_min_player_distance(self.min_player_distance)
            .with_random_spawn_points(self.random_spawn_points)
            .with_rng_seed(seed))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BossSection {
    boss_night_interval: u32,
    announcement_delay: f32,
    dynamic_selection: bool,
    roster: Vec<EnemyProfile>,
    base_reward: u32,
    reward_step: u32,
}

impl Default for BossSection {
    fn default() -> Self {
        Self {
            boss_night_interval: 5,
            announcement_delay: 3.0,
            dynamic_selection: false,
            roster: boss::Config::default().roster().to_vec(),
            base_reward: 100,
            reward_step: 50,
        }
    }
}

impl BossSection {
    fn into_config(self, seed: u64) -> Result<boss::Config> {
        Ok(boss::Config::new(self.roster)
            .with_boss_night_interval(self.boss_night_interval)
            .with_announcement_delay(seconds("boss.announcement_delay", self.announcement_delay)?)
            .with_dynamic_selection(self.dynamic_selection)
            .with_rewards(self.base_reward, self.reward_step)
            .with_rng_seed(seed.rotate_left(32)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TributeSection {
    no_plants_destroyed: u32,
    home_untouched: u32,
    player_unharmed: u32,
}

impl Default for TributeSection {
    fn default() -> Self {
        let defaults = tribute::Config::default();
        Self {
            no_plants_destroyed: defaults.reward_no_plants_destroyed(),
            home_untouched: defaults.reward_home_untouched(),
            player_unharmed: defaults.reward_player_unharmed(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpawnPointEntry {
    name: String,
    position: [f32; 2],
}

fn seconds(field: &str, value: f32) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        bail!("{field} must be a non-negative number of seconds (got {value})");
    }
    Duration::try_from_secs_f32(value)
        .with_context(|| format!("{field} is too large to be a duration (got {value})"))
}
