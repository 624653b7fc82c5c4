#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Nightfall engine.
//!
//! This crate defines the message surface that connects the director, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! subscribers to react to deterministically. Systems consume event streams,
//! read immutable [`NightView`] snapshots, and respond exclusively with new
//! command batches and their own notifications.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod subscribers;

pub use subscribers::{Subscribers, SubscriptionId};

/// Global mode gating which player actions and subsystems are active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Daylight exploration with no specific tool engaged.
    Day,
    /// Combat phase during which hordes and bosses roam.
    Night,
    /// Daylight phase with the digging tool engaged.
    Digging,
    /// Daylight phase with seeds in hand.
    Planting,
    /// Daylight phase collecting grown crops.
    Harvesting,
    /// Daylight phase clearing placed objects.
    Removing,
    /// Inventory overlay is open.
    OnInventory,
    /// Crafting overlay is open.
    OnCrafting,
    /// Altar restoration overlay is open.
    OnAltarRestoration,
    /// Ritual overlay is open.
    OnRitual,
    /// Simulation is paused.
    Paused,
    /// The run ended.
    GameOver,
    /// Front-end menu before or between runs.
    MainMenu,
    /// No phase has been entered yet.
    None,
}

impl Phase {
    /// Reports whether entering this phase leaves the day/night theming untouched.
    ///
    /// Overlays and pause sit on top of whatever ambience is active, so
    /// switching into them must not crossfade the world.
    #[must_use]
    pub const fn suppresses_world_transition(self) -> bool {
        matches!(
            self,
            Self::GameOver
                | Self::OnInventory
                | Self::OnCrafting
                | Self::OnAltarRestoration
                | Self::OnRitual
                | Self::Paused
        )
    }

    /// Time scale imposed when the phase becomes active, if the phase imposes one.
    #[must_use]
    pub const fn time_scale(self) -> Option<f32> {
        match self {
            Self::Paused | Self::GameOver => Some(0.0),
            Self::MainMenu | Self::None => None,
            _ => Some(1.0),
        }
    }

    /// Cursor affordance presented while the phase is active.
    #[must_use]
    pub const fn cursor(self) -> CursorContext {
        match self {
            Self::Digging => CursorContext::Shovel,
            Self::Planting => CursorContext::Seed,
            Self::Harvesting => CursorContext::Sickle,
            Self::Removing => CursorContext::Axe,
            Self::Night => CursorContext::Crosshair,
            Self::OnInventory
            | Self::OnCrafting
            | Self::OnAltarRestoration
            | Self::OnRitual
            | Self::Paused
            | Self::GameOver
            | Self::MainMenu => CursorContext::Pointer,
            Self::Day | Self::None => CursorContext::Default,
        }
    }

    /// Reports whether the phase ends the current run or session outright.
    #[must_use]
    pub const fn abandons_session(self) -> bool {
        matches!(self, Self::GameOver | Self::MainMenu | Self::None)
    }
}

/// Day or night theming applied to the world presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ambience {
    /// Daylight presentation.
    Day,
    /// Night presentation.
    Night,
}

impl Ambience {
    /// Ambience that a non-overlay phase calls for.
    #[must_use]
    pub const fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Night => Self::Night,
            _ => Self::Day,
        }
    }
}

/// Cursor sprite or context presented to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorContext {
    /// Plain system cursor.
    Default,
    /// Pointer used over overlays and menus.
    Pointer,
    /// Shovel shown while digging.
    Shovel,
    /// Seed pouch shown while planting.
    Seed,
    /// Sickle shown while harvesting.
    Sickle,
    /// Axe shown while removing objects.
    Axe,
    /// Crosshair shown while fighting at night.
    Crosshair,
}

/// Tool or action currently bound to the player's primary input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAbility {
    /// Digging soil.
    Digging,
    /// Planting seeds.
    Planting,
    /// Harvesting crops.
    Harvesting,
    /// Removing placed objects.
    Removing,
    /// Attacking enemies.
    Combat,
}

/// Rotating ordinal state used to bias boss selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LunarPhase {
    /// New moon.
    New,
    /// Waxing crescent.
    WaxingCrescent,
    /// First quarter.
    FirstQuarter,
    /// Waxing gibbous.
    WaxingGibbous,
    /// Full moon.
    Full,
    /// Waning gibbous.
    WaningGibbous,
    /// Last quarter.
    LastQuarter,
    /// Waning crescent.
    WaningCrescent,
}

impl LunarPhase {
    /// Every lunar phase in cycle order.
    pub const ALL: [Self; 8] = [
        Self::New,
        Self::WaxingCrescent,
        Self::FirstQuarter,
        Self::WaxingGibbous,
        Self::Full,
        Self::WaningGibbous,
        Self::LastQuarter,
        Self::WaningCrescent,
    ];

    /// Number of phases in one lunar cycle.
    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based position of the phase within the cycle.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Lunar phase shown on the provided day, starting from a new moon on day zero.
    #[must_use]
    pub fn from_day(day: u32) -> Self {
        let index = usize::try_from(day).unwrap_or(usize::MAX) % Self::COUNT;
        Self::ALL[index]
    }
}

/// Unique identifier assigned to a live enemy, bosses included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Designer-facing enemy type drawn from an enemy pool or boss roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyKind(u32);

impl EnemyKind {
    /// Creates a new enemy kind with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the kind.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Template describing an enemy that can be instantiated by the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// Enemy type to instantiate.
    pub kind: EnemyKind,
    /// Starting health; `None` spawns an entity without a health component.
    #[serde(default)]
    pub max_health: Option<f32>,
}

impl EnemyProfile {
    /// Creates a profile for a damageable enemy.
    #[must_use]
    pub const fn new(kind: EnemyKind, max_health: f32) -> Self {
        Self {
            kind,
            max_health: Some(max_health),
        }
    }

    /// Creates a profile for an entity that cannot be damaged, only despawned.
    #[must_use]
    pub const fn without_health(kind: EnemyKind) -> Self {
        Self {
            kind,
            max_health: None,
        }
    }
}

/// Encounter that requested an enemy spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyRole {
    /// Regular member of the nightly horde.
    Horde,
    /// Boss spawned on a boss night.
    Boss,
}

/// Unique identifier assigned to a registered spawn point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpawnPointId(u32);

impl SpawnPointId {
    /// Creates a new spawn point identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Named location enemies may be spawned at.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPoint {
    /// Identifier allocated by the world.
    pub id: SpawnPointId,
    /// Designer-facing name of the point.
    pub name: String,
    /// World-space position of the point.
    pub position: Vec2,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided unscaled delta time.
    Tick {
        /// Wall-clock duration that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a transition to the provided phase.
    SetPhase {
        /// Phase the world should activate.
        phase: Phase,
    },
    /// Starts a new day: resets the phase to digging and broadcasts the day index.
    StartDayCycle,
    /// Advances the day counter and enters the night phase.
    TransitionToNight,
    /// Sets the home structure's health, typically at the start of a run.
    ConfigureHome {
        /// Health the home starts with.
        health: f32,
    },
    /// Registers a new location enemies may spawn at.
    RegisterSpawnPoint {
        /// Designer-facing name of the point.
        name: String,
        /// World-space position of the point.
        position: Vec2,
    },
    /// Registers a structure or marker whose visuals follow night mode.
    RegisterNightMarker {
        /// Designer-facing name of the marker.
        name: String,
    },
    /// Updates the player's world-space position.
    MovePlayer {
        /// New player position.
        position: Vec2,
    },
    /// Binds the provided ability to the player's primary input.
    SetPlayerAbility {
        /// Ability to activate.
        ability: PlayerAbility,
    },
    /// Overrides the lunar phase reported to systems.
    SetLunarPhase {
        /// Lunar phase to report.
        phase: LunarPhase,
    },
    /// Requests that an enemy be instantiated at a spawn point.
    SpawnEnemy {
        /// Template of the enemy to create.
        profile: EnemyProfile,
        /// Spawn point the enemy appears at.
        spawn_point: SpawnPointId,
        /// Encounter that owns the enemy.
        role: EnemyRole,
    },
    /// Applies damage to a damageable enemy.
    DamageEnemy {
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Amount of health removed.
        amount: f32,
    },
    /// Drives a damageable enemy's health to zero.
    KillEnemy {
        /// Enemy to kill.
        enemy: EnemyId,
    },
    /// Removes an enemy from the world without a death.
    DespawnEnemy {
        /// Enemy to remove.
        enemy: EnemyId,
    },
    /// Applies damage to the home structure.
    DamageHome {
        /// Amount of health removed.
        amount: f32,
    },
    /// Applies damage to the player.
    DamagePlayer {
        /// Amount of health removed.
        amount: f32,
    },
    /// Reports that one of the player's plants was destroyed.
    DestroyPlant,
    /// Adds gold to the player's currency store.
    GrantGold {
        /// Amount of gold to add.
        amount: u32,
    },
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that game time advanced by the provided scaled duration.
    TimeAdvanced {
        /// Duration of game time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the world committed a new phase.
    PhaseChanged {
        /// Phase active before the transition.
        from: Phase,
        /// Phase active after the transition.
        to: Phase,
    },
    /// Requests that presentation crossfade to a different ambience.
    WorldRethemed {
        /// Ambience that became active.
        ambience: Ambience,
    },
    /// Reports that the player's primary ability changed.
    AbilityChanged {
        /// Ability now bound.
        ability: PlayerAbility,
    },
    /// Reports that the cursor affordance changed.
    CursorChanged {
        /// Cursor now presented.
        cursor: CursorContext,
    },
    /// Reports that the global time scale changed.
    TimeScaleChanged {
        /// Multiplier applied to subsequent ticks.
        scale: f32,
    },
    /// Reports that night-mode visuals were toggled on registered markers.
    NightModeChanged {
        /// Whether night mode is now enabled.
        enabled: bool,
        /// Number of markers that were toggled.
        markers: usize,
    },
    /// Broadcast to day-cycle collaborators when a new day begins.
    NewDay {
        /// Current value of the day counter.
        day: u32,
    },
    /// Reports that the day counter advanced ahead of a night.
    DayAdvanced {
        /// New value of the day counter.
        day: u32,
    },
    /// Reports that a night began and its outcome should be audited.
    NightBegan {
        /// Day index the night belongs to.
        day: u32,
    },
    /// Confirms that an enemy was instantiated.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Enemy type that was instantiated.
        kind: EnemyKind,
        /// Encounter that owns the enemy.
        role: EnemyRole,
        /// Spawn point the enemy appeared at.
        spawn_point: SpawnPointId,
    },
    /// Reports that an enemy took damage and survived.
    EnemyDamaged {
        /// Enemy that was damaged.
        enemy: EnemyId,
        /// Health left after the hit.
        remaining: f32,
    },
    /// Reports that an enemy died.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
        /// Encounter that owned the enemy.
        role: EnemyRole,
    },
    /// Reports that an enemy was removed without dying.
    EnemyDespawned {
        /// Enemy that was removed.
        enemy: EnemyId,
        /// Encounter that owned the enemy.
        role: EnemyRole,
    },
    /// Reports that the home structure took damage.
    HomeDamaged {
        /// Health left after the hit.
        remaining: f32,
    },
    /// Reports that the player took damage.
    PlayerDamaged {
        /// Amount of health removed.
        amount: f32,
    },
    /// Reports that one of the player's plants was destroyed.
    PlantDestroyed,
    /// Confirms that gold was added to the currency store.
    GoldGranted {
        /// Gold added by the grant.
        amount: u32,
        /// Gold held after the grant.
        total: u32,
    },
    /// Announces that the nightly horde started.
    HordeStarted {
        /// Day index the horde belongs to.
        day: u32,
        /// Number of kills required to clear the horde.
        target: u32,
        /// Base interval between spawns for the night.
        interval: Duration,
    },
    /// Reports horde progress after a spawn or a kill.
    HordeProgress {
        /// Kills recorded so far.
        killed: u32,
        /// Number of kills required to clear the horde.
        target: u32,
    },
    /// Announces that the nightly horde finished.
    HordeEnded {
        /// Day index the horde belonged to.
        day: u32,
    },
    /// Announces that a boss night started and the boss will arrive shortly.
    BossNightStarted {
        /// Day index of the boss night.
        day: u32,
    },
    /// Confirms that the boss entered the world.
    BossSpawned {
        /// Identifier of the boss.
        boss: EnemyId,
        /// Boss type that was spawned.
        kind: EnemyKind,
    },
    /// Reports that the boss was defeated.
    BossDefeated {
        /// Identifier of the defeated boss.
        boss: EnemyId,
    },
    /// Announces that the boss night finished and its reward was granted.
    BossNightCompleted {
        /// Day index of the boss night.
        day: u32,
        /// Gold granted for the defeat.
        reward: u32,
    },
    /// Announces that a boss night was called off before the boss engaged.
    BossNightAborted {
        /// Day index of the boss night.
        day: u32,
    },
    /// Reports the outcome of the end-of-night tribute audit.
    TributeEvaluated {
        /// Bonuses earned during the night.
        award: TributeAward,
    },
}

/// Breakdown of the bonuses earned by the end-of-night tribute audit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TributeAward {
    /// Bonus for losing no plants.
    pub no_plants_destroyed: u32,
    /// Bonus for keeping the home at full baseline health.
    pub home_untouched: u32,
    /// Bonus for the player taking no damage.
    pub player_unharmed: u32,
}

impl TributeAward {
    /// Sum of all earned bonuses.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.no_plants_destroyed
            .saturating_add(self.home_untouched)
            .saturating_add(self.player_unharmed)
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier assigned to the enemy.
    pub id: EnemyId,
    /// Enemy type.
    pub kind: EnemyKind,
    /// Encounter that owns the enemy.
    pub role: EnemyRole,
    /// Spawn point the enemy appeared at.
    pub spawn_point: SpawnPointId,
    /// Remaining health, or `None` when the enemy has no health component.
    pub health: Option<f32>,
}

impl EnemySnapshot {
    /// Reports whether the enemy can be damaged or killed.
    #[must_use]
    pub const fn is_damageable(&self) -> bool {
        self.health.is_some()
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single enemy by identifier.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only slice of world state consumed by the nocturnal systems.
#[derive(Clone, Debug)]
pub struct NightView<'a> {
    /// Phase currently active.
    pub phase: Phase,
    /// Current value of the day counter.
    pub day: u32,
    /// Lunar phase reported by the lunar cycle.
    pub lunar_phase: LunarPhase,
    /// Registered spawn points in registration order.
    pub spawn_points: &'a [SpawnPoint],
    /// Player position used for proximity filtering.
    pub player_position: Vec2,
    /// Current home health.
    pub home_health: f32,
    /// Live enemies.
    pub enemies: EnemyView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_phases_suppress_world_transition() {
        for phase in [
            Phase::GameOver,
            Phase::OnInventory,
            Phase::OnCrafting,
            Phase::OnAltarRestoration,
            Phase::OnRitual,
            Phase::Paused,
        ] {
            assert!(phase.suppresses_world_transition(), "{phase:?}");
        }
        for phase in [Phase::Day, Phase::Night, Phase::Digging, Phase::MainMenu] {
            assert!(!phase.suppresses_world_transition(), "{phase:?}");
        }
    }

    #[test]
    fn time_scale_freezes_pause_and_game_over() {
        assert_eq!(Phase::Day.time_scale(), Some(1.0));
        assert_eq!(Phase::Night.time_scale(), Some(1.0));
        assert_eq!(Phase::Paused.time_scale(), Some(0.0));
        assert_eq!(Phase::GameOver.time_scale(), Some(0.0));
        assert_eq!(Phase::MainMenu.time_scale(), None);
    }

    #[test]
    fn lunar_phase_wraps_every_cycle() {
        assert_eq!(LunarPhase::from_day(0), LunarPhase::New);
        assert_eq!(LunarPhase::from_day(4), LunarPhase::Full);
        assert_eq!(LunarPhase::from_day(9), LunarPhase::WaxingCrescent);
        assert_eq!(LunarPhase::WaningCrescent.ordinal(), LunarPhase::COUNT - 1);
    }

    #[test]
    fn enemy_view_looks_up_by_identifier() {
        let snapshot = |id: u32, health: Option<f32>| EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::new(1),
            role: EnemyRole::Horde,
            spawn_point: SpawnPointId::new(0),
            health,
        };
        let view = EnemyView::from_snapshots(vec![snapshot(7, None), snapshot(2, Some(5.0))]);

        assert_eq!(view.len(), 2);
        assert!(view.get(EnemyId::new(2)).is_some_and(EnemySnapshot::is_damageable));
        assert!(view.get(EnemyId::new(7)).is_some_and(|enemy| !enemy.is_damageable()));
        assert!(view.get(EnemyId::new(3)).is_none());
    }

    #[test]
    fn tribute_award_sums_bonuses() {
        let award = TributeAward {
            no_plants_destroyed: 30,
            home_untouched: 0,
            player_unharmed: 20,
        };
        assert_eq!(award.total(), 50);
    }

    #[test]
    fn enemy_profile_health_defaults_to_absent() {
        #[derive(Deserialize)]
        struct Roster {
            boss: Vec<EnemyProfile>,
        }

        let roster: Roster = toml::from_str(
            r#"
            [[boss]]
            kind = 4
            max_health = 250.0

            [[boss]]
            kind = 9
            "#,
        )
        .expect("roster parses");

        assert_eq!(roster.boss[0], EnemyProfile::new(EnemyKind::new(4), 250.0));
        assert_eq!(
            roster.boss[1],
            EnemyProfile::without_health(EnemyKind::new(9))
        );
    }
}
