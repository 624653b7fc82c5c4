//! Live enemy registry implementing the damageable-entity capability.

use std::collections::BTreeMap;

use nightfall_core::{EnemyId, EnemyKind, EnemyProfile, EnemyRole, EnemySnapshot, SpawnPointId};

#[derive(Clone, Copy, Debug)]
struct Enemy {
    kind: EnemyKind,
    role: EnemyRole,
    spawn_point: SpawnPointId,
    health: Option<f32>,
}

/// Result of applying damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DamageOutcome {
    /// No enemy with the identifier is alive.
    Missing,
    /// The enemy has no health component and ignored the hit.
    Invulnerable,
    /// The enemy survived with the provided health.
    Wounded(f32),
    /// The enemy died and was removed.
    Killed(EnemyRole),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    next_id: u32,
    enemies: BTreeMap<EnemyId, Enemy>,
}

impl Roster {
    pub(crate) fn spawn(
        &mut self,
        profile: EnemyProfile,
        spawn_point: SpawnPointId,
        role: EnemyRole,
    ) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let health = profile.max_health.map(|health| health.max(f32::MIN_POSITIVE));
        let _ = self.enemies.insert(
            id,
            Enemy {
                kind: profile.kind,
                role,
                spawn_point,
                health,
            },
        );
        id
    }

    pub(crate) fn damage(&mut self, enemy: EnemyId, amount: f32) -> DamageOutcome {
        let Some(entry) = self.enemies.get_mut(&enemy) else {
            return DamageOutcome::Missing;
        };
        let Some(health) = entry.health.as_mut() else {
            return DamageOutcome::Invulnerable;
        };

        *health -= amount.max(0.0);
        if *health > 0.0 {
            return DamageOutcome::Wounded(*health);
        }

        let role = entry.role;
        let _ = self.enemies.remove(&enemy);
        DamageOutcome::Killed(role)
    }

    pub(crate) fn kill(&mut self, enemy: EnemyId) -> DamageOutcome {
        match self.enemies.get(&enemy) {
            None => DamageOutcome::Missing,
            Some(entry) if entry.health.is_none() => DamageOutcome::Invulnerable,
            Some(entry) => {
                let role = entry.role;
                let _ = self.enemies.remove(&enemy);
                DamageOutcome::Killed(role)
            }
        }
    }

    pub(crate) fn despawn(&mut self, enemy: EnemyId) -> Option<EnemyRole> {
        self.enemies.remove(&enemy).map(|entry| entry.role)
    }

    pub(crate) fn snapshot(&self, enemy: EnemyId) -> Option<EnemySnapshot> {
        self.enemies
            .get(&enemy)
            .map(|entry| snapshot_of(enemy, entry))
    }

    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.enemies
            .iter()
            .map(|(id, entry)| snapshot_of(*id, entry))
            .collect()
    }
}

fn snapshot_of(id: EnemyId, entry: &Enemy) -> EnemySnapshot {
    EnemySnapshot {
        id,
        kind: entry.kind,
        role: entry.role,
        spawn_point: entry.spawn_point,
        health: entry.health,
    }
}
