//! World event log

use crate::actor::ActorKind;
use heist_combat::{AttackRejection, DamageOutcome, DamageSource, ExpiryReason};
use heist_core::EntityId;
use heist_gamestate::{MissionEvent, MissionId};
use heist_math::Vec2;
use heist_vehicle::CollisionResponse;

/// Something that happened during [`crate::World::step`]
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    Damaged {
        target: EntityId,
        source: DamageSource,
        outcome: DamageOutcome,
    },
    ActorDestroyed {
        actor: EntityId,
        kind: ActorKind,
        position: Vec2,
    },
    VehicleDestroyed {
        vehicle: EntityId,
        occupant: Option<EntityId>,
    },
    VehicleEntered {
        actor: EntityId,
        vehicle: EntityId,
    },
    VehicleExited {
        actor: EntityId,
        vehicle: EntityId,
        position: Vec2,
    },
    Ejected {
        actor: EntityId,
        vehicle: EntityId,
        position: Vec2,
    },
    VehicleCollision {
        vehicle: EntityId,
        other: EntityId,
        response: CollisionResponse,
    },
    WeaponSwitched {
        actor: EntityId,
        slot: usize,
    },
    MeleeStrike {
        actor: EntityId,
        hits: usize,
    },
    AttackRejected {
        actor: EntityId,
        reason: AttackRejection,
    },
    ProjectileSpawned {
        projectile: EntityId,
        owner: EntityId,
        position: Vec2,
    },
    ProjectileHit {
        projectile: EntityId,
        target: EntityId,
        outcome: Option<DamageOutcome>,
    },
    ProjectileExpired {
        projectile: EntityId,
        reason: ExpiryReason,
    },
    /// Mission transitions, kills and UI hides; timer ticks are not logged
    Mission {
        mission: MissionId,
        event: MissionEvent,
    },
}

impl WorldEvent {
    pub fn is_mission(&self, mission: MissionId) -> bool {
        matches!(self, Self::Mission { mission: m, .. } if *m == mission)
    }
}
