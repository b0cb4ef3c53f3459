//! Actors
//!
//! Players and NPCs share one type. Whether an actor walks on its own or
//! rides in a vehicle is an explicit [`ActorMode`] the world step consults.

use crate::config::{NpcConfig, PlayerConfig};
use heist_ai::PatrolAgent;
use heist_combat::{AttackOrigin, Damageable, HealthLedger, WeaponManager};
use heist_core::EntityId;
use heist_gamestate::MissionId;
use heist_math::{Aabb2, Vec2};
use heist_physics::{Collider, CollisionLayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Npc,
}

impl ActorKind {
    pub fn layer(&self) -> CollisionLayer {
        match self {
            Self::Player => CollisionLayer::PLAYER,
            Self::Npc => CollisionLayer::NPC,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorMode {
    /// Moves and is visible on its own
    OnFoot,
    /// Hidden and pinned to the vehicle
    InVehicle(EntityId),
}

#[derive(Debug)]
pub struct Actor {
    id: EntityId,
    kind: ActorKind,
    mode: ActorMode,
    position: Vec2,
    /// Unit vector the attack point and muzzle face
    facing: Vec2,
    footprint: Vec2,
    move_speed: f32,
    health: HealthLedger,
    weapons: Option<WeaponManager>,
    patrol: Option<PatrolAgent>,
    /// Missions credited when this actor is destroyed
    missions: Vec<MissionId>,
}

impl Actor {
    pub fn player(
        id: EntityId,
        position: Vec2,
        config: &PlayerConfig,
        weapons: WeaponManager,
    ) -> heist_combat::Result<Self> {
        Ok(Self {
            id,
            kind: ActorKind::Player,
            mode: ActorMode::OnFoot,
            position,
            facing: Vec2::Y,
            footprint: config.footprint,
            move_speed: config.move_speed,
            health: HealthLedger::new(config.max_health)?,
            weapons: Some(weapons),
            patrol: None,
            missions: Vec::new(),
        })
    }

    /// An NPC that reports its destruction to `missions`
    pub fn npc(
        id: EntityId,
        position: Vec2,
        config: &NpcConfig,
        missions: Vec<MissionId>,
    ) -> heist_combat::Result<Self> {
        Ok(Self {
            id,
            kind: ActorKind::Npc,
            mode: ActorMode::OnFoot,
            position,
            facing: Vec2::Y,
            footprint: config.footprint,
            move_speed: config.move_speed,
            health: HealthLedger::new(config.max_health)?,
            weapons: None,
            patrol: None,
            missions,
        })
    }

    pub fn with_patrol(mut self, patrol: PatrolAgent) -> Self {
        self.patrol = Some(patrol);
        self
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    #[inline]
    pub fn mode(&self) -> ActorMode {
        self.mode
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Vehicle the actor is riding in
    pub fn vehicle(&self) -> Option<EntityId> {
        match self.mode {
            ActorMode::InVehicle(vehicle) => Some(vehicle),
            ActorMode::OnFoot => None,
        }
    }

    pub fn is_on_foot(&self) -> bool {
        self.mode == ActorMode::OnFoot
    }

    pub fn missions(&self) -> &[MissionId] {
        &self.missions
    }

    pub fn weapons(&self) -> Option<&WeaponManager> {
        self.weapons.as_ref()
    }

    pub fn weapons_mut(&mut self) -> Option<&mut WeaponManager> {
        self.weapons.as_mut()
    }

    pub fn patrol(&self) -> Option<&PatrolAgent> {
        self.patrol.as_ref()
    }

    pub fn bounds(&self) -> Aabb2 {
        self.bounds_at(self.position)
    }

    pub fn bounds_at(&self, position: Vec2) -> Aabb2 {
        Aabb2::from_center_size(position, self.footprint)
    }

    pub fn collider(&self) -> Collider {
        Collider::rect(self.id, self.kind.layer(), self.position, self.footprint, 0.0)
    }

    /// Attack point and muzzle `offset` ahead of the actor
    pub fn attack_origin(&self, offset: f32) -> AttackOrigin {
        let point = self.position + self.facing * offset;
        AttackOrigin {
            owner: Some(self.id),
            attack_point: point,
            muzzle: point,
            direction: self.facing,
        }
    }

    /// Turn towards `direction`; a zero vector keeps the current facing
    pub fn face(&mut self, direction: Vec2) {
        if !direction.is_zero() {
            self.facing = direction.normalize();
        }
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn set_mode(&mut self, mode: ActorMode) {
        self.mode = mode;
    }

    /// Walk the patrol one step, returning whether the actor moved
    pub(crate) fn advance_patrol(&mut self, dt: f32) -> bool {
        let Some(patrol) = self.patrol.as_mut() else {
            return false;
        };
        let next = patrol.update(self.position, dt);
        let moved = next != self.position;
        self.face(next - self.position);
        self.position = next;
        moved
    }
}

impl Damageable for Actor {
    fn health(&self) -> &HealthLedger {
        &self.health
    }

    fn health_mut(&mut self) -> &mut HealthLedger {
        &mut self.health
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heist_ai::PatrolRoute;
    use heist_combat::{DamageSource, WeaponDef};

    fn player() -> Actor {
        let weapons = WeaponManager::new(WeaponDef::default_loadout()).unwrap();
        Actor::player(EntityId::from_raw(1), Vec2::ZERO, &PlayerConfig::default(), weapons).unwrap()
    }

    #[test]
    fn test_attack_origin_follows_facing() {
        let mut actor = player();
        let origin = actor.attack_origin(0.5);
        assert_eq!(origin.attack_point, Vec2::new(0.0, 0.5));
        assert_eq!(origin.owner, Some(actor.id()));

        actor.face(Vec2::new(-3.0, 0.0));
        let origin = actor.attack_origin(0.5);
        assert_eq!(origin.direction, Vec2::new(-1.0, 0.0));
        assert_eq!(origin.muzzle, Vec2::new(-0.5, 0.0));

        actor.face(Vec2::ZERO);
        assert_eq!(actor.facing(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_npc_carries_missions() {
        let npc = Actor::npc(
            EntityId::from_raw(2),
            Vec2::ZERO,
            &NpcConfig::default(),
            vec![MissionId(1), MissionId(4)],
        )
        .unwrap();
        assert_eq!(npc.kind(), ActorKind::Npc);
        assert_eq!(npc.missions(), &[MissionId(1), MissionId(4)]);
        assert!(npc.weapons().is_none());
        assert_eq!(npc.collider().layer, CollisionLayer::NPC);
    }

    #[test]
    fn test_damageable() {
        let mut actor = player();
        let outcome = actor.take_damage(30, DamageSource::Melee);
        assert_eq!(outcome.dealt(), 30);
        assert_eq!(actor.health().current(), 70);
        assert!(!actor.is_destroyed());
    }

    #[test]
    fn test_patrol_moves_actor() {
        let route = PatrolRoute::new(vec![Vec2::new(4.0, 0.0)]);
        let mut npc = Actor::npc(EntityId::from_raw(3), Vec2::ZERO, &NpcConfig::default(), Vec::new())
            .unwrap()
            .with_patrol(PatrolAgent::new(Box::new(route), 2.0));
        assert!(npc.advance_patrol(0.5));
        assert_eq!(npc.position(), Vec2::new(1.0, 0.0));
        assert_eq!(npc.facing(), Vec2::X);
    }
}
