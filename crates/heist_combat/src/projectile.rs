//! Projectile simulation
//!
//! Projectiles fly in a straight line at constant speed. Each fixed step a
//! projectile first moves, then checks for contact, then lifetime, then
//! range. Contact always consumes the projectile, whether or not the thing
//! it touched can take damage.

use crate::damage::{DamageSource, DamageTargets};
use crate::health::DamageOutcome;
use heist_core::EntityId;
use heist_math::Vec2;
use heist_physics::{CollisionLayer, LayerMask, QueryFilter, SpatialQuery};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flight and damage parameters shared by every projectile a weapon fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileParams {
    /// Units per second
    pub speed: f32,
    pub damage: i32,
    /// Seconds before the projectile expires
    pub lifetime: f32,
    /// Distance before the projectile expires
    pub max_distance: f32,
    /// Contact radius
    pub radius: f32,
    /// Layers that stop the projectile
    pub collides_with: LayerMask,
    /// Layers that take damage on contact
    pub damages: LayerMask,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            speed: 10.0,
            damage: 10,
            lifetime: 3.0,
            max_distance: 15.0,
            radius: 0.1,
            collides_with: CollisionLayer::WALL | CollisionLayer::NPC | CollisionLayer::VEHICLE,
            damages: CollisionLayer::NPC.into(),
        }
    }
}

impl ProjectileParams {
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(self.speed > 0.0) || !(self.lifetime > 0.0) || !(self.max_distance > 0.0) {
            return Err(crate::CombatError::InvalidProjectile(format!(
                "speed {}, lifetime {} and max distance {} must be positive",
                self.speed, self.lifetime, self.max_distance
            )));
        }
        Ok(())
    }
}

/// Request to put a projectile into flight
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpawn {
    pub origin: Vec2,
    pub direction: Vec2,
    pub params: ProjectileParams,
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: Option<EntityId>,
    pub position: Vec2,
    /// Unit length
    pub direction: Vec2,
    pub params: ProjectileParams,
    pub age: f32,
    pub traveled: f32,
}

/// Why a projectile ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    Lifetime,
    Range,
}

/// How a projectile left the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileFate {
    /// Touched `target`. `outcome` is `None` when the target cannot be
    /// damaged by this projectile.
    Hit {
        target: EntityId,
        layer: CollisionLayer,
        outcome: Option<DamageOutcome>,
    },
    Expired(ExpiryReason),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileResolution {
    pub projectile: EntityId,
    pub owner: Option<EntityId>,
    pub position: Vec2,
    pub fate: ProjectileFate,
}

/// Owns every projectile in flight
#[derive(Debug, Default)]
pub struct ProjectileSimulator {
    projectiles: BTreeMap<EntityId, Projectile>,
}

impl ProjectileSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, id: EntityId, owner: Option<EntityId>, spawn: ProjectileSpawn) {
        let direction = spawn.direction.normalize();
        let direction = if direction.is_zero() { Vec2::X } else { direction };
        log::trace!("Projectile {} spawned at {:?} heading {:?}", id, spawn.origin, direction);
        self.projectiles.insert(
            id,
            Projectile {
                id,
                owner,
                position: spawn.origin,
                direction,
                params: spawn.params,
                age: 0.0,
                traveled: 0.0,
            },
        );
    }

    /// Advance every projectile by `dt` and resolve the ones that ended
    pub fn step(
        &mut self,
        dt: f32,
        query: &dyn SpatialQuery,
        targets: &mut dyn DamageTargets,
    ) -> Vec<ProjectileResolution> {
        let mut resolutions = Vec::new();

        for projectile in self.projectiles.values_mut() {
            let start = projectile.position;
            let travel = projectile.params.speed * dt;
            projectile.position += projectile.direction * travel;
            projectile.traveled += travel;
            projectile.age += dt;

            if let Some(fate) = Self::resolve_contact(projectile, start, query, targets) {
                resolutions.push(ProjectileResolution {
                    projectile: projectile.id,
                    owner: projectile.owner,
                    position: projectile.position,
                    fate,
                });
            } else if projectile.age >= projectile.params.lifetime {
                resolutions.push(Self::expire(projectile, ExpiryReason::Lifetime));
            } else if projectile.traveled >= projectile.params.max_distance {
                resolutions.push(Self::expire(projectile, ExpiryReason::Range));
            }
        }

        for resolution in &resolutions {
            self.projectiles.remove(&resolution.projectile);
        }
        resolutions
    }

    fn resolve_contact(
        projectile: &Projectile,
        start: Vec2,
        query: &dyn SpatialQuery,
        targets: &mut dyn DamageTargets,
    ) -> Option<ProjectileFate> {
        let mut filter = QueryFilter::new(projectile.params.collides_with);
        if let Some(owner) = projectile.owner {
            filter = filter.with_exclude(owner);
        }

        // Nearest to where the projectile came from wins
        let hit = query
            .overlap_circle(projectile.position, projectile.params.radius, &filter)
            .into_iter()
            .min_by(|a, b| {
                start
                    .distance_squared(a.position)
                    .partial_cmp(&start.distance_squared(b.position))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        let outcome = if projectile.params.damages.contains(hit.layer) {
            targets
                .damageable(hit.entity)
                .map(|target| target.take_damage(projectile.params.damage, DamageSource::Projectile))
        } else {
            None
        };

        Some(ProjectileFate::Hit {
            target: hit.entity,
            layer: hit.layer,
            outcome,
        })
    }

    fn expire(projectile: &Projectile, reason: ExpiryReason) -> ProjectileResolution {
        ProjectileResolution {
            projectile: projectile.id,
            owner: projectile.owner,
            position: projectile.position,
            fate: ProjectileFate::Expired(reason),
        }
    }

    /// Drop every projectile fired by `owner`
    pub fn remove_owned_by(&mut self, owner: EntityId) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|_, p| p.owner != Some(owner));
        before - self.projectiles.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.values()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::Damageable;
    use crate::health::HealthLedger;
    use heist_physics::{Collider, SpatialIndex};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Targets(HashMap<EntityId, HealthLedger>);

    impl DamageTargets for Targets {
        fn damageable(&mut self, entity: EntityId) -> Option<&mut dyn Damageable> {
            self.0.get_mut(&entity).map(|h| h as &mut dyn Damageable)
        }
    }

    fn id(raw: u64) -> EntityId {
        EntityId::from_raw(raw)
    }

    fn spawn_at(sim: &mut ProjectileSimulator, raw: u64, origin: Vec2, params: ProjectileParams) {
        sim.spawn(id(raw), None, ProjectileSpawn { origin, direction: Vec2::X, params });
    }

    #[test]
    fn test_hits_and_damages_npc() {
        let mut index = SpatialIndex::new();
        index.insert(Collider::circle(id(1), CollisionLayer::NPC, Vec2::new(1.0, 0.0), 0.25));
        let mut targets = Targets::default();
        targets.0.insert(id(1), HealthLedger::new(100).unwrap());

        let mut sim = ProjectileSimulator::new();
        spawn_at(&mut sim, 10, Vec2::ZERO, ProjectileParams::default());

        let mut resolved = Vec::new();
        for _ in 0..10 {
            resolved.extend(sim.step(0.02, &index, &mut targets));
        }

        assert_eq!(resolved.len(), 1);
        match resolved[0].fate {
            ProjectileFate::Hit { target, outcome, .. } => {
                assert_eq!(target, id(1));
                assert_eq!(outcome, Some(DamageOutcome::Applied { dealt: 10, remaining: 90 }));
            }
            other => panic!("unexpected fate {:?}", other),
        }
        assert!(sim.is_empty());
    }

    #[test]
    fn test_consumed_by_wall_without_damage() {
        let mut index = SpatialIndex::new();
        index.insert(Collider::rect(id(2), CollisionLayer::WALL, Vec2::new(0.5, 0.0), Vec2::new(0.2, 4.0), 0.0));
        let mut targets = Targets::default();

        let mut sim = ProjectileSimulator::new();
        spawn_at(&mut sim, 10, Vec2::ZERO, ProjectileParams::default());

        let resolved = sim.step(0.05, &index, &mut targets);
        assert_eq!(
            resolved[0].fate,
            ProjectileFate::Hit { target: id(2), layer: CollisionLayer::WALL, outcome: None }
        );
    }

    #[test]
    fn test_expires_on_lifetime() {
        let index = SpatialIndex::new();
        let mut targets = Targets::default();
        let mut sim = ProjectileSimulator::new();
        spawn_at(&mut sim, 10, Vec2::ZERO, ProjectileParams::default().with_lifetime(0.1).with_max_distance(100.0));

        assert!(sim.step(0.05, &index, &mut targets).is_empty());
        let resolved = sim.step(0.05, &index, &mut targets);
        assert_eq!(resolved[0].fate, ProjectileFate::Expired(ExpiryReason::Lifetime));
    }

    #[test]
    fn test_expires_on_range() {
        let index = SpatialIndex::new();
        let mut targets = Targets::default();
        let mut sim = ProjectileSimulator::new();
        spawn_at(&mut sim, 10, Vec2::ZERO, ProjectileParams::default().with_max_distance(0.95));

        let mut resolved = Vec::new();
        let mut steps = 0;
        while resolved.is_empty() {
            resolved = sim.step(0.02, &index, &mut targets);
            steps += 1;
        }
        assert_eq!(resolved[0].fate, ProjectileFate::Expired(ExpiryReason::Range));
        assert_eq!(steps, 5);
    }

    #[test]
    fn test_owner_is_not_hit() {
        let mut index = SpatialIndex::new();
        index.insert(Collider::circle(id(1), CollisionLayer::NPC, Vec2::new(0.2, 0.0), 0.25));
        let mut targets = Targets::default();
        let mut sim = ProjectileSimulator::new();
        sim.spawn(id(10), Some(id(1)), ProjectileSpawn {
            origin: Vec2::ZERO,
            direction: Vec2::X,
            params: ProjectileParams::default(),
        });

        assert!(sim.step(0.02, &index, &mut targets).is_empty());
        assert_eq!(sim.remove_owned_by(id(1)), 1);
    }

    #[test]
    fn test_validate() {
        assert!(ProjectileParams::default().validate().is_ok());
        assert!(ProjectileParams::default().with_speed(0.0).validate().is_err());
    }
}
