//! Weapon slots, ammunition and attack resolution

use crate::damage::{DamageSource, DamageTargets};
use crate::error::{CombatError, Result};
use crate::health::DamageOutcome;
use crate::projectile::{ProjectileParams, ProjectileSpawn};
use heist_core::{EntityId, Scheduler};
use heist_math::Vec2;
use heist_physics::{CollisionLayer, LayerMask, Overlap, QueryFilter, SpatialQuery};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a weapon attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Instant area hit around the attack point
    Melee,
    /// One projectile per attack
    RangedSingle,
    /// Several projectiles spaced over time per attack
    RangedBurst,
}

fn default_cooldown() -> f32 {
    1.0
}

fn default_melee_damage() -> i32 {
    20
}

fn default_melee_radius() -> f32 {
    0.5
}

fn default_melee_targets() -> LayerMask {
    CollisionLayer::NPC.into()
}

fn default_burst_count() -> u32 {
    1
}

fn default_burst_interval() -> f32 {
    0.1
}

/// Weapon definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub name: String,
    pub kind: WeaponKind,
    /// Seconds after an accepted attack before the next one is accepted
    #[serde(default = "default_cooldown")]
    pub cooldown: f32,
    #[serde(default = "default_melee_damage")]
    pub melee_damage: i32,
    #[serde(default = "default_melee_radius")]
    pub melee_radius: f32,
    #[serde(default = "default_melee_targets")]
    pub melee_targets: LayerMask,
    /// Ammunition pool size, ranged weapons only
    #[serde(default)]
    pub max_ammo: Option<u32>,
    #[serde(default = "default_burst_count")]
    pub burst_count: u32,
    #[serde(default = "default_burst_interval")]
    pub burst_interval: f32,
    #[serde(default)]
    pub projectile: ProjectileParams,
    /// Animation trigger set on the attacker
    #[serde(default)]
    pub animation_trigger: String,
}

impl WeaponDef {
    fn base(name: impl Into<String>, kind: WeaponKind) -> Self {
        Self {
            name: name.into(),
            kind,
            cooldown: default_cooldown(),
            melee_damage: default_melee_damage(),
            melee_radius: default_melee_radius(),
            melee_targets: default_melee_targets(),
            max_ammo: None,
            burst_count: default_burst_count(),
            burst_interval: default_burst_interval(),
            projectile: ProjectileParams::default(),
            animation_trigger: String::new(),
        }
    }

    pub fn melee(name: impl Into<String>, damage: i32, radius: f32) -> Self {
        Self {
            melee_damage: damage,
            melee_radius: radius,
            animation_trigger: "MeleeAttack".into(),
            ..Self::base(name, WeaponKind::Melee)
        }
    }

    pub fn single(name: impl Into<String>, max_ammo: u32) -> Self {
        Self {
            max_ammo: Some(max_ammo),
            animation_trigger: "PistolAttack".into(),
            ..Self::base(name, WeaponKind::RangedSingle)
        }
    }

    pub fn burst(name: impl Into<String>, count: u32, interval: f32, max_ammo: u32) -> Self {
        Self {
            max_ammo: Some(max_ammo),
            burst_count: count,
            burst_interval: interval,
            animation_trigger: "RifleAttack".into(),
            ..Self::base(name, WeaponKind::RangedBurst)
        }
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_projectile(mut self, projectile: ProjectileParams) -> Self {
        self.projectile = projectile;
        self
    }

    /// Knife, Pistol and Rifle
    pub fn default_loadout() -> Vec<WeaponDef> {
        vec![
            Self::melee("Knife", 20, 0.5),
            Self::single("Pistol", 15),
            Self::burst("Rifle", 3, 0.1, 30),
        ]
    }

    /// Rounds one attack consumes
    pub fn ammo_per_attack(&self) -> u32 {
        match self.kind {
            WeaponKind::Melee => 0,
            WeaponKind::RangedSingle => 1,
            WeaponKind::RangedBurst => self.burst_count,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.kind {
            WeaponKind::Melee => Ok(()),
            WeaponKind::RangedSingle | WeaponKind::RangedBurst => {
                if self.max_ammo.is_none() {
                    return Err(CombatError::MissingAmmo(self.name.clone()));
                }
                if self.kind == WeaponKind::RangedBurst && self.burst_count == 0 {
                    return Err(CombatError::ZeroBurstCount(self.name.clone()));
                }
                self.projectile.validate()
            }
        }
    }
}

/// Ammunition pool of one ranged weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoPool {
    current: u32,
    max: u32,
}

impl AmmoPool {
    /// A full pool
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn has(&self, amount: u32) -> bool {
        self.current >= amount
    }

    /// Take `amount` rounds, all or nothing
    pub fn consume(&mut self, amount: u32) -> bool {
        if !self.has(amount) {
            return false;
        }
        self.current -= amount;
        true
    }
}

impl fmt::Display for AmmoPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.current)
    }
}

/// Where an attack comes from, sampled when the attack (or a delayed burst shot) happens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOrigin {
    pub owner: Option<EntityId>,
    /// Center of melee hits
    pub attack_point: Vec2,
    /// Projectile spawn point
    pub muzzle: Vec2,
    /// Projectile direction
    pub direction: Vec2,
}

/// A resolved melee swing
#[derive(Debug, Clone, PartialEq)]
pub struct MeleeStrike {
    pub center: Vec2,
    pub radius: f32,
    pub damage: i32,
    /// Everything caught in the swing
    pub hits: Vec<Overlap>,
}

impl MeleeStrike {
    /// Apply the strike's damage to every hit that can take it
    pub fn apply(&self, targets: &mut dyn DamageTargets) -> Vec<(EntityId, DamageOutcome)> {
        self.hits
            .iter()
            .filter_map(|hit| {
                targets
                    .damageable(hit.entity)
                    .map(|target| (hit.entity, target.take_damage(self.damage, DamageSource::Melee)))
            })
            .collect()
    }
}

/// Why an attack was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackRejection {
    Cooldown,
    OutOfAmmo { required: u32, available: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    Rejected(AttackRejection),
    Melee(MeleeStrike),
    /// `spawns` fire now; `scheduled` more follow through [`WeaponManager::update`]
    Fired {
        spawns: Vec<ProjectileSpawn>,
        scheduled: u32,
    },
}

impl AttackOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

struct WeaponSlot {
    def: WeaponDef,
    ammo: Option<AmmoPool>,
}

/// Leftover cooldown below this counts as elapsed
const COOLDOWN_EPSILON: f32 = 1e-4;

/// The equipped weapon, its ammunition and the attack cooldown
pub struct WeaponManager {
    slots: Vec<WeaponSlot>,
    current: usize,
    cooldown_remaining: f32,
    pending_shots: Scheduler<ProjectileParams>,
}

impl WeaponManager {
    /// Build from an ordered slot list. The first slot starts equipped.
    pub fn new(defs: Vec<WeaponDef>) -> Result<Self> {
        if defs.is_empty() {
            return Err(CombatError::NoWeapons);
        }
        let slots = defs
            .into_iter()
            .map(|def| {
                def.validate()?;
                let ammo = def.max_ammo.filter(|_| def.kind != WeaponKind::Melee).map(AmmoPool::new);
                Ok(WeaponSlot { def, ammo })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            slots,
            current: 0,
            cooldown_remaining: 0.0,
            pending_shots: Scheduler::new(),
        })
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &WeaponDef {
        &self.slots[self.current].def
    }

    /// Ammunition of the equipped weapon, `None` for melee
    pub fn current_ammo(&self) -> Option<AmmoPool> {
        self.slots[self.current].ammo
    }

    pub fn ammo(&self, slot: usize) -> Option<AmmoPool> {
        self.slots.get(slot).and_then(|s| s.ammo)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_remaining > 0.0
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Burst shots still waiting to fire
    pub fn pending_shots(&self) -> usize {
        self.pending_shots.pending()
    }

    /// Attack with the equipped weapon
    pub fn attack(&mut self, origin: &AttackOrigin, query: &dyn SpatialQuery) -> AttackOutcome {
        if self.is_cooling_down() {
            log::debug!("Attack rejected: {:.2}s of cooldown left", self.cooldown_remaining);
            return AttackOutcome::Rejected(AttackRejection::Cooldown);
        }

        let slot = &mut self.slots[self.current];
        let required = slot.def.ammo_per_attack();
        if let Some(ammo) = slot.ammo.as_mut() {
            if !ammo.consume(required) {
                log::debug!("{} needs {} rounds, has {}", slot.def.name, required, ammo.current());
                return AttackOutcome::Rejected(AttackRejection::OutOfAmmo {
                    required,
                    available: ammo.current(),
                });
            }
        }
        self.cooldown_remaining = slot.def.cooldown;

        match slot.def.kind {
            WeaponKind::Melee => {
                let mut filter = QueryFilter::new(slot.def.melee_targets);
                if let Some(owner) = origin.owner {
                    filter = filter.with_exclude(owner);
                }
                let hits = query.overlap_circle(origin.attack_point, slot.def.melee_radius, &filter);
                AttackOutcome::Melee(MeleeStrike {
                    center: origin.attack_point,
                    radius: slot.def.melee_radius,
                    damage: slot.def.melee_damage,
                    hits,
                })
            }
            WeaponKind::RangedSingle => AttackOutcome::Fired {
                spawns: vec![Self::spawn_from(origin, slot.def.projectile.clone())],
                scheduled: 0,
            },
            WeaponKind::RangedBurst => {
                let rest = slot.def.burst_count.saturating_sub(1);
                let params = slot.def.projectile.clone();
                self.pending_shots.schedule_sequence(
                    slot.def.burst_interval,
                    slot.def.burst_interval,
                    (0..rest).map(|_| params.clone()),
                );
                AttackOutcome::Fired {
                    spawns: vec![Self::spawn_from(origin, params)],
                    scheduled: rest,
                }
            }
        }
    }

    /// Tick the cooldown and return burst shots that came due
    pub fn update(&mut self, dt: f32, origin: &AttackOrigin) -> Vec<ProjectileSpawn> {
        let remaining = self.cooldown_remaining - dt;
        self.cooldown_remaining = if remaining <= COOLDOWN_EPSILON { 0.0 } else { remaining };
        self.pending_shots
            .poll(dt)
            .into_iter()
            .map(|params| Self::spawn_from(origin, params))
            .collect()
    }

    /// Cycle the equipped slot by `direction`, wrapping both ways.
    ///
    /// Any burst still in progress is abandoned.
    pub fn switch_weapon(&mut self, direction: i32) -> usize {
        self.cancel_pending();
        let count = self.slots.len() as i64;
        self.current = (self.current as i64 + direction as i64).rem_euclid(count) as usize;
        log::debug!("Switched to {}", self.slots[self.current].def.name);
        self.current
    }

    /// Drop every scheduled burst shot
    pub fn cancel_pending(&mut self) -> usize {
        self.pending_shots.cancel_all()
    }

    fn spawn_from(origin: &AttackOrigin, params: ProjectileParams) -> ProjectileSpawn {
        ProjectileSpawn {
            origin: origin.muzzle,
            direction: origin.direction,
            params,
        }
    }
}

impl fmt::Debug for WeaponManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeaponManager")
            .field("current", &self.current().name)
            .field("ammo", &self.current_ammo())
            .field("cooldown_remaining", &self.cooldown_remaining)
            .field("pending_shots", &self.pending_shots.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthLedger;
    use crate::Damageable;
    use heist_physics::{Collider, SpatialIndex};
    use std::collections::HashMap;

    fn origin() -> AttackOrigin {
        AttackOrigin {
            owner: None,
            attack_point: Vec2::new(0.5, 0.0),
            muzzle: Vec2::new(0.5, 0.0),
            direction: Vec2::X,
        }
    }

    #[derive(Default)]
    struct Targets(HashMap<EntityId, HealthLedger>);

    impl DamageTargets for Targets {
        fn damageable(&mut self, entity: EntityId) -> Option<&mut dyn Damageable> {
            self.0.get_mut(&entity).map(|h| h as &mut dyn Damageable)
        }
    }

    #[test]
    fn test_rejects_bad_loadouts() {
        assert_eq!(WeaponManager::new(Vec::new()).err(), Some(CombatError::NoWeapons));
        let broken = WeaponDef::burst("Rifle", 0, 0.1, 30);
        assert_eq!(
            WeaponManager::new(vec![broken]).err(),
            Some(CombatError::ZeroBurstCount("Rifle".into()))
        );
    }

    #[test]
    fn test_cyclic_switching() {
        let mut weapons = WeaponManager::new(WeaponDef::default_loadout()).unwrap();
        let n = weapons.slot_count();
        for _ in 0..n {
            weapons.switch_weapon(1);
        }
        assert_eq!(weapons.current_index(), 0);
        assert_eq!(weapons.switch_weapon(-1), n - 1);
        assert_eq!(weapons.current().name, "Rifle");
    }

    #[test]
    fn test_melee_hits_everything_in_radius() {
        let mut index = SpatialIndex::new();
        let a = EntityId::from_raw(1);
        let b = EntityId::from_raw(2);
        let far = EntityId::from_raw(3);
        index.insert(Collider::circle(a, CollisionLayer::NPC, Vec2::new(0.6, 0.0), 0.25));
        index.insert(Collider::circle(b, CollisionLayer::NPC, Vec2::new(0.4, 0.2), 0.25));
        index.insert(Collider::circle(far, CollisionLayer::NPC, Vec2::new(5.0, 0.0), 0.25));

        let mut targets = Targets::default();
        for id in [a, b, far] {
            targets.0.insert(id, HealthLedger::new(100).unwrap());
        }

        let mut weapons = WeaponManager::new(WeaponDef::default_loadout()).unwrap();
        let AttackOutcome::Melee(strike) = weapons.attack(&origin(), &index) else {
            panic!("expected melee");
        };
        let results = strike.apply(&mut targets);
        assert_eq!(results.len(), 2);
        assert_eq!(targets.0[&a].current(), 80);
        assert_eq!(targets.0[&far].current(), 100);
    }

    #[test]
    fn test_cooldown_blocks_until_elapsed() {
        let index = SpatialIndex::new();
        let mut weapons = WeaponManager::new(WeaponDef::default_loadout()).unwrap();
        assert!(weapons.attack(&origin(), &index).is_accepted());
        assert_eq!(
            weapons.attack(&origin(), &index),
            AttackOutcome::Rejected(AttackRejection::Cooldown)
        );
        weapons.update(0.5, &origin());
        assert!(!weapons.attack(&origin(), &index).is_accepted());
        weapons.update(0.5, &origin());
        assert!(weapons.attack(&origin(), &index).is_accepted());
    }

    #[test]
    fn test_cooldown_ends_on_time_at_sixty_fps() {
        let index = SpatialIndex::new();
        let mut weapons = WeaponManager::new(WeaponDef::default_loadout()).unwrap();
        assert!(weapons.attack(&origin(), &index).is_accepted());
        for _ in 0..59 {
            weapons.update(1.0 / 60.0, &origin());
        }
        assert!(weapons.is_cooling_down());
        weapons.update(1.0 / 60.0, &origin());
        assert_eq!(weapons.cooldown_remaining(), 0.0);
        assert!(weapons.attack(&origin(), &index).is_accepted());
    }

    #[test]
    fn test_single_shot_consumes_ammo() {
        let index = SpatialIndex::new();
        let mut weapons = WeaponManager::new(vec![WeaponDef::single("Pistol", 1).with_cooldown(0.0)]).unwrap();

        match weapons.attack(&origin(), &index) {
            AttackOutcome::Fired { spawns, scheduled } => {
                assert_eq!(spawns.len(), 1);
                assert_eq!(scheduled, 0);
                assert_eq!(spawns[0].origin, Vec2::new(0.5, 0.0));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(weapons.current_ammo().map(|a| a.current()), Some(0));
        assert_eq!(
            weapons.attack(&origin(), &index),
            AttackOutcome::Rejected(AttackRejection::OutOfAmmo { required: 1, available: 0 })
        );
    }

    #[test]
    fn test_ammo_rejection_does_not_start_cooldown() {
        let index = SpatialIndex::new();
        let mut weapons = WeaponManager::new(vec![
            WeaponDef::single("Pistol", 0),
            WeaponDef::melee("Knife", 20, 0.5),
        ])
        .unwrap();
        assert!(!weapons.attack(&origin(), &index).is_accepted());
        assert!(!weapons.is_cooling_down());
        weapons.switch_weapon(1);
        assert!(weapons.attack(&origin(), &index).is_accepted());
    }

    #[test]
    fn test_burst_spacing_and_ammo() {
        let index = SpatialIndex::new();
        let mut weapons = WeaponManager::new(vec![WeaponDef::burst("Rifle", 3, 0.1, 3)]).unwrap();

        let mut fired_at = Vec::new();
        match weapons.attack(&origin(), &index) {
            AttackOutcome::Fired { spawns, scheduled } => {
                assert_eq!(scheduled, 2);
                fired_at.extend(spawns.iter().map(|_| 0));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(weapons.current_ammo().map(|a| a.current()), Some(0));

        for step in 1..=20 {
            for _ in weapons.update(0.02, &origin()) {
                fired_at.push(step);
            }
        }
        assert_eq!(fired_at, vec![0, 5, 10]);

        assert_eq!(
            weapons.attack(&origin(), &index),
            AttackOutcome::Rejected(AttackRejection::Cooldown)
        );
        for _ in 0..50 {
            weapons.update(0.02, &origin());
        }
        assert_eq!(
            weapons.attack(&origin(), &index),
            AttackOutcome::Rejected(AttackRejection::OutOfAmmo { required: 3, available: 0 })
        );
    }

    #[test]
    fn test_switch_cancels_burst() {
        let index = SpatialIndex::new();
        let mut weapons = WeaponManager::new(WeaponDef::default_loadout()).unwrap();
        weapons.switch_weapon(2);
        assert!(weapons.attack(&origin(), &index).is_accepted());
        assert_eq!(weapons.pending_shots(), 2);
        weapons.switch_weapon(1);
        assert_eq!(weapons.pending_shots(), 0);
        assert!(weapons.update(1.0, &origin()).is_empty());
        assert_eq!(weapons.ammo(2).map(|a| a.current()), Some(27));
    }

    #[test]
    fn test_deserialize_from_toml_shape() {
        let def: WeaponDef = serde_json::from_str(r#"{"name":"Knife","kind":"melee"}"#).unwrap();
        assert_eq!(def.melee_damage, 20);
        assert_eq!(def.cooldown, 1.0);
    }
}
