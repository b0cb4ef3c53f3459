//! Heist Combat - Health, Weapons and Projectiles
//!
//! # Features
//!
//! - Integer health ledger that reports destruction exactly once
//! - Continuous (per-second) damage while a contact persists
//! - `Damageable` capability so hit resolution never inspects concrete types
//! - Cyclic weapon slots with melee, single-shot and burst weapons
//! - Ammunition pools and a shared attack cooldown
//! - Projectiles with lifetime, range and first-contact resolution
//!
//! # Example
//!
//! ```ignore
//! use heist_combat::prelude::*;
//!
//! let mut health = HealthLedger::new(100)?;
//! health.apply_damage(20);
//!
//! let mut weapons = WeaponManager::new(WeaponDef::default_loadout())?;
//! let outcome = weapons.attack(&origin, &spatial_index);
//! ```

pub mod damage;
pub mod error;
pub mod health;
pub mod projectile;
pub mod weapon;

pub mod prelude {
    pub use crate::damage::{impact_damage, DamageSource, DamageTargets, Damageable};
    pub use crate::error::{CombatError, Result};
    pub use crate::health::{DamageOutcome, HealthLedger};
    pub use crate::projectile::{
        ExpiryReason, Projectile, ProjectileFate, ProjectileParams, ProjectileResolution,
        ProjectileSimulator, ProjectileSpawn,
    };
    pub use crate::weapon::{
        AmmoPool, AttackOrigin, AttackOutcome, AttackRejection, MeleeStrike, WeaponDef,
        WeaponKind, WeaponManager,
    };
}

pub use prelude::*;
