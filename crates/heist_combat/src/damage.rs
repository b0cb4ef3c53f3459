//! Damage capability and scaling

use crate::health::{DamageOutcome, HealthLedger};
use heist_core::EntityId;
use heist_math::round_to_int;

/// What caused a damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Melee,
    Projectile,
    /// Vehicle hitting a wall, applied to the vehicle itself
    WallImpact,
    /// Share of a wall impact passed to the occupant
    OccupantImpact,
    /// Vehicle running into an actor
    VehicleImpact,
    /// Ongoing contact drain
    Continuous,
    /// Penalty for being thrown out of a destroyed vehicle
    Ejection,
}

/// Anything that carries a health ledger
pub trait Damageable {
    fn health(&self) -> &HealthLedger;

    fn health_mut(&mut self) -> &mut HealthLedger;

    fn take_damage(&mut self, amount: i32, source: DamageSource) -> DamageOutcome {
        let outcome = self.health_mut().apply_damage(amount);
        log::trace!("{:?} damage {} -> {:?}", source, amount, outcome);
        outcome
    }

    fn is_destroyed(&self) -> bool {
        self.health().is_destroyed()
    }
}

impl Damageable for HealthLedger {
    fn health(&self) -> &HealthLedger {
        self
    }

    fn health_mut(&mut self) -> &mut HealthLedger {
        self
    }
}

/// Resolves entity ids to their damage capability
pub trait DamageTargets {
    fn damageable(&mut self, entity: EntityId) -> Option<&mut dyn Damageable>;
}

/// Impact damage: `round(|speed| * factor)`
#[inline]
pub fn impact_damage(speed: f32, factor: f32) -> i32 {
    round_to_int(speed.abs() * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_damage_scaling() {
        assert_eq!(impact_damage(7.3, 20.0), 146);
        assert_eq!(impact_damage(-7.4, 5.0), 37);
        assert_eq!(impact_damage(0.0, 50.0), 0);
    }

    #[test]
    fn test_impact_damage_rounds_halves_to_even() {
        assert_eq!(impact_damage(0.5, 5.0), 2);
        assert_eq!(impact_damage(0.125, 20.0), 2);
    }

    #[test]
    fn test_ledger_is_damageable() {
        let mut health = HealthLedger::new(30).unwrap();
        let target: &mut dyn Damageable = &mut health;
        assert_eq!(target.take_damage(10, DamageSource::Melee).dealt(), 10);
        assert!(!target.is_destroyed());
    }
}
