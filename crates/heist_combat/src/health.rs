//! Health ledger

use crate::error::{CombatError, Result};
use heist_math::round_to_int;

/// Result of one damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The ledger was already destroyed or the amount was not positive
    Ignored,
    /// Damage applied, still alive
    Applied { dealt: i32, remaining: i32 },
    /// This application destroyed the owner. Reported exactly once.
    Destroyed { dealt: i32 },
}

impl DamageOutcome {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed { .. })
    }

    pub fn dealt(&self) -> i32 {
        match *self {
            Self::Ignored => 0,
            Self::Applied { dealt, .. } | Self::Destroyed { dealt } => dealt,
        }
    }
}

/// Hit points of a player, NPC or vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct HealthLedger {
    /// May dip below zero on the killing blow; observers only see the clamped value
    current: i32,
    max: i32,
    destroyed: bool,
    continuous_rate: Option<f32>,
    /// Sub-point remainder of continuous damage not yet applied
    continuous_carry: f32,
}

impl HealthLedger {
    pub fn new(max: i32) -> Result<Self> {
        if max <= 0 {
            return Err(CombatError::InvalidMaxHealth(max));
        }
        Ok(Self {
            current: max,
            max,
            destroyed: false,
            continuous_rate: None,
            continuous_carry: 0.0,
        })
    }

    /// Current hit points, never negative
    #[inline]
    pub fn current(&self) -> i32 {
        self.current.max(0)
    }

    #[inline]
    pub fn max(&self) -> i32 {
        self.max
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Fraction of health left, for health bars
    pub fn fraction(&self) -> f32 {
        self.current() as f32 / self.max as f32
    }

    /// Subtract `amount`. Destruction is reported on the first call that
    /// brings health to zero or below; every later call is ignored.
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.destroyed || amount <= 0 {
            return DamageOutcome::Ignored;
        }

        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        let dealt = before - self.current.max(0);

        if self.current <= 0 {
            self.destroyed = true;
            self.continuous_rate = None;
            DamageOutcome::Destroyed { dealt }
        } else {
            DamageOutcome::Applied {
                dealt,
                remaining: self.current,
            }
        }
    }

    /// Start draining `rate_per_second` every step until stopped
    pub fn start_continuous_damage(&mut self, rate_per_second: f32) {
        if self.destroyed {
            return;
        }
        self.continuous_rate = Some(rate_per_second);
    }

    pub fn stop_continuous_damage(&mut self) {
        self.continuous_rate = None;
        self.continuous_carry = 0.0;
    }

    #[inline]
    pub fn is_continuous_damage_active(&self) -> bool {
        self.continuous_rate.is_some()
    }

    /// Drain `rate * dt` if continuous damage is active.
    ///
    /// Not a plain `round(rate * dt)` per step: the rounding remainder carries
    /// into the next step, so short fixed steps still add up to `rate` points
    /// per second instead of rounding to zero every time.
    pub fn apply_continuous_damage(&mut self, dt: f32) -> DamageOutcome {
        let Some(rate) = self.continuous_rate else {
            return DamageOutcome::Ignored;
        };
        let exact = rate * dt + self.continuous_carry;
        let amount = round_to_int(exact);
        self.continuous_carry = exact - amount as f32;
        self.apply_damage(amount)
    }
}
