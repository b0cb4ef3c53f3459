//! Collision layers and masks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Unclassified bodies
    pub const DEFAULT: Self = Self(0);
    /// The controllable actor
    pub const PLAYER: Self = Self(1);
    /// Non-player actors
    pub const NPC: Self = Self(2);
    /// Drivable vehicles
    pub const VEHICLE: Self = Self(3);
    /// Static walls
    pub const WALL: Self = Self(4);
    /// Drivable street surface, never blocks
    pub const STREET: Self = Self(5);
    /// Projectiles in flight
    pub const PROJECTILE: Self = Self(6);
    /// Activation zones and other sensors
    pub const TRIGGER: Self = Self(7);

    /// Create a custom layer
    pub const fn custom(id: u32) -> Self {
        Self(id)
    }

    /// Get the layer as a bitmask
    pub const fn as_mask(&self) -> u32 {
        1 << self.0
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Self::DEFAULT => "default",
            Self::PLAYER => "player",
            Self::NPC => "npc",
            Self::VEHICLE => "vehicle",
            Self::WALL => "wall",
            Self::STREET => "street",
            Self::PROJECTILE => "projectile",
            Self::TRIGGER => "trigger",
            _ => "custom",
        }
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CollisionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Set of layers
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    pub fn from_layers(layers: &[CollisionLayer]) -> Self {
        Self(layers.iter().fold(0u32, |acc, l| acc | l.as_mask()))
    }

    #[inline]
    pub const fn contains(&self, layer: CollisionLayer) -> bool {
        self.0 & layer.as_mask() != 0
    }

    #[inline]
    pub const fn with(self, layer: CollisionLayer) -> Self {
        Self(self.0 | layer.as_mask())
    }

    #[inline]
    pub const fn without(self, layer: CollisionLayer) -> Self {
        Self(self.0 & !layer.as_mask())
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<CollisionLayer> for LayerMask {
    fn from(layer: CollisionLayer) -> Self {
        Self(layer.as_mask())
    }
}

impl BitOr for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<CollisionLayer> for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: CollisionLayer) -> Self {
        self.with(rhs)
    }
}

impl BitOr for CollisionLayer {
    type Output = LayerMask;
    fn bitor(self, rhs: Self) -> LayerMask {
        LayerMask(self.as_mask() | rhs.as_mask())
    }
}

impl BitOrAssign<CollisionLayer> for LayerMask {
    fn bitor_assign(&mut self, rhs: CollisionLayer) {
        self.0 |= rhs.as_mask();
    }
}

impl fmt::Debug for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return write!(f, "LayerMask(all)");
        }
        let names: Vec<&str> = (0..8)
            .map(CollisionLayer)
            .filter(|l| self.contains(*l))
            .map(|l| l.name())
            .collect();
        write!(f, "LayerMask({})", names.join("|"))
    }
}
