//! # heist_physics - Collision Plumbing
//!
//! The simulation does not integrate rigid bodies. It needs three things
//! from a physics layer, all provided here:
//! - Layer membership and masks for filtering (`layers`)
//! - Overlap queries against a snapshot of the world (`query`, `index`)
//! - Enter/Stay/Exit contact classification across fixed steps (`contacts`)
//!
//! ## Example
//!
//! ```ignore
//! use heist_physics::prelude::*;
//!
//! let mut index = SpatialIndex::new();
//! index.insert(Collider::circle(npc, CollisionLayer::NPC, position, 0.25));
//!
//! let hits = index.overlap_circle(attack_point, 0.5, &QueryFilter::new(CollisionLayer::NPC.into()));
//! ```

pub mod config;
pub mod contacts;
pub mod error;
pub mod index;
pub mod layers;
pub mod query;

pub use config::PhysicsConfig;
pub use contacts::{ContactEvent, ContactPhase, ContactTracker};
pub use error::{PhysicsError, Result};
pub use index::{Collider, ColliderShape, SpatialIndex};
pub use layers::{CollisionLayer, LayerMask};
pub use query::{Overlap, QueryFilter, SpatialQuery};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::PhysicsConfig;
    pub use crate::contacts::{ContactEvent, ContactPhase, ContactTracker};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::index::{Collider, ColliderShape, SpatialIndex};
    pub use crate::layers::{CollisionLayer, LayerMask};
    pub use crate::query::{Overlap, QueryFilter, SpatialQuery};
}
