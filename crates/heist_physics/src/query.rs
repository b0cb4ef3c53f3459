//! Overlap queries

use crate::layers::{CollisionLayer, LayerMask};
use heist_core::EntityId;
use heist_math::{Aabb2, Vec2};

/// A collider found by a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// The entity owning the collider
    pub entity: EntityId,
    /// Layer the collider belongs to
    pub layer: CollisionLayer,
    /// Collider center at query time
    pub position: Vec2,
}

/// Filter applied to every query
#[derive(Debug, Clone)]
pub struct QueryFilter {
    /// Layers that may be returned
    pub mask: LayerMask,
    /// Entities to skip (usually the querying entity)
    pub exclude: Vec<EntityId>,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            mask: LayerMask::ALL,
            exclude: Vec::new(),
        }
    }
}

impl QueryFilter {
    pub fn new(mask: LayerMask) -> Self {
        Self {
            mask,
            exclude: Vec::new(),
        }
    }

    /// Skip an entity
    pub fn with_exclude(mut self, entity: EntityId) -> Self {
        self.exclude.push(entity);
        self
    }

    /// Replace the layer mask
    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    #[inline]
    pub fn passes(&self, entity: EntityId, layer: CollisionLayer) -> bool {
        self.mask.contains(layer) && !self.exclude.contains(&entity)
    }
}

/// Spatial queries the simulation issues against the world.
///
/// Implementations return hits in a stable order so repeated runs with the
/// same inputs produce the same results.
pub trait SpatialQuery {
    /// Colliders overlapping a circle
    fn overlap_circle(&self, center: Vec2, radius: f32, filter: &QueryFilter) -> Vec<Overlap>;

    /// Colliders overlapping an axis-aligned box
    fn overlap_aabb(&self, bounds: &Aabb2, filter: &QueryFilter) -> Vec<Overlap>;

    /// True when nothing passing `filter` overlaps the circle
    fn is_region_clear(&self, center: Vec2, radius: f32, filter: &QueryFilter) -> bool {
        self.overlap_circle(center, radius, filter).is_empty()
    }
}
