//! Brute-force spatial index
//!
//! Holds a flat snapshot of every collider. The world rebuilds it once per
//! fixed step; scenes are small enough that linear scans win over any tree.

use crate::layers::CollisionLayer;
use crate::query::{Overlap, QueryFilter, SpatialQuery};
use heist_core::EntityId;
use heist_math::{Aabb2, Vec2};

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Circle { radius: f32 },
    /// Rectangle of `size` rotated by `rotation` degrees, tested by its bounding box
    Rect { size: Vec2, rotation: f32 },
}

/// One collider in the snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub entity: EntityId,
    pub layer: CollisionLayer,
    pub position: Vec2,
    pub shape: ColliderShape,
}

impl Collider {
    pub fn circle(entity: EntityId, layer: CollisionLayer, position: Vec2, radius: f32) -> Self {
        Self {
            entity,
            layer,
            position,
            shape: ColliderShape::Circle { radius },
        }
    }

    pub fn rect(entity: EntityId, layer: CollisionLayer, position: Vec2, size: Vec2, rotation: f32) -> Self {
        Self {
            entity,
            layer,
            position,
            shape: ColliderShape::Rect { size, rotation },
        }
    }

    /// World-space bounding box
    pub fn bounds(&self) -> Aabb2 {
        match self.shape {
            ColliderShape::Circle { radius } => {
                Aabb2::from_center_size(self.position, Vec2::splat(radius * 2.0))
            }
            ColliderShape::Rect { size, rotation } => {
                Aabb2::from_rotated_rect(self.position, size, rotation)
            }
        }
    }

    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        match self.shape {
            ColliderShape::Circle { radius: own } => {
                let reach = own + radius;
                self.position.distance_squared(center) <= reach * reach
            }
            ColliderShape::Rect { .. } => self.bounds().intersects_circle(center, radius),
        }
    }

    pub fn overlaps_aabb(&self, bounds: &Aabb2) -> bool {
        match self.shape {
            ColliderShape::Circle { radius } => bounds.intersects_circle(self.position, radius),
            ColliderShape::Rect { .. } => self.bounds().intersects(bounds),
        }
    }

    fn as_overlap(&self) -> Overlap {
        Overlap {
            entity: self.entity,
            layer: self.layer,
            position: self.position,
        }
    }
}

/// Flat collider snapshot implementing [`SpatialQuery`]
#[derive(Debug, Default, Clone)]
pub struct SpatialIndex {
    colliders: Vec<Collider>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    pub fn insert(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// Remove every collider owned by `entity`
    pub fn remove(&mut self, entity: EntityId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.entity != entity);
        self.colliders.len() != before
    }

    /// Move every collider owned by `entity`
    pub fn set_position(&mut self, entity: EntityId, position: Vec2) {
        for collider in self.colliders.iter_mut().filter(|c| c.entity == entity) {
            collider.position = position;
        }
    }

    pub fn get(&self, entity: EntityId) -> Option<&Collider> {
        self.colliders.iter().find(|c| c.entity == entity)
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter()
    }
}

impl SpatialQuery for SpatialIndex {
    fn overlap_circle(&self, center: Vec2, radius: f32, filter: &QueryFilter) -> Vec<Overlap> {
        self.colliders
            .iter()
            .filter(|c| filter.passes(c.entity, c.layer))
            .filter(|c| c.overlaps_circle(center, radius))
            .map(Collider::as_overlap)
            .collect()
    }

    fn overlap_aabb(&self, bounds: &Aabb2, filter: &QueryFilter) -> Vec<Overlap> {
        self.colliders
            .iter()
            .filter(|c| filter.passes(c.entity, c.layer))
            .filter(|c| c.overlaps_aabb(bounds))
            .map(Collider::as_overlap)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerMask;

    fn id(raw: u64) -> EntityId {
        EntityId::from_raw(raw)
    }

    fn sample_index() -> SpatialIndex {
        let mut index = SpatialIndex::new();
        index.insert(Collider::circle(id(1), CollisionLayer::NPC, Vec2::new(0.0, 0.0), 0.25));
        index.insert(Collider::circle(id(2), CollisionLayer::NPC, Vec2::new(3.0, 0.0), 0.25));
        index.insert(Collider::rect(id(3), CollisionLayer::WALL, Vec2::new(0.0, 2.0), Vec2::new(10.0, 1.0), 0.0));
        index
    }

    #[test]
    fn test_overlap_circle_filters_layers() {
        let index = sample_index();
        let hits = index.overlap_circle(Vec2::new(0.4, 0.0), 0.5, &QueryFilter::new(CollisionLayer::NPC.into()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, id(1));

        let walls = index.overlap_circle(Vec2::new(0.0, 1.2), 0.5, &QueryFilter::new(CollisionLayer::WALL.into()));
        assert_eq!(walls.len(), 1);
    }

    #[test]
    fn test_overlap_aabb_excludes_self() {
        let index = sample_index();
        let bounds = Aabb2::from_center_size(Vec2::ZERO, Vec2::ONE);
        let filter = QueryFilter::new(LayerMask::ALL).with_exclude(id(1));
        assert!(index.overlap_aabb(&bounds, &filter).is_empty());
    }

    #[test]
    fn test_region_clear() {
        let index = sample_index();
        let filter = QueryFilter::default();
        assert!(index.is_region_clear(Vec2::new(-5.0, -5.0), 0.5, &filter));
        assert!(!index.is_region_clear(Vec2::new(3.0, 0.3), 0.5, &filter));
    }

    #[test]
    fn test_remove_and_move() {
        let mut index = sample_index();
        assert!(index.remove(id(2)));
        assert!(!index.remove(id(2)));
        index.set_position(id(1), Vec2::new(10.0, 10.0));
        assert_eq!(index.get(id(1)).map(|c| c.position), Some(Vec2::new(10.0, 10.0)));
        assert_eq!(index.len(), 2);
    }
}
