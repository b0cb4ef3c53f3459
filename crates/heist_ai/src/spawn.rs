//! Spawn placement

use heist_math::{Aabb2, Vec2};
use heist_physics::{CollisionLayer, LayerMask, QueryFilter, SpatialQuery};
use rand::Rng;
use serde::{Deserialize, Serialize};

fn default_blocking() -> LayerMask {
    CollisionLayer::WALL | CollisionLayer::VEHICLE
}

/// NPC spawn tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub npc_count: u32,
    pub waypoints_per_npc: u32,
    /// Radius that must be free of blocking layers around a placement
    pub clearance: f32,
    /// Attempts per placement before giving up on it
    pub max_attempts: u32,
    /// Region NPCs and waypoints are scattered over
    pub area: Aabb2,
    #[serde(default = "default_blocking")]
    pub blocking: LayerMask,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            npc_count: 5,
            waypoints_per_npc: 5,
            clearance: 0.5,
            max_attempts: 32,
            area: Aabb2::from_center_size(Vec2::ZERO, Vec2::new(20.0, 20.0)),
            blocking: default_blocking(),
        }
    }
}

/// Find a random point in `area` with nothing blocking within `clearance`
pub fn find_clear_point<R: Rng>(
    rng: &mut R,
    area: &Aabb2,
    clearance: f32,
    max_attempts: u32,
    blocking: LayerMask,
    query: &dyn SpatialQuery,
) -> Option<Vec2> {
    if !area.is_valid() {
        log::error!("Spawn area {:?} is inverted", area);
        return None;
    }
    let filter = QueryFilter::new(blocking);
    (0..max_attempts).find_map(|_| {
        let point = Vec2::new(
            rng.gen_range(area.min.x..=area.max.x),
            rng.gen_range(area.min.y..=area.max.y),
        );
        query.is_region_clear(point, clearance, &filter).then_some(point)
    })
}

/// Place up to `count` points. A placement that runs out of attempts is
/// logged and skipped; the rest of the batch continues.
pub fn place_batch<R: Rng>(rng: &mut R, count: u32, config: &SpawnConfig, query: &dyn SpatialQuery) -> Vec<Vec2> {
    let mut placed = Vec::with_capacity(count as usize);
    for i in 0..count {
        match find_clear_point(rng, &config.area, config.clearance, config.max_attempts, config.blocking, query) {
            Some(point) => placed.push(point),
            None => log::warn!(
                "Placement {} of {} abandoned after {} attempts",
                i + 1,
                count,
                config.max_attempts
            ),
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use heist_core::EntityId;
    use heist_physics::{Collider, SpatialIndex};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn config(area: Aabb2) -> SpawnConfig {
        SpawnConfig {
            area,
            ..Default::default()
        }
    }

    #[test]
    fn test_points_avoid_walls() {
        let mut index = SpatialIndex::new();
        // Wall covering the left half of the area
        index.insert(Collider::rect(
            EntityId::from_raw(1),
            CollisionLayer::WALL,
            Vec2::new(-5.0, 0.0),
            Vec2::new(10.0, 20.0),
            0.0,
        ));
        let area = Aabb2::from_center_size(Vec2::ZERO, Vec2::new(20.0, 20.0));
        let mut rng = SmallRng::seed_from_u64(42);

        let points = place_batch(&mut rng, 20, &config(area), &index);
        assert!(!points.is_empty());
        for point in points {
            assert!(point.x > 0.5, "{:?} overlaps the wall", point);
            assert!(area.contains_point(point));
        }
    }

    #[test]
    fn test_exhausted_placements_are_skipped() {
        let mut index = SpatialIndex::new();
        let area = Aabb2::from_center_size(Vec2::ZERO, Vec2::new(4.0, 4.0));
        index.insert(Collider::rect(EntityId::from_raw(1), CollisionLayer::WALL, Vec2::ZERO, Vec2::new(10.0, 10.0), 0.0));
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(place_batch(&mut rng, 3, &config(area), &index).is_empty());
    }

    #[test]
    fn test_non_blocking_layers_ignored() {
        let mut index = SpatialIndex::new();
        let area = Aabb2::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0));
        index.insert(Collider::rect(EntityId::from_raw(1), CollisionLayer::STREET, Vec2::ZERO, Vec2::new(10.0, 10.0), 0.0));
        let mut rng = SmallRng::seed_from_u64(3);

        assert!(find_clear_point(&mut rng, &area, 0.5, 4, default_blocking(), &index).is_some());
    }
}
