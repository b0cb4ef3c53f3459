//! Axis-aligned bounding regions

use crate::vector::Vec2;

/// Axis-aligned bounding box in world space
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create from center and full size
    #[inline]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounds of a `size` rectangle centered at `center` and rotated by `rotation` degrees
    pub fn from_rotated_rect(center: Vec2, size: Vec2, rotation: f32) -> Self {
        let rad = crate::radians(rotation);
        let (sin, cos) = rad.sin_cos();
        let half = size * 0.5;
        let extent = Vec2::new(
            half.x * cos.abs() + half.y * sin.abs(),
            half.x * sin.abs() + half.y * cos.abs(),
        );
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (full extents)
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> f32 {
        let size = self.size();
        size.x * size.y
    }

    /// Check if a point is inside
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if two boxes overlap (touching edges count)
    #[inline]
    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Check if a circle overlaps this box
    #[inline]
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = self.closest_point(center);
        closest.distance_squared(center) <= radius * radius
    }

    /// Closest point inside the box to `point`
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Shrink by a uniform margin on every side
    #[inline]
    pub fn shrink(&self, margin: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(margin),
            max: self.max - Vec2::splat(margin),
        }
    }

    /// Check if the box is valid (min <= max)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_intersects() {
        let a = Aabb2::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = Aabb2::from_center_size(Vec2::new(1.5, 0.0), Vec2::new(2.0, 2.0));
        let c = Aabb2::from_center_size(Vec2::new(5.0, 0.0), Vec2::new(2.0, 2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_circle_overlap() {
        let a = Aabb2::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0));
        assert!(a.intersects_circle(Vec2::new(1.4, 0.0), 0.5));
        assert!(!a.intersects_circle(Vec2::new(1.6, 0.0), 0.5));
    }

    #[test]
    fn test_rotated_rect_swaps_extents() {
        let b = Aabb2::from_rotated_rect(Vec2::ZERO, Vec2::new(2.0, 1.0), 90.0);
        let size = b.size();
        assert_relative_eq!(size.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(size.y, 2.0, epsilon = 1e-5);
    }
}
