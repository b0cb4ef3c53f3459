//! Waypoint providers

use heist_math::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

/// Supplies patrol destinations
pub trait WaypointProvider: Send {
    /// Pick the next destination, `None` when there are no waypoints
    fn next_destination(&mut self) -> Option<Vec2>;

    /// Distance left to walk from `position` to `destination`
    fn remaining_distance(&self, position: Vec2, destination: Vec2) -> f32 {
        position.distance(destination)
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Picks uniformly among a fixed set of points
#[derive(Debug, Clone)]
pub struct RandomWaypoints {
    points: Vec<Vec2>,
    rng: SmallRng,
}

impl RandomWaypoints {
    pub fn new(points: Vec<Vec2>, rng: SmallRng) -> Self {
        Self { points, rng }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

impl WaypointProvider for RandomWaypoints {
    fn next_destination(&mut self) -> Option<Vec2> {
        if self.points.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.points.len());
        Some(self.points[index])
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Visits points in order and loops
#[derive(Debug, Clone, Default)]
pub struct PatrolRoute {
    points: Vec<Vec2>,
    next: usize,
}

impl PatrolRoute {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points, next: 0 }
    }
}

impl WaypointProvider for PatrolRoute {
    fn next_destination(&mut self) -> Option<Vec2> {
        let point = *self.points.get(self.next)?;
        self.next = (self.next + 1) % self.points.len();
        Some(point)
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
