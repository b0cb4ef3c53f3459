//! Patrol agent

use crate::waypoint::WaypointProvider;
use heist_math::Vec2;
use std::fmt;

/// Walks an NPC between provider destinations
pub struct PatrolAgent {
    provider: Box<dyn WaypointProvider>,
    destination: Option<Vec2>,
    /// Units per second
    pub speed: f32,
    /// Distance under which the destination counts as reached
    pub arrival_threshold: f32,
}

impl PatrolAgent {
    pub fn new(provider: Box<dyn WaypointProvider>, speed: f32) -> Self {
        let mut agent = Self {
            provider,
            destination: None,
            speed,
            arrival_threshold: 0.5,
        };
        agent.destination = agent.provider.next_destination();
        if agent.destination.is_none() {
            log::error!("Patrol agent created without waypoints");
        }
        agent
    }

    pub fn with_arrival_threshold(mut self, threshold: f32) -> Self {
        self.arrival_threshold = threshold;
        self
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    /// Step from `position` towards the destination, returning the new position
    pub fn update(&mut self, position: Vec2, dt: f32) -> Vec2 {
        let Some(destination) = self.destination else {
            return position;
        };

        if self.provider.remaining_distance(position, destination) < self.arrival_threshold {
            self.destination = self.provider.next_destination();
            return position;
        }

        let to_target = destination - position;
        let step = self.speed * dt;
        if step >= to_target.length() {
            destination
        } else {
            position + to_target.normalize() * step
        }
    }
}

impl fmt::Debug for PatrolAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatrolAgent")
            .field("destination", &self.destination)
            .field("speed", &self.speed)
            .field("waypoints", &self.provider.len())
            .finish()
    }
}
