//! # heist_ai - NPC Behaviour
//!
//! NPCs do not plan paths. They walk straight at destinations handed out by
//! a [`WaypointProvider`] and ask for the next one once they arrive.
//! Spawning scatters NPCs and their waypoints over an area, avoiding
//! blocking geometry with a bounded number of attempts per placement.

pub mod patrol;
pub mod spawn;
pub mod waypoint;

pub use patrol::PatrolAgent;
pub use spawn::{find_clear_point, place_batch, SpawnConfig};
pub use waypoint::{PatrolRoute, RandomWaypoints, WaypointProvider};

pub mod prelude {
    pub use crate::patrol::PatrolAgent;
    pub use crate::spawn::{find_clear_point, place_batch, SpawnConfig};
    pub use crate::waypoint::{PatrolRoute, RandomWaypoints, WaypointProvider};
}
