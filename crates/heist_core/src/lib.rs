//! # heist_core - Simulation Core
//!
//! Foundational primitives shared by every simulation crate:
//! - Entity identifiers and a thread-safe generator
//! - An owned scheduler for delayed actions (burst shots, UI hides, fades)
//! - The simulation step timing contract
//! - Core error types

pub mod error;
pub mod id;
pub mod scheduler;
pub mod time;

pub use error::*;
pub use id::*;
pub use scheduler::*;
pub use time::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{CoreError, Result};
    pub use crate::id::{EntityId, IdGenerator};
    pub use crate::scheduler::{Scheduler, TaskId};
    pub use crate::time::FixedStepper;
}
