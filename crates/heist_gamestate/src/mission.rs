//! Mission lifecycle
//!
//! `Inactive -> Active -> {Succeeded, Failed}`. A failed mission re-arms its
//! marker and may be started again from scratch; a succeeded one is closed
//! for good.

use crate::error::MissionError;
use crate::reward::RewardSink;
use heist_core::Scheduler;
use heist_math::Aabb2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Handle given to spawned entities so they can report kills
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MissionId(pub u32);

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mission-{}", self.0)
    }
}

/// Mission definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionDef {
    pub objective: String,
    pub required_kills: u32,
    /// Seconds
    pub time_limit: f32,
    pub reward_experience: u32,
    pub reward_currency: u32,
    /// Seconds the mission text stays up after the mission ends
    pub ui_hide_delay: f32,
}

impl Default for MissionDef {
    fn default() -> Self {
        Self {
            objective: "Kill all targets".into(),
            required_kills: 5,
            time_limit: 120.0,
            reward_experience: 100,
            reward_currency: 50,
            ui_hide_delay: 2.0,
        }
    }
}

impl MissionDef {
    pub fn new(objective: impl Into<String>, required_kills: u32, time_limit: f32) -> Self {
        Self {
            objective: objective.into(),
            required_kills,
            time_limit,
            ..Default::default()
        }
    }

    pub fn with_rewards(mut self, experience: u32, currency: u32) -> Self {
        self.reward_experience = experience;
        self.reward_currency = currency;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionState {
    Inactive,
    Active,
    Succeeded,
    Failed,
}

impl MissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Visibility of the mission's world marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Visible,
    Hidden,
    Destroyed,
}

/// Notification produced by a mission transition
#[derive(Debug, Clone, PartialEq)]
pub enum MissionEvent {
    Started { objective: String, required: u32 },
    KillRegistered { kills: u32, required: u32 },
    TimerTick { remaining: f32 },
    Succeeded { experience: u32, currency: u32 },
    Failed { kills: u32 },
    MarkerShown,
    MarkerHidden,
    MarkerDestroyed,
    /// The post-mission delay ran out
    HideUi,
}

/// Slack on the countdown so accumulated frame deltas reach zero on time
const TIMER_EPSILON: f32 = 1e-4;

enum UiTask {
    Hide,
}

/// One timed objective
pub struct MissionController {
    id: MissionId,
    def: MissionDef,
    state: MissionState,
    kills: u32,
    remaining: f32,
    zone: Option<Aabb2>,
    marker: MarkerState,
    ui_tasks: Scheduler<UiTask>,
    rewards: Arc<dyn RewardSink>,
}

impl MissionController {
    /// Create a mission. Without an activation zone the mission logs an
    /// error and refuses every activation.
    pub fn new(id: MissionId, def: MissionDef, zone: Option<Aabb2>, rewards: Arc<dyn RewardSink>) -> Self {
        if zone.is_none() {
            log::error!("{} '{}' has no activation zone and is disabled", id, def.objective);
        }
        let marker = if zone.is_some() { MarkerState::Visible } else { MarkerState::Hidden };
        Self {
            id,
            remaining: def.time_limit,
            def,
            state: MissionState::Inactive,
            kills: 0,
            zone,
            marker,
            ui_tasks: Scheduler::new(),
            rewards,
        }
    }

    #[inline]
    pub fn id(&self) -> MissionId {
        self.id
    }

    pub fn def(&self) -> &MissionDef {
        &self.def
    }

    #[inline]
    pub fn state(&self) -> MissionState {
        self.state
    }

    #[inline]
    pub fn kills(&self) -> u32 {
        self.kills
    }

    #[inline]
    pub fn remaining_time(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn marker(&self) -> MarkerState {
        self.marker
    }

    pub fn zone(&self) -> Option<Aabb2> {
        self.zone
    }

    /// Whether standing in the zone and pressing interact would start the mission
    pub fn is_armed(&self) -> bool {
        self.zone.is_some() && matches!(self.state, MissionState::Inactive | MissionState::Failed)
    }

    pub fn is_in_zone(&self, bounds: &Aabb2) -> bool {
        self.zone.map_or(false, |zone| zone.intersects(bounds))
    }

    /// Start the mission for an actor whose footprint is `actor_bounds`
    pub fn activate(&mut self, actor_bounds: &Aabb2) -> Result<Vec<MissionEvent>, MissionError> {
        match self.state {
            MissionState::Active => return Err(MissionError::AlreadyActive),
            MissionState::Succeeded => return Err(MissionError::AlreadySucceeded),
            MissionState::Inactive | MissionState::Failed => {}
        }
        let zone = self.zone.ok_or(MissionError::NoActivationZone)?;
        if !zone.intersects(actor_bounds) {
            return Err(MissionError::NotInZone);
        }

        self.state = MissionState::Active;
        self.kills = 0;
        self.remaining = self.def.time_limit;
        self.marker = MarkerState::Hidden;
        self.ui_tasks.cancel_all();
        log::info!("{} started: {}", self.id, self.def.objective);

        let mut events = vec![
            MissionEvent::Started {
                objective: self.def.objective.clone(),
                required: self.def.required_kills,
            },
            MissionEvent::MarkerHidden,
            MissionEvent::TimerTick {
                remaining: self.remaining,
            },
        ];
        // Nothing to kill
        if self.kills >= self.def.required_kills {
            events.extend(self.succeed());
        }
        Ok(events)
    }

    /// Count a qualifying kill. Ignored unless the mission is active.
    pub fn register_kill(&mut self) -> Vec<MissionEvent> {
        if self.state != MissionState::Active {
            log::debug!("{} ignoring kill while {:?}", self.id, self.state);
            return Vec::new();
        }

        self.kills += 1;
        let mut events = vec![MissionEvent::KillRegistered {
            kills: self.kills,
            required: self.def.required_kills,
        }];
        if self.kills >= self.def.required_kills {
            events.extend(self.succeed());
        }
        events
    }

    /// Tick the countdown and any pending UI hide
    pub fn update(&mut self, dt: f32) -> Vec<MissionEvent> {
        let mut events: Vec<MissionEvent> = self
            .ui_tasks
            .poll(dt)
            .into_iter()
            .map(|UiTask::Hide| MissionEvent::HideUi)
            .collect();

        if self.state == MissionState::Active {
            self.remaining = (self.remaining - dt).max(0.0);
            if self.remaining <= TIMER_EPSILON {
                self.remaining = 0.0;
                events.extend(self.fail());
            } else {
                events.push(MissionEvent::TimerTick {
                    remaining: self.remaining,
                });
            }
        }
        events
    }

    fn succeed(&mut self) -> Vec<MissionEvent> {
        self.state = MissionState::Succeeded;
        self.marker = MarkerState::Destroyed;
        self.rewards.add_experience(self.def.reward_experience);
        self.rewards.add_currency(self.def.reward_currency);
        self.ui_tasks.schedule(self.def.ui_hide_delay, UiTask::Hide);
        log::info!(
            "{} accomplished: {} XP and {} currency awarded",
            self.id,
            self.def.reward_experience,
            self.def.reward_currency
        );
        vec![
            MissionEvent::Succeeded {
                experience: self.def.reward_experience,
                currency: self.def.reward_currency,
            },
            MissionEvent::MarkerDestroyed,
        ]
    }

    fn fail(&mut self) -> Vec<MissionEvent> {
        self.state = MissionState::Failed;
        self.marker = MarkerState::Visible;
        self.ui_tasks.schedule(self.def.ui_hide_delay, UiTask::Hide);
        log::info!("{} failed with {}/{} kills", self.id, self.kills, self.def.required_kills);
        vec![MissionEvent::Failed { kills: self.kills }, MissionEvent::MarkerShown]
    }
}

impl fmt::Debug for MissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissionController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("kills", &self.kills)
            .field("remaining", &self.remaining)
            .field("marker", &self.marker)
            .finish()
    }
}
