//! Contact classification across fixed steps
//!
//! Feed the tracker the set of bodies each entity touches every fixed step;
//! it reports which contacts began, persisted or ended.

use crate::layers::CollisionLayer;
use heist_core::EntityId;
use std::collections::BTreeMap;

/// Contact lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// First step of contact
    Enter,
    /// Contact continues from the previous step
    Stay,
    /// Contact ended this step
    Exit,
}

/// A classified contact between `owner` and `other`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub owner: EntityId,
    pub other: EntityId,
    pub layer: CollisionLayer,
    pub phase: ContactPhase,
    /// Seconds the contact had lasted before this step
    pub time_in_contact: f32,
}

#[derive(Debug, Clone, Copy)]
struct ContactState {
    layer: CollisionLayer,
    time_in_contact: f32,
}

/// Tracks ongoing contacts per owning entity
#[derive(Debug, Default)]
pub struct ContactTracker {
    contacts: BTreeMap<EntityId, BTreeMap<EntityId, ContactState>>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `owner`'s contact set with `touching` and classify the difference
    pub fn update<I>(&mut self, owner: EntityId, touching: I, dt: f32) -> Vec<ContactEvent>
    where
        I: IntoIterator<Item = (EntityId, CollisionLayer)>,
    {
        let previous = self.contacts.remove(&owner).unwrap_or_default();
        let mut current = BTreeMap::new();
        let mut events = Vec::new();

        for (other, layer) in touching {
            if other == owner || current.contains_key(&other) {
                continue;
            }
            let state = match previous.get(&other) {
                Some(state) => {
                    events.push(ContactEvent {
                        owner,
                        other,
                        layer,
                        phase: ContactPhase::Stay,
                        time_in_contact: state.time_in_contact,
                    });
                    ContactState {
                        layer,
                        time_in_contact: state.time_in_contact + dt,
                    }
                }
                None => {
                    events.push(ContactEvent {
                        owner,
                        other,
                        layer,
                        phase: ContactPhase::Enter,
                        time_in_contact: 0.0,
                    });
                    ContactState {
                        layer,
                        time_in_contact: dt,
                    }
                }
            };
            current.insert(other, state);
        }

        for (other, state) in previous {
            if !current.contains_key(&other) {
                events.push(ContactEvent {
                    owner,
                    other,
                    layer: state.layer,
                    phase: ContactPhase::Exit,
                    time_in_contact: state.time_in_contact,
                });
            }
        }

        if !current.is_empty() {
            self.contacts.insert(owner, current);
        }
        events
    }

    /// Drop `entity` as owner and as contact partner without emitting exits
    pub fn forget(&mut self, entity: EntityId) {
        self.contacts.remove(&entity);
        for set in self.contacts.values_mut() {
            set.remove(&entity);
        }
        self.contacts.retain(|_, set| !set.is_empty());
    }

    pub fn is_touching(&self, owner: EntityId, other: EntityId) -> bool {
        self.contacts
            .get(&owner)
            .map_or(false, |set| set.contains_key(&other))
    }

    /// Number of bodies `owner` currently touches
    pub fn contact_count(&self, owner: EntityId) -> usize {
        self.contacts.get(&owner).map_or(0, BTreeMap::len)
    }
}
