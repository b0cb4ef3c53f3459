//! Presenter trait and stock implementations

use heist_core::EntityId;
use heist_math::Vec2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One-shot sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    MeleeSwing,
    PistolShot,
    RifleShot,
    WeaponSwitch,
    MissionStart,
    MissionSuccess,
    MissionFail,
}

/// On-screen text areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextSlot {
    Mission,
    Timer,
    Ammo,
    Prompt,
}

/// Transient visual effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    BloodSplash,
    /// Fading mark left where an NPC died
    GroundMarker,
    DestroyedVehicle,
    /// Mission activation marker
    MissionMarker,
}

/// Handle to a spawned effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(pub u64);

/// Receives presentation notifications from the simulation
pub trait Presenter: Send + Sync {
    /// Set the displayed animation state or trigger of an entity
    fn set_sprite_state(&self, entity: EntityId, state: &str);

    fn set_visible(&self, entity: EntityId, visible: bool);

    fn play_sound(&self, cue: SoundCue);

    fn show_text(&self, slot: TextSlot, text: &str);

    fn hide_text(&self, slot: TextSlot);

    fn set_health_bar(&self, entity: EntityId, current: i32, max: i32);

    fn spawn_effect(&self, effect: EffectId, kind: EffectKind, position: Vec2, rotation: f32);

    fn set_effect_opacity(&self, effect: EffectId, opacity: f32);

    fn despawn_effect(&self, effect: EffectId);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn set_sprite_state(&self, _entity: EntityId, _state: &str) {}
    fn set_visible(&self, _entity: EntityId, _visible: bool) {}
    fn play_sound(&self, _cue: SoundCue) {}
    fn show_text(&self, _slot: TextSlot, _text: &str) {}
    fn hide_text(&self, _slot: TextSlot) {}
    fn set_health_bar(&self, _entity: EntityId, _current: i32, _max: i32) {}
    fn spawn_effect(&self, _effect: EffectId, _kind: EffectKind, _position: Vec2, _rotation: f32) {}
    fn set_effect_opacity(&self, _effect: EffectId, _opacity: f32) {}
    fn despawn_effect(&self, _effect: EffectId) {}
}

/// A presenter call, as recorded by [`RecordingPresenter`]
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCall {
    SpriteState { entity: EntityId, state: String },
    Visible { entity: EntityId, visible: bool },
    Sound(SoundCue),
    ShowText { slot: TextSlot, text: String },
    HideText(TextSlot),
    HealthBar { entity: EntityId, current: i32, max: i32 },
    SpawnEffect { effect: EffectId, kind: EffectKind, position: Vec2, rotation: f32 },
    EffectOpacity { effect: EffectId, opacity: f32 },
    DespawnEffect(EffectId),
}

/// Keeps every call in order
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    calls: Mutex<Vec<PresentationCall>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: PresentationCall) {
        log::trace!("present {:?}", call);
        self.calls.lock().push(call);
    }

    /// Snapshot of all calls so far
    pub fn calls(&self) -> Vec<PresentationCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn sounds(&self) -> Vec<SoundCue> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PresentationCall::Sound(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    /// Text currently shown in `slot`, if any
    pub fn shown_text(&self, slot: TextSlot) -> Option<String> {
        let calls = self.calls.lock();
        for call in calls.iter().rev() {
            match call {
                PresentationCall::ShowText { slot: s, text } if *s == slot => return Some(text.clone()),
                PresentationCall::HideText(s) if *s == slot => return None,
                _ => {}
            }
        }
        None
    }

    pub fn count_effects(&self, kind: EffectKind) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, PresentationCall::SpawnEffect { kind: k, .. } if *k == kind))
            .count()
    }

    pub fn sprite_states(&self, entity: EntityId) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PresentationCall::SpriteState { entity: e, state } if *e == entity => Some(state.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn set_sprite_state(&self, entity: EntityId, state: &str) {
        self.record(PresentationCall::SpriteState {
            entity,
            state: state.to_string(),
        });
    }

    fn set_visible(&self, entity: EntityId, visible: bool) {
        self.record(PresentationCall::Visible { entity, visible });
    }

    fn play_sound(&self, cue: SoundCue) {
        self.record(PresentationCall::Sound(cue));
    }

    fn show_text(&self, slot: TextSlot, text: &str) {
        self.record(PresentationCall::ShowText {
            slot,
            text: text.to_string(),
        });
    }

    fn hide_text(&self, slot: TextSlot) {
        self.record(PresentationCall::HideText(slot));
    }

    fn set_health_bar(&self, entity: EntityId, current: i32, max: i32) {
        self.record(PresentationCall::HealthBar { entity, current, max });
    }

    fn spawn_effect(&self, effect: EffectId, kind: EffectKind, position: Vec2, rotation: f32) {
        self.record(PresentationCall::SpawnEffect {
            effect,
            kind,
            position,
            rotation,
        });
    }

    fn set_effect_opacity(&self, effect: EffectId, opacity: f32) {
        self.record(PresentationCall::EffectOpacity { effect, opacity });
    }

    fn despawn_effect(&self, effect: EffectId) {
        self.record(PresentationCall::DespawnEffect(effect));
    }
}
