//! Headless presenter
//!
//! Writes presentation calls to the log instead of a screen and keeps a
//! few counters for the end-of-run summary.

use heist_core::EntityId;
use heist_hud::{EffectId, EffectKind, Presenter, SoundCue, TextSlot};
use heist_math::Vec2;
use parking_lot::Mutex;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PresenterStats {
    pub sounds: u64,
    pub muted_sounds: u64,
    pub effects_spawned: u64,
    pub effects_live: u64,
}

pub struct LogPresenter {
    volume: f32,
    stats: Mutex<PresenterStats>,
}

impl LogPresenter {
    /// `volume` in `[0, 1]`; zero mutes every cue
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            stats: Mutex::new(PresenterStats::default()),
        }
    }

    pub fn stats(&self) -> PresenterStats {
        *self.stats.lock()
    }
}

impl Presenter for LogPresenter {
    fn set_sprite_state(&self, entity: EntityId, state: &str) {
        log::trace!("sprite {} -> {}", entity, state);
    }

    fn set_visible(&self, entity: EntityId, visible: bool) {
        log::trace!("visible {} = {}", entity, visible);
    }

    fn play_sound(&self, cue: SoundCue) {
        let mut stats = self.stats.lock();
        if self.volume <= 0.0 {
            stats.muted_sounds += 1;
            return;
        }
        stats.sounds += 1;
        log::debug!("sound {:?} at volume {:.2}", cue, self.volume);
    }

    fn show_text(&self, slot: TextSlot, text: &str) {
        match slot {
            TextSlot::Timer => log::trace!("[{:?}] {}", slot, text),
            _ => log::info!("[{:?}] {}", slot, text.replace('\n', " ")),
        }
    }

    fn hide_text(&self, slot: TextSlot) {
        log::debug!("[{:?}] hidden", slot);
    }

    fn set_health_bar(&self, entity: EntityId, current: i32, max: i32) {
        log::info!("health {}: {}/{}", entity, current, max);
    }

    fn spawn_effect(&self, effect: EffectId, kind: EffectKind, position: Vec2, rotation: f32) {
        let mut stats = self.stats.lock();
        stats.effects_spawned += 1;
        stats.effects_live += 1;
        log::debug!("effect {:?} {:?} at {:?} rotated {:.0}", effect, kind, position, rotation);
    }

    fn set_effect_opacity(&self, _effect: EffectId, _opacity: f32) {}

    fn despawn_effect(&self, effect: EffectId) {
        let mut stats = self.stats.lock();
        stats.effects_live = stats.effects_live.saturating_sub(1);
        log::trace!("effect {:?} despawned", effect);
    }
}
