//! Transient visual effects
//!
//! Blood splashes vanish after a fixed lifetime, ground markers fade out
//! linearly, wrecks stay until too many pile up. Everything is driven by
//! [`Effects::update`].

use heist_core::Scheduler;
use heist_hud::{EffectId, EffectKind, Presenter};
use heist_math::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;
use std::collections::{BTreeMap, VecDeque};

/// Wrecks kept on screen before the oldest is cleared
pub const DEFAULT_WRECK_LIMIT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    elapsed: f32,
    duration: f32,
}

#[derive(Debug)]
pub struct Effects {
    next_id: u64,
    despawns: Scheduler<EffectId>,
    fades: BTreeMap<EffectId, Fade>,
    live: BTreeMap<EffectId, EffectKind>,
    wrecks: VecDeque<EffectId>,
    wreck_limit: usize,
    rng: SmallRng,
}

impl Effects {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            next_id: 1,
            despawns: Scheduler::new(),
            fades: BTreeMap::new(),
            live: BTreeMap::new(),
            wrecks: VecDeque::new(),
            wreck_limit: DEFAULT_WRECK_LIMIT,
            rng,
        }
    }

    /// Keep at most `limit` wrecks alive, at least one
    pub fn with_wreck_limit(mut self, limit: usize) -> Self {
        self.wreck_limit = limit.max(1);
        self
    }

    fn spawn(&mut self, kind: EffectKind, position: Vec2, rotation: f32, presenter: &dyn Presenter) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, kind);
        presenter.spawn_effect(id, kind, position, rotation);
        id
    }

    /// Splash that disappears after `lifetime` seconds
    pub fn spawn_splash(&mut self, position: Vec2, lifetime: f32, presenter: &dyn Presenter) -> EffectId {
        let id = self.spawn(EffectKind::BloodSplash, position, 0.0, presenter);
        self.despawns.schedule(lifetime, id);
        id
    }

    /// Randomly rotated marker fading from opaque to clear over `duration`
    pub fn spawn_ground_marker(&mut self, position: Vec2, duration: f32, presenter: &dyn Presenter) -> EffectId {
        let rotation = self.rng.gen_range(0.0..360.0);
        let id = self.spawn(EffectKind::GroundMarker, position, rotation, presenter);
        presenter.set_effect_opacity(id, 1.0);
        self.fades.insert(
            id,
            Fade {
                elapsed: 0.0,
                duration: duration.max(f32::EPSILON),
            },
        );
        id
    }

    /// Wreck left where a vehicle was destroyed. The oldest wreck goes
    /// once the limit is exceeded.
    pub fn spawn_wreck(&mut self, position: Vec2, rotation: f32, presenter: &dyn Presenter) -> EffectId {
        let id = self.spawn(EffectKind::DestroyedVehicle, position, rotation, presenter);
        self.wrecks.push_back(id);
        while self.wrecks.len() > self.wreck_limit {
            if let Some(oldest) = self.wrecks.pop_front() {
                log::debug!("Clearing wreck {:?}", oldest);
                self.despawn(oldest, presenter);
            }
        }
        id
    }

    /// Persistent effect, removed only with [`Effects::despawn`]
    pub fn spawn_persistent(
        &mut self,
        kind: EffectKind,
        position: Vec2,
        rotation: f32,
        presenter: &dyn Presenter,
    ) -> EffectId {
        self.spawn(kind, position, rotation, presenter)
    }

    pub fn despawn(&mut self, id: EffectId, presenter: &dyn Presenter) -> bool {
        if self.live.remove(&id).is_none() {
            return false;
        }
        self.fades.remove(&id);
        self.wrecks.retain(|wreck| *wreck != id);
        self.despawns.cancel_where(|pending| *pending == id);
        presenter.despawn_effect(id);
        true
    }

    /// Advance fades and expire timed effects
    pub fn update(&mut self, dt: f32, presenter: &dyn Presenter) {
        for id in self.despawns.poll(dt) {
            if self.live.remove(&id).is_some() {
                presenter.despawn_effect(id);
            }
        }

        let mut finished = Vec::new();
        for (id, fade) in self.fades.iter_mut() {
            fade.elapsed += dt;
            let opacity = (1.0 - fade.elapsed / fade.duration).clamp(0.0, 1.0);
            presenter.set_effect_opacity(*id, opacity);
            if fade.elapsed >= fade.duration {
                finished.push(*id);
            }
        }
        for id in finished {
            self.fades.remove(&id);
            self.live.remove(&id);
            presenter.despawn_effect(id);
        }
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn count(&self, kind: EffectKind) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }

    /// Current opacity of a fading effect
    pub fn opacity(&self, id: EffectId) -> Option<f32> {
        self.fades
            .get(&id)
            .map(|fade| (1.0 - fade.elapsed / fade.duration).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use heist_hud::{PresentationCall, RecordingPresenter};
    use rand::SeedableRng;

    fn effects() -> Effects {
        Effects::new(SmallRng::seed_from_u64(3))
    }

    #[test]
    fn test_splash_expires() {
        let presenter = RecordingPresenter::new();
        let mut fx = effects();
        let id = fx.spawn_splash(Vec2::ZERO, 1.0, &presenter);
        fx.update(0.5, &presenter);
        assert_eq!(fx.count(EffectKind::BloodSplash), 1);
        fx.update(0.5, &presenter);
        assert!(fx.is_empty());
        assert!(presenter.calls().contains(&PresentationCall::DespawnEffect(id)));
    }

    #[test]
    fn test_marker_fades_linearly() {
        let presenter = RecordingPresenter::new();
        let mut fx = effects();
        let id = fx.spawn_ground_marker(Vec2::ZERO, 4.0, &presenter);
        fx.update(1.0, &presenter);
        assert_relative_eq!(fx.opacity(id).unwrap(), 0.75);
        fx.update(2.0, &presenter);
        assert_relative_eq!(fx.opacity(id).unwrap(), 0.25);
        fx.update(1.0, &presenter);
        assert_eq!(fx.opacity(id), None);
        assert!(fx.is_empty());

        let rotation = presenter.calls().into_iter().find_map(|call| match call {
            PresentationCall::SpawnEffect { rotation, .. } => Some(rotation),
            _ => None,
        });
        let rotation = rotation.unwrap();
        assert!((0.0..360.0).contains(&rotation));
    }

    #[test]
    fn test_wreck_persists_until_despawned() {
        let presenter = RecordingPresenter::new();
        let mut fx = effects();
        let id = fx.spawn_wreck(Vec2::new(1.0, 2.0), 45.0, &presenter);
        fx.update(1000.0, &presenter);
        assert_eq!(fx.count(EffectKind::DestroyedVehicle), 1);
        assert!(fx.despawn(id, &presenter));
        assert!(!fx.despawn(id, &presenter));
    }

    #[test]
    fn test_oldest_wreck_cleared_over_limit() {
        let presenter = RecordingPresenter::new();
        let mut fx = effects().with_wreck_limit(2);
        let first = fx.spawn_wreck(Vec2::ZERO, 0.0, &presenter);
        let second = fx.spawn_wreck(Vec2::ONE, 0.0, &presenter);
        fx.despawn(second, &presenter);
        fx.spawn_wreck(Vec2::ONE, 0.0, &presenter);
        assert_eq!(fx.count(EffectKind::DestroyedVehicle), 2);

        fx.spawn_wreck(Vec2::new(2.0, 2.0), 0.0, &presenter);
        assert_eq!(fx.count(EffectKind::DestroyedVehicle), 2);
        assert!(presenter.calls().contains(&PresentationCall::DespawnEffect(first)));
        assert!(!fx.despawn(first, &presenter));
    }
}
