#![allow(dead_code)]

use heist_gamestate::Wallet;
use heist_hud::RecordingPresenter;
use heist_physics::PhysicsConfig;
use heist_world::prelude::*;
use std::sync::Arc;

/// Frame length used by the scenarios; a power of two keeps timers exact
pub const DT: f32 = 0.125;

pub struct Harness {
    pub world: World,
    pub presenter: Arc<RecordingPresenter>,
    pub wallet: Arc<Wallet>,
}

impl Harness {
    pub fn new(config: WorldConfig) -> Self {
        let presenter = Arc::new(RecordingPresenter::new());
        let wallet = Arc::new(Wallet::new());
        let world = World::new(config, presenter.clone(), wallet.clone()).unwrap();
        Self {
            world,
            presenter,
            wallet,
        }
    }

    pub fn frame(&mut self, input: InputFrame) {
        self.world.step(DT, &input);
    }

    pub fn idle(&mut self, frames: usize) {
        for _ in 0..frames {
            self.frame(InputFrame::idle());
        }
    }

    pub fn press(&mut self, action: Action) {
        self.frame(InputFrame::idle().with_action(action));
    }
}

/// Defaults with an exact fixed step and no missions
pub fn base_config() -> WorldConfig {
    WorldConfig::default()
        .with_simulation(PhysicsConfig::default().with_timestep(0.0625))
        .with_missions(Vec::new())
}
