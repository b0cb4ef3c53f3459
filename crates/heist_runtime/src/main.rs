//! Heist headless runner
//!
//! Builds the demo block, replays a scripted input timeline at a fixed
//! frame rate and logs what happened.
//!
//! Run with: cargo run -p heist_runtime
//!       or: cargo run --bin heist -- path/to/world.toml

mod launch;
mod presenter;
mod scenario;

use heist_combat::Damageable;
use heist_gamestate::{SettingsStore, Wallet};
use heist_world::{ActorKind, World, WorldConfig, WorldEvent};
use launch::LaunchConfig;
use presenter::LogPresenter;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let launch = match LaunchConfig::load() {
        Ok(launch) => launch,
        Err(e) => {
            log::error!("Invalid launch options: {}", e);
            return ExitCode::FAILURE;
        }
    };
    launch.print_summary();

    let config = match &launch.world_config {
        Some(path) => match WorldConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load world config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };

    let settings = match SettingsStore::new(&launch.settings).load() {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring unreadable settings {}: {}", launch.settings.display(), e);
            Default::default()
        }
    };
    log::info!("Master volume {:.2}", settings.volume);

    match run(&launch, config, settings.volume) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Simulation could not start: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(launch: &LaunchConfig, config: WorldConfig, volume: f32) -> heist_world::Result<()> {
    let zone = config
        .missions
        .iter()
        .find_map(|setup| setup.zone)
        .map(|zone| zone.center());
    let presenter = Arc::new(LogPresenter::new(volume));
    let wallet = Arc::new(Wallet::new());
    let mut world = World::new(config, presenter.clone(), wallet.clone())?;
    let layout = scenario::build(&mut world)?;

    let mut input = scenario::script(zone);
    let dt = launch.frame_dt();
    let mut destroyed = 0usize;
    for _ in 0..launch.frame_count() {
        input.advance(dt);
        world.step(dt, &input);
        for event in world.drain_events() {
            match event {
                WorldEvent::ActorDestroyed { kind: ActorKind::Npc, .. } => destroyed += 1,
                WorldEvent::ActorDestroyed { kind: ActorKind::Player, .. } => {
                    log::warn!("Player died at {:.2}s", world.elapsed())
                }
                _ => {}
            }
        }
        if world.frame() % (launch.fps as u64 * 5) == 0 {
            log::debug!("{}", world.debug_info());
        }
    }

    log::info!("Finished after {:.2}s: {}", world.elapsed(), world.debug_info());
    log::info!(
        "Wallet: {} currency, {} experience",
        wallet.currency(),
        wallet.experience()
    );
    for mission in world.missions() {
        log::info!(
            "{}: {:?} with {}/{} kills",
            mission.id(),
            mission.state(),
            mission.kills(),
            mission.def().required_kills
        );
    }
    log::info!(
        "NPCs: {} of {} survived, {} destroyed",
        world.npc_count(),
        layout.npcs.len(),
        destroyed
    );
    match world.player() {
        Some(player) => log::info!(
            "Player at {:?} with {}/{} HP",
            player.position(),
            player.health().current(),
            player.health().max()
        ),
        None => log::info!("Player did not survive"),
    }
    if world.vehicle(layout.vehicle).is_none() {
        log::info!("The car was wrecked");
    }
    let stats = presenter.stats();
    log::info!(
        "{} sounds played ({} muted), {} effects spawned, {} still live",
        stats.sounds,
        stats.muted_sounds,
        stats.effects_spawned,
        stats.effects_live
    );
    Ok(())
}
