mod common;

use common::{base_config, Harness};
use heist_combat::{DamageSource, Damageable};
use heist_gamestate::{MissionDef, MissionError, MissionEvent, MissionId, MissionState};
use heist_hud::{prompts, EffectKind, PresentationCall, SoundCue, TextSlot};
use heist_math::{Aabb2, Vec2};
use heist_world::prelude::*;

fn zone() -> Aabb2 {
    Aabb2::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0))
}

fn mission_config(required: u32, time_limit: f32) -> WorldConfig {
    base_config().with_missions(vec![MissionSetup {
        def: MissionDef::new("Eliminate", required, time_limit).with_rewards(100, 50),
        zone: Some(zone()),
    }])
}

const MISSION: MissionId = MissionId(1);

#[test]
fn test_kills_complete_mission_and_pay_out() {
    let mut h = Harness::new(mission_config(2, 10.0));
    h.world.spawn_player(Vec2::ZERO).unwrap();
    let first = h.world.spawn_npc(Vec2::new(5.0, 5.0), None).unwrap();
    let second = h.world.spawn_npc(Vec2::new(6.0, 6.0), None).unwrap();
    assert_eq!(h.world.actor(first).unwrap().missions(), &[MISSION]);

    h.press(Action::Interact);
    assert_eq!(h.world.mission(MISSION).unwrap().state(), MissionState::Active);
    assert!(h.presenter.sounds().contains(&SoundCue::MissionStart));
    assert_eq!(
        h.presenter.shown_text(TextSlot::Mission).as_deref(),
        Some("Objective:\n- Eliminate [0 / 2]")
    );
    assert_eq!(h.presenter.shown_text(TextSlot::Timer).as_deref(), Some("Timer: 00:09"));

    h.idle(24);
    h.world.apply_damage(first, 100, DamageSource::Melee);
    assert_eq!(h.world.mission(MISSION).unwrap().kills(), 1);
    assert_eq!(
        h.presenter.shown_text(TextSlot::Mission).as_deref(),
        Some("Objective:\n- Eliminate [1 / 2]")
    );

    h.idle(16);
    h.world.apply_damage(second, 100, DamageSource::Melee);
    let mission = h.world.mission(MISSION).unwrap();
    assert_eq!(mission.state(), MissionState::Succeeded);
    assert!(mission.remaining_time() > 0.0);
    assert_eq!(h.wallet.currency(), 50);
    assert_eq!(h.wallet.experience(), 100);
    assert!(h.presenter.sounds().contains(&SoundCue::MissionSuccess));
    assert_eq!(
        h.presenter.shown_text(TextSlot::Mission).as_deref(),
        Some(prompts::MISSION_COMPLETE)
    );
    assert_eq!(h.world.effects().count(EffectKind::MissionMarker), 0);

    let events = h.world.drain_events();
    assert!(events.contains(&WorldEvent::Mission {
        mission: MISSION,
        event: MissionEvent::Succeeded {
            experience: 100,
            currency: 50,
        },
    }));

    // Text clears once the hide delay runs out
    h.idle(16);
    assert_eq!(h.presenter.shown_text(TextSlot::Mission), None);
    assert_eq!(h.presenter.shown_text(TextSlot::Timer), None);

    // Completed missions stay completed
    let player = h.world.player_id().unwrap();
    h.press(Action::Interact);
    assert_eq!(h.world.mission(MISSION).unwrap().state(), MissionState::Succeeded);
    assert_eq!(
        h.world.activate_mission(MISSION, player),
        Err(MissionError::AlreadySucceeded)
    );
    assert_eq!(h.wallet.currency(), 50);
}

#[test]
fn test_timeout_fails_and_allows_retry() {
    let mut h = Harness::new(mission_config(2, 2.0));
    h.world.spawn_player(Vec2::ZERO).unwrap();
    let npc = h.world.spawn_npc(Vec2::new(5.0, 5.0), None).unwrap();

    h.press(Action::Interact);
    h.idle(4);
    h.world.apply_damage(npc, 100, DamageSource::Melee);
    h.idle(12);

    let mission = h.world.mission(MISSION).unwrap();
    assert_eq!(mission.state(), MissionState::Failed);
    assert_eq!(mission.kills(), 1);
    assert_eq!(mission.remaining_time(), 0.0);
    assert_eq!(h.wallet.currency(), 0);
    assert!(h.presenter.sounds().contains(&SoundCue::MissionFail));
    assert_eq!(
        h.presenter.shown_text(TextSlot::Mission).as_deref(),
        Some(prompts::MISSION_FAILED)
    );

    // Marker hidden on start, shown again after the failure
    let calls = h.presenter.calls();
    let marker = calls
        .iter()
        .find_map(|call| match call {
            PresentationCall::SpawnEffect {
                effect,
                kind: EffectKind::MissionMarker,
                ..
            } => Some(*effect),
            _ => None,
        })
        .unwrap();
    let opacities: Vec<f32> = calls
        .iter()
        .filter_map(|call| match call {
            PresentationCall::EffectOpacity { effect, opacity } if *effect == marker => Some(*opacity),
            _ => None,
        })
        .collect();
    assert_eq!(opacities, vec![0.0, 1.0]);
    assert_eq!(h.world.effects().count(EffectKind::MissionMarker), 1);

    h.press(Action::Interact);
    let mission = h.world.mission(MISSION).unwrap();
    assert_eq!(mission.state(), MissionState::Active);
    assert_eq!(mission.kills(), 0);
    assert_eq!(mission.remaining_time(), 2.0 - common::DT);
}

#[test]
fn test_kill_before_activation_is_not_counted() {
    let mut h = Harness::new(mission_config(1, 10.0));
    h.world.spawn_player(Vec2::ZERO).unwrap();
    let npc = h.world.spawn_npc(Vec2::new(5.0, 5.0), None).unwrap();

    h.world.apply_damage(npc, 100, DamageSource::Melee);
    h.press(Action::Interact);
    let mission = h.world.mission(MISSION).unwrap();
    assert_eq!(mission.state(), MissionState::Active);
    assert_eq!(mission.kills(), 0);
}

#[test]
fn test_npc_spawned_before_mission_does_not_report() {
    let mut h = Harness::new(base_config());
    let player = h.world.spawn_player(Vec2::ZERO).unwrap();
    let early = h.world.spawn_npc(Vec2::new(5.0, 5.0), None).unwrap();
    let mission = h
        .world
        .add_mission(MissionDef::new("Eliminate", 1, 10.0), Some(zone()));
    let late = h.world.spawn_npc(Vec2::new(6.0, 6.0), None).unwrap();
    assert!(h.world.actor(early).unwrap().missions().is_empty());

    h.world.activate_mission(mission, player).unwrap();
    h.world.apply_damage(early, 100, DamageSource::Melee);
    assert_eq!(h.world.mission(mission).unwrap().kills(), 0);
    h.world.apply_damage(late, 100, DamageSource::Melee);
    assert_eq!(h.world.mission(mission).unwrap().state(), MissionState::Succeeded);
}

#[test]
fn test_activation_requires_standing_in_zone() {
    let mut h = Harness::new(mission_config(1, 10.0));
    let player = h.world.spawn_player(Vec2::new(4.0, 0.0)).unwrap();

    h.press(Action::Interact);
    assert_eq!(h.world.mission(MISSION).unwrap().state(), MissionState::Inactive);
    assert_eq!(
        h.world.activate_mission(MISSION, player),
        Err(MissionError::NotInZone)
    );
    assert_eq!(
        h.world.activate_mission(MissionId(9), player),
        Err(MissionError::NoActivationZone)
    );
}

#[test]
fn test_zone_prompts_follow_player() {
    let mut h = Harness::new(mission_config(1, 10.0));
    h.world.spawn_player(Vec2::new(3.0, 0.0)).unwrap();

    for _ in 0..4 {
        h.frame(InputFrame::idle().with_axes(-1.0, 0.0));
    }
    assert_eq!(h.presenter.shown_text(TextSlot::Prompt).as_deref(), Some(prompts::ZONE_ENTER));

    for _ in 0..6 {
        h.frame(InputFrame::idle().with_axes(1.0, 0.0));
    }
    assert_eq!(h.presenter.shown_text(TextSlot::Prompt).as_deref(), Some(prompts::ZONE_EXIT));
}

#[test]
fn test_mission_prefers_zone_over_vehicle() {
    let mut h = Harness::new(mission_config(1, 10.0));
    let player = h.world.spawn_player(Vec2::ZERO).unwrap();
    h.world.spawn_vehicle(Vec2::new(0.5, 0.0), 0.0).unwrap();

    h.press(Action::Interact);
    assert_eq!(h.world.mission(MISSION).unwrap().state(), MissionState::Active);
    assert!(h.world.actor(player).unwrap().is_on_foot());

    // With the mission running the same press takes the vehicle
    h.press(Action::Interact);
    assert!(!h.world.actor(player).unwrap().is_on_foot());
}

/// Start a one-kill mission of `limit` seconds next to a wounded NPC
fn last_second_setup(limit: f32) -> (Harness, heist_core::EntityId) {
    let mut h = Harness::new(mission_config(1, limit));
    h.world.spawn_player(Vec2::ZERO).unwrap();
    let npc = h.world.spawn_npc(Vec2::new(0.0, 0.75), None).unwrap();
    h.press(Action::Interact);
    h.world.apply_damage(npc, 80, DamageSource::Melee);
    assert_eq!(h.world.actor(npc).unwrap().health().current(), 20);
    (h, npc)
}

#[test]
fn test_kill_in_final_frame_beats_timer() {
    let (mut h, npc) = last_second_setup(1.0);
    h.idle(6);
    assert_eq!(h.world.mission(MISSION).unwrap().remaining_time(), common::DT);

    // The knife kill and the timer running out land in the same step
    h.press(Action::Attack);
    assert!(h.world.actor(npc).is_none());
    let mission = h.world.mission(MISSION).unwrap();
    assert_eq!(mission.state(), MissionState::Succeeded);
    assert_eq!(mission.kills(), 1);
    assert_eq!(h.wallet.currency(), 50);
    assert_eq!(h.wallet.experience(), 100);

    let events = h.world.drain_events();
    assert!(!events
        .iter()
        .any(|e| matches!(e, WorldEvent::Mission { event: MissionEvent::Failed { .. }, .. })));
    assert!(!h.presenter.sounds().contains(&SoundCue::MissionFail));
}

#[test]
fn test_kill_one_frame_late_is_too_late() {
    let (mut h, npc) = last_second_setup(1.0);
    h.idle(7);
    assert_eq!(h.world.mission(MISSION).unwrap().state(), MissionState::Failed);

    h.press(Action::Attack);
    assert!(h.world.actor(npc).is_none());
    assert_eq!(h.world.mission(MISSION).unwrap().kills(), 0);
    assert_eq!(h.wallet.currency(), 0);
}

/// Activate, draw the pistol, shoot an NPC left with one round of health.
/// Returns the frame the NPC died on, counting activation as frame 1.
fn shoot_wounded_npc(h: &mut Harness) -> Option<usize> {
    h.world.spawn_player(Vec2::ZERO).unwrap();
    let npc = h.world.spawn_npc(Vec2::new(0.0, 3.0), None).unwrap();
    h.press(Action::Interact);
    h.world.apply_damage(npc, 90, DamageSource::Melee);
    h.press(Action::NextWeapon);
    h.press(Action::Attack);
    let mut frame = 3;
    while h.world.actor(npc).is_some() {
        if frame > 40 {
            return None;
        }
        h.idle(1);
        frame += 1;
    }
    Some(frame)
}

#[test]
fn test_projectile_kill_in_final_frame_beats_timer() {
    let mut calibration = Harness::new(mission_config(1, 60.0));
    let kill_frame = shoot_wounded_npc(&mut calibration).expect("round should reach the NPC");
    assert!(kill_frame > 3, "the round needs travel time");

    let limit = kill_frame as f32 * common::DT;
    let mut h = Harness::new(mission_config(1, limit));
    assert_eq!(shoot_wounded_npc(&mut h), Some(kill_frame));
    let mission = h.world.mission(MISSION).unwrap();
    assert_eq!(mission.state(), MissionState::Succeeded);
    assert_eq!(h.wallet.currency(), 50);
    assert!(!h.presenter.sounds().contains(&SoundCue::MissionFail));
}
