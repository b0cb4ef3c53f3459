//! Simulation world
//!
//! Owns every entity and runs the dual-rate step. Per frame:
//!
//! 1. Logic, once: input, interaction, weapons, throttle
//! 2. Fixed substeps: motion, contacts, projectiles, continuous damage
//! 3. Mission timers, after every kill of the frame has been counted
//! 4. Effects
//!
//! Damage is resolved the moment it is applied. A destruction notifies its
//! dependents (missions, the coupling) before anything else runs.

use crate::actor::{Actor, ActorKind};
use crate::config::WorldConfig;
use crate::coupling;
use crate::effects::Effects;
use crate::error::{CouplingError, Result, WorldError};
use crate::events::WorldEvent;
use crate::input::{InputFrame, InputSource};
use heist_ai::{place_batch, PatrolAgent, RandomWaypoints, WaypointProvider};
use heist_combat::{
    AttackOutcome, AttackRejection, DamageOutcome, DamageSource, DamageTargets, Damageable, ProjectileFate,
    ProjectileSimulator, ProjectileSpawn, WeaponKind, WeaponManager,
};
use heist_core::{EntityId, FixedStepper, IdGenerator};
use heist_gamestate::{MissionController, MissionDef, MissionError, MissionEvent, MissionId, RewardSink};
use heist_hud::{ammo_label, format_timer, objective_text, prompts, EffectId, EffectKind, Presenter, SoundCue, TextSlot};
use heist_math::{Aabb2, Vec2};
use heist_physics::{
    Collider, CollisionLayer, ContactPhase, ContactTracker, QueryFilter, SpatialIndex, SpatialQuery,
};
use heist_vehicle::{CollisionResponse, Vehicle};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Damage lookup over the world's actors and vehicles
struct WorldTargets<'a> {
    actors: &'a mut BTreeMap<EntityId, Actor>,
    vehicles: &'a mut BTreeMap<EntityId, Vehicle>,
}

impl DamageTargets for WorldTargets<'_> {
    fn damageable(&mut self, entity: EntityId) -> Option<&mut dyn Damageable> {
        if let Some(actor) = self.actors.get_mut(&entity) {
            return Some(actor as &mut dyn Damageable);
        }
        self.vehicles
            .get_mut(&entity)
            .map(|vehicle| vehicle as &mut dyn Damageable)
    }
}

struct MissionSlot {
    controller: MissionController,
    /// Trigger collider standing in for the activation zone
    zone_entity: EntityId,
    marker: Option<EffectId>,
}

fn attack_cue(kind: WeaponKind) -> SoundCue {
    match kind {
        WeaponKind::Melee => SoundCue::MeleeSwing,
        WeaponKind::RangedSingle => SoundCue::PistolShot,
        WeaponKind::RangedBurst => SoundCue::RifleShot,
    }
}

fn current_ammo_label(weapons: &WeaponManager) -> String {
    ammo_label(&weapons.current().name, weapons.current_ammo().map(|pool| pool.current()))
}

pub struct World {
    config: WorldConfig,
    ids: IdGenerator,
    stepper: FixedStepper,
    elapsed: f32,
    player: Option<EntityId>,
    actors: BTreeMap<EntityId, Actor>,
    vehicles: BTreeMap<EntityId, Vehicle>,
    /// Walls and streets
    statics: BTreeMap<EntityId, Collider>,
    missions: BTreeMap<MissionId, MissionSlot>,
    next_mission: u32,
    projectiles: ProjectileSimulator,
    index: SpatialIndex,
    contacts: ContactTracker,
    effects: Effects,
    rng: SmallRng,
    presenter: Arc<dyn Presenter>,
    rewards: Arc<dyn RewardSink>,
    events: Vec<WorldEvent>,
}

impl World {
    /// Build an empty world and register the configured missions
    pub fn new(config: WorldConfig, presenter: Arc<dyn Presenter>, rewards: Arc<dyn RewardSink>) -> Result<Self> {
        config.validate()?;
        let stepper = config.simulation.stepper()?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let effects = Effects::new(SmallRng::seed_from_u64(rng.gen()));
        let setups = config.missions.clone();

        let mut world = Self {
            config,
            ids: IdGenerator::new(),
            stepper,
            elapsed: 0.0,
            player: None,
            actors: BTreeMap::new(),
            vehicles: BTreeMap::new(),
            statics: BTreeMap::new(),
            missions: BTreeMap::new(),
            next_mission: 0,
            projectiles: ProjectileSimulator::new(),
            index: SpatialIndex::new(),
            contacts: ContactTracker::new(),
            effects,
            rng,
            presenter,
            rewards,
            events: Vec::new(),
        };
        for setup in setups {
            world.add_mission(setup.def, setup.zone);
        }
        log::info!("World created with {} missions", world.missions.len());
        Ok(world)
    }

    // ---- Population ----

    pub fn add_mission(&mut self, def: MissionDef, zone: Option<Aabb2>) -> MissionId {
        self.next_mission += 1;
        let id = MissionId(self.next_mission);
        let marker = match zone {
            Some(zone) => Some(self.effects.spawn_persistent(
                EffectKind::MissionMarker,
                zone.center(),
                0.0,
                self.presenter.as_ref(),
            )),
            None => None,
        };
        let slot = MissionSlot {
            controller: MissionController::new(id, def, zone, self.rewards.clone()),
            zone_entity: self.ids.next(),
            marker,
        };
        self.missions.insert(id, slot);
        id
    }

    pub fn spawn_player(&mut self, position: Vec2) -> Result<EntityId> {
        if let Some(existing) = self.player {
            return Err(WorldError::PlayerExists(existing));
        }
        let id = self.ids.next();
        let weapons = WeaponManager::new(self.config.weapons.clone())?;
        let actor = Actor::player(id, position, &self.config.player, weapons)?;

        self.presenter
            .set_health_bar(id, actor.health().current(), actor.health().max());
        if let Some(weapons) = actor.weapons() {
            self.presenter.show_text(TextSlot::Ammo, &current_ammo_label(weapons));
        }
        self.actors.insert(id, actor);
        self.player = Some(id);
        log::info!("Player {} spawned at {:?}", id, position);
        Ok(id)
    }

    /// Spawn an NPC that credits its death to every mission registered so far
    pub fn spawn_npc(&mut self, position: Vec2, waypoints: Option<Box<dyn WaypointProvider>>) -> Result<EntityId> {
        let id = self.ids.next();
        let missions = self.missions.keys().copied().collect();
        let mut actor = Actor::npc(id, position, &self.config.npc, missions)?;
        if let Some(provider) = waypoints.filter(|provider| !provider.is_empty()) {
            let patrol = PatrolAgent::new(provider, self.config.npc.move_speed)
                .with_arrival_threshold(self.config.npc.arrival_threshold);
            actor = actor.with_patrol(patrol);
        }
        self.actors.insert(id, actor);
        log::debug!("NPC {} spawned at {:?}", id, position);
        Ok(id)
    }

    pub fn spawn_vehicle(&mut self, position: Vec2, rotation: f32) -> Result<EntityId> {
        let id = self.ids.next();
        let vehicle = Vehicle::new(id, position, rotation, self.config.vehicle.clone())?;
        self.vehicles.insert(id, vehicle);
        log::debug!("Vehicle {} parked at {:?}", id, position);
        Ok(id)
    }

    pub fn add_wall(&mut self, bounds: Aabb2) -> EntityId {
        self.add_static(CollisionLayer::WALL, bounds)
    }

    pub fn add_street(&mut self, bounds: Aabb2) -> EntityId {
        self.add_static(CollisionLayer::STREET, bounds)
    }

    fn add_static(&mut self, layer: CollisionLayer, bounds: Aabb2) -> EntityId {
        let id = self.ids.next();
        self.statics
            .insert(id, Collider::rect(id, layer, bounds.center(), bounds.size(), 0.0));
        id
    }

    /// Scatter the configured number of patrolling NPCs over clear ground.
    ///
    /// Placements that run out of attempts are skipped.
    pub fn populate_npcs(&mut self) -> Vec<EntityId> {
        self.rebuild_index();
        let spawn = self.config.spawn.clone();
        let positions = place_batch(&mut self.rng, spawn.npc_count, &spawn, &self.index);

        let mut spawned = Vec::with_capacity(positions.len());
        for position in positions {
            let points = place_batch(&mut self.rng, spawn.waypoints_per_npc, &spawn, &self.index);
            let provider: Option<Box<dyn WaypointProvider>> = if points.is_empty() {
                None
            } else {
                Some(Box::new(RandomWaypoints::new(points, SmallRng::seed_from_u64(self.rng.gen()))))
            };
            match self.spawn_npc(position, provider) {
                Ok(id) => spawned.push(id),
                Err(e) => log::error!("Failed to spawn NPC at {:?}: {}", position, e),
            }
        }
        log::info!("Spawned {} of {} NPCs", spawned.len(), spawn.npc_count);
        spawned
    }

    // ---- Step ----

    /// Advance the world by one frame of `dt` seconds
    pub fn step(&mut self, dt: f32, input: &dyn InputSource) {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring frame with delta {}", dt);
            return;
        }
        let frame = InputFrame::sample(input);
        self.elapsed += dt;

        self.rebuild_index();
        self.logic_phase(dt, &frame);

        let substeps = self.stepper.advance(dt);
        let fixed_dt = self.stepper.fixed_dt();
        for _ in 0..substeps {
            self.fixed_step(fixed_dt, &frame);
        }

        self.update_missions(dt);
        self.effects.update(dt, self.presenter.as_ref());
    }

    fn logic_phase(&mut self, dt: f32, frame: &InputFrame) {
        self.update_weapons(dt);

        let Some(player) = self.player else {
            return;
        };
        if frame.interact {
            self.interact(player);
        }
        let switch = frame.weapon_switch();
        if switch != 0 {
            self.switch_weapon(player, switch);
        }
        if frame.attack {
            self.attack(player);
        }

        let driven = self.actors.get(&player).and_then(Actor::vehicle);
        if let Some(vehicle) = driven.and_then(|id| self.vehicles.get_mut(&id)) {
            vehicle.drive(frame.vertical, frame.horizontal, dt);
        }
    }

    fn fixed_step(&mut self, dt: f32, frame: &InputFrame) {
        self.move_player(dt, frame);
        for actor in self.actors.values_mut() {
            if actor.is_on_foot() {
                actor.advance_patrol(dt);
            }
        }
        for vehicle in self.vehicles.values_mut() {
            vehicle.integrate_motion(dt);
        }
        self.pin_occupants();
        self.rebuild_index();

        self.resolve_vehicle_contacts(dt);
        self.resolve_npc_contacts(dt);
        self.resolve_zone_contacts(dt);
        self.step_projectiles(dt);
        self.apply_continuous_damage(dt);
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for collider in self.statics.values() {
            self.index.insert(*collider);
        }
        for slot in self.missions.values() {
            if let Some(zone) = slot.controller.zone().filter(|_| slot.controller.is_armed()) {
                self.index.insert(Collider::rect(
                    slot.zone_entity,
                    CollisionLayer::TRIGGER,
                    zone.center(),
                    zone.size(),
                    0.0,
                ));
            }
        }
        for actor in self.actors.values().filter(|actor| actor.is_on_foot()) {
            self.index.insert(actor.collider());
        }
        for vehicle in self.vehicles.values() {
            self.index.insert(vehicle.collider());
        }
    }

    // ---- Player actions ----

    fn interact(&mut self, player: EntityId) {
        let Some(actor) = self.actors.get(&player) else {
            return;
        };
        if actor.vehicle().is_some() {
            if let Err(e) = self.exit_vehicle(player) {
                log::debug!("Exit rejected: {}", e);
            }
            return;
        }

        let bounds = actor.bounds();
        let armed: Vec<MissionId> = self
            .missions
            .iter()
            .filter(|(_, slot)| slot.controller.is_armed() && slot.controller.is_in_zone(&bounds))
            .map(|(id, _)| *id)
            .collect();
        if !armed.is_empty() {
            for mission in armed {
                if let Err(e) = self.activate_mission(mission, player) {
                    log::debug!("{} not started: {}", mission, e);
                }
            }
            return;
        }

        match self.reachable_vehicle(actor) {
            Some(vehicle) => {
                if let Err(e) = self.enter_vehicle(player, vehicle) {
                    log::debug!("Enter rejected: {}", e);
                }
            }
            None => log::debug!("Nothing to interact with at {:?}", actor.position()),
        }
    }

    fn reachable_vehicle(&self, actor: &Actor) -> Option<EntityId> {
        let origin = actor.position();
        self.vehicles
            .values()
            .filter(|v| !v.is_destroyed() && v.occupant().is_none() && coupling::can_reach(actor, v))
            .min_by(|a, b| {
                a.position()
                    .distance_squared(origin)
                    .total_cmp(&b.position().distance_squared(origin))
            })
            .map(|v| v.id())
    }

    /// Put `actor` in `vehicle`
    pub fn enter_vehicle(&mut self, actor: EntityId, vehicle: EntityId) -> std::result::Result<(), CouplingError> {
        let driver = self
            .actors
            .get_mut(&actor)
            .ok_or(CouplingError::UnknownEntity(actor))?;
        let car = self
            .vehicles
            .get_mut(&vehicle)
            .ok_or(CouplingError::UnknownEntity(vehicle))?;
        coupling::enter_vehicle(driver, car)?;

        self.index.remove(actor);
        self.presenter.set_visible(actor, false);
        self.events.push(WorldEvent::VehicleEntered { actor, vehicle });
        Ok(())
    }

    /// Take `actor` out of whatever vehicle it is in
    pub fn exit_vehicle(&mut self, actor: EntityId) -> std::result::Result<Vec2, CouplingError> {
        let driver = self
            .actors
            .get_mut(&actor)
            .ok_or(CouplingError::UnknownEntity(actor))?;
        let vehicle = driver.vehicle().ok_or(CouplingError::NotInVehicle(actor))?;
        let car = self
            .vehicles
            .get_mut(&vehicle)
            .ok_or(CouplingError::UnknownEntity(vehicle))?;
        let position = coupling::exit_vehicle(driver, car, &self.config.coupling)?;

        self.presenter.set_visible(actor, true);
        self.events.push(WorldEvent::VehicleExited {
            actor,
            vehicle,
            position,
        });
        Ok(position)
    }

    /// Start `mission` for `actor`, which must stand in the activation zone
    pub fn activate_mission(&mut self, mission: MissionId, actor: EntityId) -> std::result::Result<(), MissionError> {
        let bounds = self
            .actors
            .get(&actor)
            .map(Actor::bounds)
            .ok_or(MissionError::NotInZone)?;
        let slot = self
            .missions
            .get_mut(&mission)
            .ok_or(MissionError::NoActivationZone)?;
        let events = slot.controller.activate(&bounds)?;
        self.present_mission(mission, events);
        Ok(())
    }

    fn switch_weapon(&mut self, actor: EntityId, direction: i32) {
        let Some(weapons) = self
            .actors
            .get_mut(&actor)
            .filter(|a| a.is_on_foot())
            .and_then(Actor::weapons_mut)
        else {
            return;
        };
        let slot = weapons.switch_weapon(direction);
        self.presenter.play_sound(SoundCue::WeaponSwitch);
        self.presenter.show_text(TextSlot::Ammo, &current_ammo_label(weapons));
        self.events.push(WorldEvent::WeaponSwitched { actor, slot });
    }

    fn attack(&mut self, actor_id: EntityId) {
        let offset = self.config.player.attack_offset;
        let Some(actor) = self.actors.get_mut(&actor_id) else {
            return;
        };
        if !actor.is_on_foot() {
            log::debug!("Actor {} cannot attack from inside a vehicle", actor_id);
            return;
        }
        let origin = actor.attack_origin(offset);
        let Some(weapons) = actor.weapons_mut() else {
            return;
        };

        let outcome = weapons.attack(&origin, &self.index);
        let kind = weapons.current().kind;
        let trigger = weapons.current().animation_trigger.clone();
        let label = current_ammo_label(weapons);

        match outcome {
            AttackOutcome::Rejected(reason) => {
                if let AttackRejection::OutOfAmmo { .. } = reason {
                    self.presenter.show_text(TextSlot::Prompt, prompts::NOT_ENOUGH_AMMO);
                }
                self.events.push(WorldEvent::AttackRejected { actor: actor_id, reason });
            }
            AttackOutcome::Melee(strike) => {
                self.presenter.set_sprite_state(actor_id, &trigger);
                self.presenter.play_sound(attack_cue(kind));
                let results = strike.apply(&mut WorldTargets {
                    actors: &mut self.actors,
                    vehicles: &mut self.vehicles,
                });
                self.events.push(WorldEvent::MeleeStrike {
                    actor: actor_id,
                    hits: strike.hits.len(),
                });
                for (target, outcome) in results {
                    self.after_damage(target, DamageSource::Melee, outcome);
                }
            }
            AttackOutcome::Fired { spawns, .. } => {
                self.presenter.set_sprite_state(actor_id, &trigger);
                self.presenter.play_sound(attack_cue(kind));
                self.presenter.show_text(TextSlot::Ammo, &label);
                for spawn in spawns {
                    self.launch(actor_id, spawn);
                }
            }
        }
    }

    /// Tick cooldowns and fire burst shots that came due
    fn update_weapons(&mut self, dt: f32) {
        let offset = self.config.player.attack_offset;
        let mut due = Vec::new();
        for actor in self.actors.values_mut() {
            let origin = actor.attack_origin(offset);
            let id = actor.id();
            if let Some(weapons) = actor.weapons_mut() {
                due.extend(weapons.update(dt, &origin).into_iter().map(|spawn| (id, spawn)));
            }
        }
        for (owner, spawn) in due {
            self.presenter.play_sound(SoundCue::RifleShot);
            self.launch(owner, spawn);
        }
    }

    fn launch(&mut self, owner: EntityId, spawn: ProjectileSpawn) -> EntityId {
        let id = self.ids.next();
        let position = spawn.origin;
        self.projectiles.spawn(id, Some(owner), spawn);
        self.events.push(WorldEvent::ProjectileSpawned {
            projectile: id,
            owner,
            position,
        });
        id
    }

    // ---- Fixed phase ----

    fn move_player(&mut self, dt: f32, frame: &InputFrame) {
        let movement = frame.movement();
        if movement.is_zero() {
            return;
        }
        let Some(actor) = self.player.and_then(|id| self.actors.get_mut(&id)) else {
            return;
        };
        if !actor.is_on_foot() {
            return;
        }

        actor.face(movement);
        let target = actor.position() + movement * (actor.move_speed() * dt);
        let walls = QueryFilter::new(CollisionLayer::WALL.into());
        if self.index.overlap_aabb(&actor.bounds_at(target), &walls).is_empty() {
            actor.set_position(target);
        } else {
            log::trace!("Actor {} blocked at {:?}", actor.id(), target);
        }
    }

    fn pin_occupants(&mut self) {
        for actor in self.actors.values_mut() {
            if let Some(vehicle) = actor.vehicle().and_then(|id| self.vehicles.get(&id)) {
                coupling::pin_to_vehicle(actor, vehicle);
            }
        }
    }

    fn touching(&self, owner: EntityId, bounds: &Aabb2, filter: QueryFilter) -> Vec<(EntityId, CollisionLayer)> {
        self.index
            .overlap_aabb(bounds, &filter.with_exclude(owner))
            .into_iter()
            .map(|hit| (hit.entity, hit.layer))
            .collect()
    }

    fn resolve_vehicle_contacts(&mut self, dt: f32) {
        let ids: Vec<EntityId> = self.vehicles.keys().copied().collect();
        for id in ids {
            let Some(bounds) = self.vehicles.get(&id).map(Vehicle::footprint_bounds) else {
                continue;
            };
            let touching = self.touching(id, &bounds, QueryFilter::default());
            for contact in self.contacts.update(id, touching, dt) {
                let Some(vehicle) = self.vehicles.get_mut(&id) else {
                    break;
                };
                let response = vehicle.on_contact(contact.phase, contact.layer);
                self.apply_collision(id, contact.other, response);
            }
        }
    }

    fn apply_collision(&mut self, vehicle: EntityId, other: EntityId, response: CollisionResponse) {
        if response == CollisionResponse::None {
            return;
        }
        self.events.push(WorldEvent::VehicleCollision {
            vehicle,
            other,
            response,
        });

        match response {
            CollisionResponse::WallImpact {
                occupant_damage,
                occupant,
                outcome,
                ..
            } => {
                if let Some(occupant) = occupant {
                    self.apply_damage(occupant, occupant_damage, DamageSource::OccupantImpact);
                }
                self.after_damage(vehicle, DamageSource::WallImpact, outcome);
            }
            CollisionResponse::NpcImpact { damage } => {
                self.apply_damage(other, damage, DamageSource::VehicleImpact);
            }
            CollisionResponse::SoftBlock => log::trace!("Vehicle {} blocked by {}", vehicle, other),
            CollisionResponse::None => {}
        }
    }

    /// Moving vehicles touching an NPC keep draining it until contact ends
    fn resolve_npc_contacts(&mut self, dt: f32) {
        let npcs: Vec<(EntityId, Aabb2)> = self
            .actors
            .values()
            .filter(|actor| actor.kind() == ActorKind::Npc)
            .map(|actor| (actor.id(), actor.bounds()))
            .collect();
        let rate = self.config.npc.continuous_damage;

        for (id, bounds) in npcs {
            let touching = self.touching(id, &bounds, QueryFilter::new(CollisionLayer::VEHICLE.into()));
            let contacts = self.contacts.update(id, touching, dt);
            let struck = contacts.iter().any(|c| {
                matches!(c.phase, ContactPhase::Enter) && self.vehicles.get(&c.other).map_or(false, Vehicle::is_active)
            });
            let in_contact = contacts.iter().any(|c| !matches!(c.phase, ContactPhase::Exit));

            let Some(npc) = self.actors.get_mut(&id) else {
                continue;
            };
            let health = npc.health_mut();
            if struck {
                health.start_continuous_damage(rate);
            } else if !in_contact && health.is_continuous_damage_active() {
                health.stop_continuous_damage();
            }
        }
    }

    fn resolve_zone_contacts(&mut self, dt: f32) {
        let Some(bounds) = self.player.and_then(|id| self.actors.get(&id)).map(Actor::bounds) else {
            return;
        };
        let Some(player) = self.player else {
            return;
        };
        let touching = self.touching(player, &bounds, QueryFilter::new(CollisionLayer::TRIGGER.into()));
        for contact in self.contacts.update(player, touching, dt) {
            let armed = self
                .missions
                .values()
                .any(|slot| slot.zone_entity == contact.other && slot.controller.is_armed());
            if !armed {
                continue;
            }
            match contact.phase {
                ContactPhase::Enter => self.presenter.show_text(TextSlot::Prompt, prompts::ZONE_ENTER),
                ContactPhase::Exit => self.presenter.show_text(TextSlot::Prompt, prompts::ZONE_EXIT),
                ContactPhase::Stay => {}
            }
        }
    }

    fn step_projectiles(&mut self, dt: f32) {
        let resolutions = self.projectiles.step(
            dt,
            &self.index,
            &mut WorldTargets {
                actors: &mut self.actors,
                vehicles: &mut self.vehicles,
            },
        );
        for resolution in resolutions {
            match resolution.fate {
                ProjectileFate::Hit { target, outcome, .. } => {
                    self.events.push(WorldEvent::ProjectileHit {
                        projectile: resolution.projectile,
                        target,
                        outcome,
                    });
                    if let Some(outcome) = outcome {
                        self.after_damage(target, DamageSource::Projectile, outcome);
                    }
                }
                ProjectileFate::Expired(reason) => self.events.push(WorldEvent::ProjectileExpired {
                    projectile: resolution.projectile,
                    reason,
                }),
            }
        }
    }

    fn apply_continuous_damage(&mut self, dt: f32) {
        let draining: Vec<EntityId> = self
            .actors
            .values()
            .filter(|actor| actor.health().is_continuous_damage_active())
            .map(Actor::id)
            .collect();
        for id in draining {
            if let Some(actor) = self.actors.get_mut(&id) {
                let outcome = actor.health_mut().apply_continuous_damage(dt);
                self.after_damage(id, DamageSource::Continuous, outcome);
            }
        }
    }

    // ---- Damage and destruction ----

    /// Damage any actor or vehicle, resolving feedback and destruction.
    ///
    /// Returns `None` when `target` does not exist.
    pub fn apply_damage(&mut self, target: EntityId, amount: i32, source: DamageSource) -> Option<DamageOutcome> {
        let outcome = if let Some(actor) = self.actors.get_mut(&target) {
            actor.take_damage(amount, source)
        } else if let Some(vehicle) = self.vehicles.get_mut(&target) {
            vehicle.take_damage(amount, source)
        } else {
            return None;
        };
        self.after_damage(target, source, outcome);
        Some(outcome)
    }

    fn after_damage(&mut self, target: EntityId, source: DamageSource, outcome: DamageOutcome) {
        if outcome == DamageOutcome::Ignored {
            return;
        }
        self.events.push(WorldEvent::Damaged { target, source, outcome });

        if let Some(actor) = self.actors.get(&target) {
            match actor.kind() {
                ActorKind::Npc if outcome.dealt() > 0 => {
                    let position = actor.position();
                    self.effects
                        .spawn_splash(position, self.config.npc.splash_lifetime, self.presenter.as_ref());
                }
                ActorKind::Player => {
                    self.presenter
                        .set_health_bar(target, actor.health().current(), actor.health().max());
                }
                ActorKind::Npc => {}
            }
            if outcome.is_destroyed() {
                self.destroy_actor(target);
            }
        } else if outcome.is_destroyed() && self.vehicles.contains_key(&target) {
            self.destroy_vehicle(target);
        }
    }

    fn destroy_actor(&mut self, id: EntityId) {
        let Some(mut actor) = self.actors.remove(&id) else {
            return;
        };
        if let Some(vehicle) = actor.vehicle().and_then(|v| self.vehicles.get_mut(&v)) {
            if let Err(e) = coupling::release(&mut actor, vehicle) {
                log::warn!("Could not release vehicle of destroyed actor {}: {}", id, e);
            }
        }
        self.contacts.forget(id);
        self.index.remove(id);
        self.presenter.set_visible(id, false);
        log::info!("{:?} {} destroyed at {:?}", actor.kind(), id, actor.position());
        self.events.push(WorldEvent::ActorDestroyed {
            actor: id,
            kind: actor.kind(),
            position: actor.position(),
        });

        match actor.kind() {
            ActorKind::Player => {
                if self.player == Some(id) {
                    self.player = None;
                }
            }
            ActorKind::Npc => {
                for mission in actor.missions() {
                    let events = match self.missions.get_mut(mission) {
                        Some(slot) => slot.controller.register_kill(),
                        None => {
                            log::warn!("NPC {} reports to unknown {}", id, mission);
                            continue;
                        }
                    };
                    self.present_mission(*mission, events);
                }
                self.effects
                    .spawn_ground_marker(actor.position(), self.config.npc.marker_fade, self.presenter.as_ref());
            }
        }
    }

    fn destroy_vehicle(&mut self, id: EntityId) {
        let Some(mut vehicle) = self.vehicles.remove(&id) else {
            return;
        };
        self.contacts.forget(id);
        self.index.remove(id);
        self.presenter.set_visible(id, false);
        self.effects
            .spawn_wreck(vehicle.position(), vehicle.rotation(), self.presenter.as_ref());

        let occupant = vehicle.occupant();
        self.events.push(WorldEvent::VehicleDestroyed { vehicle: id, occupant });

        let Some(occupant) = occupant else {
            return;
        };
        let Some(actor) = self.actors.get_mut(&occupant) else {
            return;
        };
        match coupling::force_eject(actor, &mut vehicle, &self.config.coupling) {
            Ok(ejection) => {
                self.presenter.set_visible(occupant, true);
                self.events.push(WorldEvent::Ejected {
                    actor: occupant,
                    vehicle: id,
                    position: ejection.position,
                });
                self.after_damage(occupant, DamageSource::Ejection, ejection.damage);
            }
            Err(e) => log::warn!("Could not eject {} from vehicle {}: {}", occupant, id, e),
        }
    }

    // ---- Missions ----

    fn update_missions(&mut self, dt: f32) {
        let ids: Vec<MissionId> = self.missions.keys().copied().collect();
        for id in ids {
            if let Some(slot) = self.missions.get_mut(&id) {
                let events = slot.controller.update(dt);
                self.present_mission(id, events);
            }
        }
    }

    fn present_mission(&mut self, id: MissionId, events: Vec<MissionEvent>) {
        let Some(slot) = self.missions.get(&id) else {
            return;
        };
        let objective = slot.controller.def().objective.as_str();
        let presenter = self.presenter.as_ref();

        for event in events {
            match &event {
                MissionEvent::Started { objective, required } => {
                    presenter.play_sound(SoundCue::MissionStart);
                    presenter.hide_text(TextSlot::Prompt);
                    presenter.show_text(TextSlot::Mission, &objective_text(objective, 0, *required));
                }
                MissionEvent::KillRegistered { kills, required } => {
                    presenter.show_text(TextSlot::Mission, &objective_text(objective, *kills, *required));
                }
                MissionEvent::TimerTick { remaining } => {
                    presenter.show_text(TextSlot::Timer, &format_timer(*remaining));
                }
                MissionEvent::Succeeded { .. } => {
                    presenter.play_sound(SoundCue::MissionSuccess);
                    presenter.show_text(TextSlot::Mission, prompts::MISSION_COMPLETE);
                }
                MissionEvent::Failed { .. } => {
                    presenter.play_sound(SoundCue::MissionFail);
                    presenter.show_text(TextSlot::Mission, prompts::MISSION_FAILED);
                }
                MissionEvent::MarkerShown => {
                    if let Some(marker) = slot.marker {
                        presenter.set_effect_opacity(marker, 1.0);
                    }
                }
                MissionEvent::MarkerHidden => {
                    if let Some(marker) = slot.marker {
                        presenter.set_effect_opacity(marker, 0.0);
                    }
                }
                MissionEvent::MarkerDestroyed => {
                    if let Some(marker) = slot.marker {
                        self.effects.despawn(marker, presenter);
                    }
                }
                MissionEvent::HideUi => {
                    presenter.hide_text(TextSlot::Mission);
                    presenter.hide_text(TextSlot::Timer);
                }
            }
            if !matches!(event, MissionEvent::TimerTick { .. }) {
                self.events.push(WorldEvent::Mission { mission: id, event });
            }
        }
    }

    // ---- Accessors ----

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.stepper.frame()
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Option<&Actor> {
        self.player.and_then(|id| self.actors.get(&id))
    }

    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn npc_count(&self) -> usize {
        self.actors
            .values()
            .filter(|actor| actor.kind() == ActorKind::Npc)
            .count()
    }

    pub fn vehicle(&self, id: EntityId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn mission(&self, id: MissionId) -> Option<&MissionController> {
        self.missions.get(&id).map(|slot| &slot.controller)
    }

    pub fn missions(&self) -> impl Iterator<Item = &MissionController> {
        self.missions.values().map(|slot| &slot.controller)
    }

    pub fn projectiles(&self) -> &ProjectileSimulator {
        &self.projectiles
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get debug info string
    pub fn debug_info(&self) -> String {
        format!(
            "t={:.2}s actors={} vehicles={} projectiles={} effects={} missions={}",
            self.elapsed,
            self.actors.len(),
            self.vehicles.len(),
            self.projectiles.len(),
            self.effects.len(),
            self.missions.len(),
        )
    }
}
