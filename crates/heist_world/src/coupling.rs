//! Actor-vehicle coupling
//!
//! The only code that pairs an actor with a vehicle. Both sides of the
//! pairing change together or not at all.

use crate::actor::{Actor, ActorMode};
use crate::config::CouplingConfig;
use crate::error::CouplingError;
use heist_combat::{DamageOutcome, DamageSource, Damageable};
use heist_math::Vec2;
use heist_vehicle::Vehicle;

/// Result of a forced eject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ejection {
    pub position: Vec2,
    pub damage: DamageOutcome,
}

/// Where an actor leaving `vehicle` is placed
pub fn exit_position(vehicle: &Vehicle, config: &CouplingConfig) -> Vec2 {
    let direction = Vec2::from_angle_degrees(vehicle.rotation() + config.exit_angle);
    vehicle.position() + direction * config.exit_distance
}

/// Whether `actor` stands within the vehicle's current footprint
pub fn can_reach(actor: &Actor, vehicle: &Vehicle) -> bool {
    vehicle.footprint_bounds().intersects(&actor.bounds())
}

/// Put `actor` behind the wheel of `vehicle`
pub fn enter_vehicle(actor: &mut Actor, vehicle: &mut Vehicle) -> Result<(), CouplingError> {
    if actor.is_destroyed() {
        return Err(CouplingError::ActorDestroyed(actor.id()));
    }
    if actor.vehicle().is_some() {
        return Err(CouplingError::AlreadyInVehicle(actor.id()));
    }
    if vehicle.is_destroyed() {
        return Err(CouplingError::VehicleDestroyed(vehicle.id()));
    }
    if vehicle.occupant().is_some() {
        return Err(CouplingError::VehicleOccupied(vehicle.id()));
    }
    if !can_reach(actor, vehicle) {
        return Err(CouplingError::OutOfReach {
            actor: actor.id(),
            vehicle: vehicle.id(),
        });
    }
    if !vehicle.activate(actor.id()) {
        return Err(CouplingError::VehicleOccupied(vehicle.id()));
    }

    if let Some(weapons) = actor.weapons_mut() {
        weapons.cancel_pending();
    }
    actor.set_mode(ActorMode::InVehicle(vehicle.id()));
    actor.set_position(vehicle.position());
    log::info!("Actor {} entered vehicle {}", actor.id(), vehicle.id());
    Ok(())
}

/// Take `actor` out of `vehicle`, returning where it was placed
pub fn exit_vehicle(actor: &mut Actor, vehicle: &mut Vehicle, config: &CouplingConfig) -> Result<Vec2, CouplingError> {
    release(actor, vehicle)?;
    let position = exit_position(vehicle, config);
    actor.set_position(position);
    log::info!("Actor {} exited vehicle {} at {:?}", actor.id(), vehicle.id(), position);
    Ok(position)
}

/// Throw the occupant out of a destroyed vehicle and charge the ejection penalty
pub fn force_eject(actor: &mut Actor, vehicle: &mut Vehicle, config: &CouplingConfig) -> Result<Ejection, CouplingError> {
    let position = exit_vehicle(actor, vehicle, config)?;
    let damage = actor.take_damage(config.ejection_damage, DamageSource::Ejection);
    log::info!("Actor {} ejected from vehicle {} for {:?}", actor.id(), vehicle.id(), damage);
    Ok(Ejection { position, damage })
}

/// Park the vehicle and free the actor without moving either
pub fn release(actor: &mut Actor, vehicle: &mut Vehicle) -> Result<(), CouplingError> {
    match actor.mode() {
        ActorMode::OnFoot => return Err(CouplingError::NotInVehicle(actor.id())),
        ActorMode::InVehicle(id) if id != vehicle.id() || vehicle.occupant() != Some(actor.id()) => {
            return Err(CouplingError::WrongVehicle {
                actor: actor.id(),
                vehicle: vehicle.id(),
            })
        }
        ActorMode::InVehicle(_) => {}
    }
    vehicle.deactivate();
    actor.set_mode(ActorMode::OnFoot);
    Ok(())
}

/// Keep an occupant on top of its vehicle
pub fn pin_to_vehicle(actor: &mut Actor, vehicle: &Vehicle) {
    if actor.vehicle() == Some(vehicle.id()) {
        actor.set_position(vehicle.position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlayerConfig, NpcConfig};
    use approx::assert_relative_eq;
    use heist_combat::{WeaponDef, WeaponManager};
    use heist_core::EntityId;
    use heist_vehicle::{VehicleConfig, VehicleState};

    fn player_at(position: Vec2) -> Actor {
        let weapons = WeaponManager::new(WeaponDef::default_loadout()).unwrap();
        Actor::player(EntityId::from_raw(1), position, &PlayerConfig::default(), weapons).unwrap()
    }

    fn vehicle_at(position: Vec2, rotation: f32) -> Vehicle {
        Vehicle::new(EntityId::from_raw(10), position, rotation, VehicleConfig::default()).unwrap()
    }

    #[test]
    fn test_enter_and_exit() {
        let mut actor = player_at(Vec2::new(0.9, 0.0));
        let mut vehicle = vehicle_at(Vec2::ZERO, 0.0);
        assert_eq!(vehicle.footprint_size(), Vec2::new(2.0, 1.0));

        enter_vehicle(&mut actor, &mut vehicle).unwrap();
        assert_eq!(actor.mode(), ActorMode::InVehicle(vehicle.id()));
        assert_eq!(actor.position(), Vec2::ZERO);
        assert_eq!(vehicle.state(), VehicleState::Driving);
        assert_eq!(vehicle.footprint_size(), Vec2::new(1.5, 1.0));
        assert_eq!(vehicle.speed(), 0.0);

        vehicle.set_pose(Vec2::new(2.0, 3.0), 30.0);
        let config = CouplingConfig::default();
        let position = exit_vehicle(&mut actor, &mut vehicle, &config).unwrap();
        let expected = Vec2::new(2.0, 3.0) + Vec2::from_angle_degrees(120.0) * 1.5;
        assert_relative_eq!(position.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(position.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(position.distance(vehicle.position()), 1.5, epsilon = 1e-5);
        assert_eq!(actor.position(), position);
        assert!(actor.is_on_foot());
        assert_eq!(vehicle.state(), VehicleState::Idle);
        assert_eq!(vehicle.occupant(), None);
    }

    #[test]
    fn test_enter_rejections() {
        let mut far = player_at(Vec2::new(5.0, 0.0));
        let mut vehicle = vehicle_at(Vec2::ZERO, 0.0);
        assert!(matches!(
            enter_vehicle(&mut far, &mut vehicle),
            Err(CouplingError::OutOfReach { .. })
        ));

        let mut driver = player_at(Vec2::ZERO);
        enter_vehicle(&mut driver, &mut vehicle).unwrap();
        assert_eq!(
            enter_vehicle(&mut driver, &mut vehicle),
            Err(CouplingError::AlreadyInVehicle(driver.id()))
        );

        let mut other = Actor::npc(EntityId::from_raw(2), Vec2::ZERO, &NpcConfig::default(), Vec::new()).unwrap();
        assert_eq!(
            enter_vehicle(&mut other, &mut vehicle),
            Err(CouplingError::VehicleOccupied(vehicle.id()))
        );
    }

    #[test]
    fn test_exit_requires_vehicle() {
        let mut actor = player_at(Vec2::ZERO);
        let mut vehicle = vehicle_at(Vec2::ZERO, 0.0);
        assert_eq!(
            exit_vehicle(&mut actor, &mut vehicle, &CouplingConfig::default()),
            Err(CouplingError::NotInVehicle(actor.id()))
        );
    }

    #[test]
    fn test_force_eject_applies_penalty() {
        let mut actor = player_at(Vec2::ZERO);
        let mut vehicle = vehicle_at(Vec2::ZERO, 0.0);
        enter_vehicle(&mut actor, &mut vehicle).unwrap();
        vehicle.take_damage(500, DamageSource::WallImpact);

        let ejection = force_eject(&mut actor, &mut vehicle, &CouplingConfig::default()).unwrap();
        assert_eq!(ejection.damage.dealt(), 20);
        assert_eq!(actor.health().current(), 80);
        assert!(actor.is_on_foot());
        assert_relative_eq!(ejection.position.y, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_destroyed_vehicle_cannot_be_entered() {
        let mut actor = player_at(Vec2::ZERO);
        let mut vehicle = vehicle_at(Vec2::ZERO, 0.0);
        vehicle.take_damage(100, DamageSource::WallImpact);
        assert_eq!(
            enter_vehicle(&mut actor, &mut vehicle),
            Err(CouplingError::VehicleDestroyed(vehicle.id()))
        );
    }
}
