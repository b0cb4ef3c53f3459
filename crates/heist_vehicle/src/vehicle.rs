//! Vehicle state machine

use crate::config::VehicleConfig;
use heist_combat::{impact_damage, DamageOutcome, DamageSource, Damageable, HealthLedger};
use heist_core::EntityId;
use heist_math::{move_towards, sign_or_zero, Aabb2, Vec2};
use heist_physics::{Collider, CollisionLayer, ContactPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    /// Parked: no occupant, zero speed, input ignored
    Idle,
    /// Occupied and responding to input
    Driving,
}

/// What a contact did to the vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionResponse {
    None,
    /// Hit a wall: vehicle damaged and stopped, occupant owed `occupant_damage`
    WallImpact {
        speed: f32,
        vehicle_damage: i32,
        occupant_damage: i32,
        occupant: Option<EntityId>,
        outcome: DamageOutcome,
    },
    /// Ran into an NPC, which is owed `damage`. The vehicle keeps going.
    NpcImpact { damage: i32 },
    /// Stopped without damage
    SoftBlock,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    id: EntityId,
    position: Vec2,
    /// Degrees
    rotation: f32,
    state: VehicleState,
    speed: f32,
    steering: f32,
    occupant: Option<EntityId>,
    health: HealthLedger,
    config: VehicleConfig,
}

impl Vehicle {
    pub fn new(id: EntityId, position: Vec2, rotation: f32, config: VehicleConfig) -> heist_combat::Result<Self> {
        Ok(Self {
            id,
            position,
            rotation,
            state: VehicleState::Idle,
            speed: 0.0,
            steering: 0.0,
            occupant: None,
            health: HealthLedger::new(config.max_health)?,
            config,
        })
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn state(&self) -> VehicleState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == VehicleState::Driving
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Unit vector the vehicle drives along at positive speed
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle_degrees(self.rotation + self.config.forward_offset)
    }

    pub fn footprint_size(&self) -> Vec2 {
        match self.state {
            VehicleState::Idle => self.config.idle_footprint,
            VehicleState::Driving => self.config.driving_footprint,
        }
    }

    pub fn footprint_bounds(&self) -> Aabb2 {
        Aabb2::from_rotated_rect(self.position, self.footprint_size(), self.rotation)
    }

    pub fn collider(&self) -> Collider {
        Collider::rect(self.id, CollisionLayer::VEHICLE, self.position, self.footprint_size(), self.rotation)
    }

    /// Idle -> Driving. Fails when occupied or destroyed.
    pub fn activate(&mut self, occupant: EntityId) -> bool {
        if self.state != VehicleState::Idle || self.health.is_destroyed() {
            log::debug!("Vehicle {} cannot be activated in {:?}", self.id, self.state);
            return false;
        }
        self.state = VehicleState::Driving;
        self.occupant = Some(occupant);
        self.speed = 0.0;
        self.steering = 0.0;
        log::info!("Vehicle {} driven by {}", self.id, occupant);
        true
    }

    /// Driving -> Idle, returning the former occupant
    pub fn deactivate(&mut self) -> Option<EntityId> {
        if self.state != VehicleState::Driving {
            return None;
        }
        self.state = VehicleState::Idle;
        self.speed = 0.0;
        self.steering = 0.0;
        let occupant = self.occupant.take();
        log::info!("Vehicle {} parked", self.id);
        occupant
    }

    /// Integrate throttle into speed and latch steering. Once per frame.
    pub fn drive(&mut self, throttle: f32, steering: f32, dt: f32) {
        if self.state != VehicleState::Driving {
            self.speed = 0.0;
            self.steering = 0.0;
            return;
        }

        let throttle = throttle.clamp(-1.0, 1.0);
        if throttle != 0.0 {
            self.speed += throttle * self.config.acceleration * dt;
        } else {
            self.speed = move_towards(self.speed, 0.0, self.config.deceleration * dt);
        }
        self.speed = self.speed.clamp(-self.config.max_speed, self.config.max_speed);
        self.steering = steering.clamp(-1.0, 1.0);
    }

    /// Advance position and rotation. Once per fixed step.
    ///
    /// Positive steering turns clockwise while moving forward and
    /// counter-clockwise in reverse.
    pub fn integrate_motion(&mut self, dt: f32) {
        if self.state != VehicleState::Driving {
            return;
        }
        self.position += self.forward() * (self.speed * dt);
        if self.speed != 0.0 {
            self.rotation -= self.steering * self.config.turn_rate * dt * sign_or_zero(self.speed);
        }
    }

    /// Apply the collision policy for a contact with a body on `layer`
    pub fn on_contact(&mut self, phase: ContactPhase, layer: CollisionLayer) -> CollisionResponse {
        if self.state != VehicleState::Driving || Self::is_exempt(layer) {
            return CollisionResponse::None;
        }

        match phase {
            ContactPhase::Enter if layer == CollisionLayer::WALL => {
                let speed = self.speed;
                let vehicle_damage = impact_damage(speed, self.config.wall_damage_factor);
                let occupant_damage = impact_damage(speed, self.config.occupant_damage_factor);
                self.speed = 0.0;
                let outcome = self.health.apply_damage(vehicle_damage);
                log::debug!(
                    "Vehicle {} hit a wall at {:.2}: {} to vehicle, {} to occupant",
                    self.id,
                    speed,
                    vehicle_damage,
                    occupant_damage
                );
                CollisionResponse::WallImpact {
                    speed,
                    vehicle_damage,
                    occupant_damage,
                    occupant: self.occupant,
                    outcome,
                }
            }
            ContactPhase::Enter if layer == CollisionLayer::NPC => CollisionResponse::NpcImpact {
                damage: impact_damage(self.speed, self.config.npc_impact_factor),
            },
            ContactPhase::Enter => {
                self.speed = 0.0;
                CollisionResponse::SoftBlock
            }
            ContactPhase::Stay if layer != CollisionLayer::NPC => {
                self.speed = 0.0;
                CollisionResponse::SoftBlock
            }
            ContactPhase::Stay | ContactPhase::Exit => CollisionResponse::None,
        }
    }

    /// Layers that never affect the vehicle
    fn is_exempt(layer: CollisionLayer) -> bool {
        matches!(
            layer,
            CollisionLayer::PLAYER | CollisionLayer::STREET | CollisionLayer::TRIGGER | CollisionLayer::PROJECTILE
        )
    }

    /// Snap the vehicle to a pose, used when placing it in the world
    pub fn set_pose(&mut self, position: Vec2, rotation: f32) {
        self.position = position;
        self.rotation = rotation;
    }
}

impl Damageable for Vehicle {
    fn health(&self) -> &HealthLedger {
        &self.health
    }

    fn health_mut(&mut self) -> &mut HealthLedger {
        &mut self.health
    }

    fn take_damage(&mut self, amount: i32, source: DamageSource) -> DamageOutcome {
        let outcome = self.health.apply_damage(amount);
        if outcome.is_destroyed() {
            log::info!("Vehicle {} destroyed by {:?}", self.id, source);
        }
        outcome
    }
}
