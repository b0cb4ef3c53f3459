//! Demo scenario
//!
//! A walled block with a parked car, the configured mission zones and a
//! crowd of patrolling NPCs. The scripted player walks to the first
//! mission zone, takes the job, shoots, then drives off in the car.

use heist_core::EntityId;
use heist_math::{sign_or_zero, Aabb2, Vec2};
use heist_world::{Action, ScriptedInput, World};

/// Thickness of the boundary walls
const WALL_THICKNESS: f32 = 1.0;

pub struct DemoLayout {
    pub player: EntityId,
    pub vehicle: EntityId,
    pub npcs: Vec<EntityId>,
}

/// Populate `world` with the demo block
pub fn build(world: &mut World) -> heist_world::Result<DemoLayout> {
    let area = world.config().spawn.area;
    for wall in boundary_walls(&area) {
        world.add_wall(wall);
    }
    world.add_street(Aabb2::from_center_size(
        Vec2::new(area.center().x, 0.0),
        Vec2::new(area.size().x, 2.0),
    ));

    let player = world.spawn_player(Vec2::ZERO)?;
    let vehicle = world.spawn_vehicle(Vec2::new(3.0, 0.0), 0.0)?;
    let npcs = world.populate_npcs();
    log::info!(
        "Demo block ready: player {}, vehicle {}, {} NPCs",
        player,
        vehicle,
        npcs.len()
    );
    Ok(DemoLayout { player, vehicle, npcs })
}

/// Four walls hugging the outside of `area`
fn boundary_walls(area: &Aabb2) -> [Aabb2; 4] {
    let size = area.size();
    let center = area.center();
    let half = size * 0.5 + Vec2::new(WALL_THICKNESS, WALL_THICKNESS) * 0.5;
    let horizontal = Vec2::new(size.x + 2.0 * WALL_THICKNESS, WALL_THICKNESS);
    let vertical = Vec2::new(WALL_THICKNESS, size.y + 2.0 * WALL_THICKNESS);
    [
        Aabb2::from_center_size(center + Vec2::new(0.0, half.y), horizontal),
        Aabb2::from_center_size(center - Vec2::new(0.0, half.y), horizontal),
        Aabb2::from_center_size(center + Vec2::new(half.x, 0.0), vertical),
        Aabb2::from_center_size(center - Vec2::new(half.x, 0.0), vertical),
    ]
}

/// Player walking speed the timeline is planned against
const WALK_SPEED: f32 = 5.0;

/// Append holds that walk from `from` to `to` starting at `t`.
///
/// Axes are not normalized, so the walk goes diagonally until one axis is
/// done and straight after that. Returns the time of arrival.
fn walk(input: ScriptedInput, t: f32, from: Vec2, to: Vec2) -> (ScriptedInput, f32) {
    let delta = to - from;
    let (dx, dy) = (delta.x.abs() / WALK_SPEED, delta.y.abs() / WALK_SPEED);
    let (h, v) = (sign_or_zero(delta.x), sign_or_zero(delta.y));
    let diagonal = dx.min(dy);
    let straight = dx.max(dy) - diagonal;
    let input = input.hold(t, diagonal, h, v).hold(
        t + diagonal,
        straight,
        if dx > dy { h } else { 0.0 },
        if dy > dx { v } else { 0.0 },
    );
    (input, t + diagonal + straight)
}

/// Input timeline for the player spawned at the origin.
///
/// `zone` is where the player walks to accept a mission; the car is
/// expected at `(3, 0)`.
pub fn script(zone: Option<Vec2>) -> ScriptedInput {
    let mut input = ScriptedInput::new();
    let mut t = 0.0;

    if let Some(zone) = zone {
        (input, t) = walk(input, t, Vec2::ZERO, zone);
        t += 0.5;
        input = input.press(t, Action::Interact).press(t + 0.5, Action::NextWeapon);
        for shot in 0..5 {
            input = input.press(t + 1.0 + shot as f32 * 1.1, Action::Attack);
        }
        t += 7.0;
        (input, t) = walk(input, t, zone, Vec2::ZERO);
        t += 0.25;
    }

    // Over to the car, a short loop, then out
    input
        .hold(t, 0.6, 1.0, 0.0)
        .press(t + 0.75, Action::Interact)
        .hold(t + 1.0, 3.0, 0.0, 1.0)
        .hold(t + 4.0, 2.0, 0.6, 1.0)
        .hold(t + 6.0, 1.0, 0.0, -1.0)
        .press(t + 8.0, Action::Interact)
}
