//! HUD text formatting

/// Fixed prompt and status strings
pub mod prompts {
    pub const ZONE_ENTER: &str = "You are standing on the circle!\nPress E to accept.";
    pub const ZONE_EXIT: &str = "You left the circle.";
    pub const NOT_ENOUGH_AMMO: &str = "Not enough ammo";
    pub const MISSION_COMPLETE: &str = "Mission Complete!";
    pub const MISSION_FAILED: &str = "Mission Failed!";
}

/// `Timer: mm:ss`, both parts floored
pub fn format_timer(remaining_seconds: f32) -> String {
    let remaining = remaining_seconds.max(0.0);
    let minutes = (remaining / 60.0).floor() as u32;
    let seconds = (remaining % 60.0).floor() as u32;
    format!("Timer: {:02}:{:02}", minutes, seconds)
}

pub fn objective_text(objective: &str, kills: u32, required: u32) -> String {
    format!("Objective:\n- {} [{} / {}]", objective, kills, required)
}

/// `"<Weapon> Ammo: <n>"` for ranged weapons, `"Melee"` otherwise
pub fn ammo_label(weapon: &str, ammo: Option<u32>) -> String {
    match ammo {
        Some(count) => format!("{} Ammo: {}", weapon, count),
        None => "Melee".to_string(),
    }
}
