//! Input sampling
//!
//! The world reads input once per frame through [`InputSource`] and works
//! from the resulting [`InputFrame`]. Providers are pure reads.

use heist_math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Discrete actions, reported on the frame they are pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Interact,
    Attack,
    NextWeapon,
    PreviousWeapon,
}

/// Per-frame input queries
pub trait InputSource {
    /// Axis value in `[-1, 1]`
    fn axis(&self, axis: Axis) -> f32;

    /// Whether `action` was pressed this frame
    fn pressed(&self, action: Action) -> bool;
}

/// One frame of sampled input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub horizontal: f32,
    pub vertical: f32,
    pub interact: bool,
    pub attack: bool,
    pub next_weapon: bool,
    pub previous_weapon: bool,
}

impl InputFrame {
    /// No axes, no actions
    pub fn idle() -> Self {
        Self::default()
    }

    /// Read everything from `source`, clamping axes
    pub fn sample(source: &dyn InputSource) -> Self {
        Self {
            horizontal: source.axis(Axis::Horizontal).clamp(-1.0, 1.0),
            vertical: source.axis(Axis::Vertical).clamp(-1.0, 1.0),
            interact: source.pressed(Action::Interact),
            attack: source.pressed(Action::Attack),
            next_weapon: source.pressed(Action::NextWeapon),
            previous_weapon: source.pressed(Action::PreviousWeapon),
        }
    }

    pub fn with_axes(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        match action {
            Action::Interact => self.interact = true,
            Action::Attack => self.attack = true,
            Action::NextWeapon => self.next_weapon = true,
            Action::PreviousWeapon => self.previous_weapon = true,
        }
        self
    }

    pub fn movement(&self) -> Vec2 {
        Vec2::new(self.horizontal, self.vertical)
    }

    /// `+1`, `-1` or `0` when both or neither switch was pressed
    pub fn weapon_switch(&self) -> i32 {
        self.next_weapon as i32 - self.previous_weapon as i32
    }
}

impl InputSource for InputFrame {
    fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    fn pressed(&self, action: Action) -> bool {
        match action {
            Action::Interact => self.interact,
            Action::Attack => self.attack,
            Action::NextWeapon => self.next_weapon,
            Action::PreviousWeapon => self.previous_weapon,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    start: f32,
    end: f32,
    horizontal: f32,
    vertical: f32,
}

/// Replays a timeline of held axes and timed presses.
///
/// Call [`ScriptedInput::advance`] before each frame; the frame then sees
/// the holds active at the start of the window and every press inside it.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    holds: Vec<Hold>,
    presses: Vec<(f32, Action)>,
    window_start: f32,
    window_end: f32,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the axes for `duration` seconds from `start`
    pub fn hold(mut self, start: f32, duration: f32, horizontal: f32, vertical: f32) -> Self {
        self.holds.push(Hold {
            start,
            end: start + duration,
            horizontal,
            vertical,
        });
        self
    }

    /// Press `action` once at `at` seconds
    pub fn press(mut self, at: f32, action: Action) -> Self {
        self.presses.push((at, action));
        self
    }

    /// Move the window forward by one frame of `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.window_start = self.window_end;
        self.window_end += dt;
    }

    pub fn time(&self) -> f32 {
        self.window_start
    }

    /// Whether anything is left to replay
    pub fn is_finished(&self) -> bool {
        self.holds.iter().all(|h| h.end <= self.window_start)
            && self.presses.iter().all(|(at, _)| *at < self.window_start)
    }
}

impl InputSource for ScriptedInput {
    fn axis(&self, axis: Axis) -> f32 {
        self.holds
            .iter()
            .rev()
            .find(|h| h.start <= self.window_start && self.window_start < h.end)
            .map_or(0.0, |h| match axis {
                Axis::Horizontal => h.horizontal,
                Axis::Vertical => h.vertical,
            })
    }

    fn pressed(&self, action: Action) -> bool {
        self.presses
            .iter()
            .any(|(at, a)| *a == action && self.window_start <= *at && *at < self.window_end)
    }
}
