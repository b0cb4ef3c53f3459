//! Heist HUD - Presentation Hooks
//!
//! The simulation never renders or plays audio itself. It reports what
//! should be shown or heard through a [`Presenter`], and never reads
//! anything back.
//!
//! # Features
//!
//! - `Presenter` trait for sprites, sounds, text slots, health bars and effects
//! - `NullPresenter` for headless runs
//! - `RecordingPresenter` that keeps every call for inspection
//! - HUD text formatting (timer, objective, ammo)
//!
//! # Example
//!
//! ```ignore
//! use heist_hud::prelude::*;
//!
//! let presenter = RecordingPresenter::new();
//! presenter.show_text(TextSlot::Timer, &format_timer(75.4));
//! assert!(presenter.shown_text(TextSlot::Timer).as_deref() == Some("Timer: 01:15"));
//! ```

pub mod presenter;
pub mod text;

pub mod prelude {
    pub use crate::presenter::{
        EffectId, EffectKind, NullPresenter, PresentationCall, Presenter, RecordingPresenter,
        SoundCue, TextSlot,
    };
    pub use crate::text::{ammo_label, format_timer, objective_text, prompts};
}

pub use prelude::*;
