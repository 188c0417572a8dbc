//! Lighting Effects
//!
//! This module defines what the lighting manager needs from an effect and
//! provides the one effect kind shipped today, the ripple.
//!
//! # The Effect Contract
//!
//! An effect is a small per-instance simulation that:
//!
//! 1. Advances by exactly one discrete tick per [`Effect::update`] call.
//!
//! 2. Answers [`Effect::color_for`] for any key. Keys it does not touch are
//!    black, which is also the additive identity, so untouched keys never
//!    change the composed frame.
//!
//! 3. Reports [`Effect::is_finished`] once it should be retired.
//!
//! The manager only talks to effects through this trait, so new effect
//! kinds plug in without touching it.

mod ripple;
mod state;

pub use ripple::{RippleEffect, RippleParams, RippleTiming};
pub use state::{KeyState, RippleState, StateMap};

use crate::graph::{KeyGraph, KeyIndex};
use crate::util::Color;

/// A lighting effect driven one tick at a time.
pub trait Effect {
    /// Advance the effect by one tick.
    fn update(&mut self, graph: &KeyGraph);

    /// The color this effect contributes to `key` right now.
    fn color_for(&self, key: KeyIndex) -> Color;

    /// Whether the effect has completed and can be retired.
    fn is_finished(&self) -> bool;
}
