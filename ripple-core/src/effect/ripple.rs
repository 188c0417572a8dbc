//! Ripple Effect
//!
//! A ripple is a cellular automaton over the key graph. It starts with one
//! ignited seed key and spreads outward one graph hop at a time, while every
//! lit key fades through discrete brightness steps and finally goes dark.
//!
//! # How a Tick Works
//!
//! Each tick builds the next active set from a snapshot of the current one:
//!
//! 1. **Propagate**: an ignited key whose counter reaches the propagation
//!    delay this tick lights every neighbor that is not active *right now*.
//!    Keys that are already active are never re-ignited, so the wave has a
//!    single front and cannot loop back on itself.
//!
//! 2. **Decay**: every active key ages by one tick and steps to the next
//!    brightness state after `step_duration` ticks; keys leaving `FadingLow`
//!    are dropped.
//!
//! Both phases only read the snapshot and only write the next buffer, so the
//! order in which keys are visited cannot change the result. The two buffers
//! are swapped at the end of the tick.
//!
//! # Lifetime
//!
//! The ripple is finished once it has lived `max_lifetime` ticks, whether or
//! not any keys are still lit. A finished ripple renders black everywhere.

use tracing::trace;

use super::state::{KeyState, RippleState, StateMap};
use super::Effect;
use crate::config::{LightingConfig, RippleDefaults};
use crate::graph::{KeyGraph, KeyIndex};
use crate::lighting::Recycle;
use crate::util::Color;

/// Creation request for a ripple.
///
/// Durations are in ticks and signed so that nonsense input can be accepted
/// and clamped instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleParams {
    /// Key the ripple starts from.
    pub seed: KeyIndex,

    /// Color of an ignited key.
    pub color: Color,

    /// Ticks spent in each brightness state.
    pub step_duration: i32,

    /// Ticks an ignited key waits before lighting its neighbors.
    pub propagation_delay: i32,

    /// Total ticks before the ripple is force-finished.
    pub max_lifetime: i32,
}

/// Validated ripple timing, every field at least one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RippleTiming {
    pub step_duration: u32,
    pub propagation_delay: u32,
    pub max_lifetime: u32,
}

impl RippleTiming {
    /// Clamp raw durations to the minimum of one tick.
    pub fn clamped(step_duration: i32, propagation_delay: i32, max_lifetime: i32) -> Self {
        Self {
            step_duration: at_least_one(step_duration),
            propagation_delay: at_least_one(propagation_delay),
            max_lifetime: at_least_one(max_lifetime),
        }
    }
}

fn at_least_one(ticks: i32) -> u32 {
    ticks.max(1) as u32
}

/// A running ripple.
#[derive(Debug, Clone)]
pub struct RippleEffect {
    color: Color,
    timing: RippleTiming,

    /// Ticks lived so far. Never decreases.
    elapsed: u32,

    /// Active set as of the last completed tick.
    current: StateMap,

    /// Scratch buffer the next tick is built into.
    next: StateMap,
}

impl RippleEffect {
    /// Create a ripple for a graph of `key_count` keys.
    pub fn new(params: RippleParams, key_count: usize) -> Self {
        let mut ripple = Self::vacant(key_count);
        ripple.construct(params);
        ripple
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn timing(&self) -> RippleTiming {
        self.timing
    }

    /// Ticks lived since construction.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// State of one key, if the ripple currently touches it.
    pub fn state_of(&self, key: KeyIndex) -> Option<KeyState> {
        self.current.get(key)
    }

    /// The current active set.
    pub fn active_keys(&self) -> &StateMap {
        &self.current
    }
}

impl Effect for RippleEffect {
    fn update(&mut self, graph: &KeyGraph) {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.is_finished() {
            self.current.clear();
            return;
        }

        self.next.clear();
        advance(&self.current, &mut self.next, graph, &self.timing, self.current.iter());
        std::mem::swap(&mut self.current, &mut self.next);

        trace!(elapsed = self.elapsed, active = self.current.len(), "ripple tick");
    }

    fn color_for(&self, key: KeyIndex) -> Color {
        if self.is_finished() {
            return Color::BLACK;
        }
        match self.current.get(key) {
            None => Color::BLACK,
            Some(key_state) => match key_state.state.intensity() {
                None => self.color,
                Some(intensity) => self.color.scale(intensity),
            },
        }
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.timing.max_lifetime
    }
}

impl Recycle for RippleEffect {
    type Params = RippleParams;
    type Defaults = RippleDefaults;

    fn defaults(config: &LightingConfig) -> RippleDefaults {
        config.ripple
    }

    /// A ripple needs its seed to be one of the graph's keys.
    fn accepts(params: &RippleParams, key_count: usize) -> bool {
        params.seed.get() < key_count
    }

    fn vacant(key_count: usize) -> Self {
        let timing = RippleTiming::clamped(1, 1, 1);
        Self {
            color: Color::BLACK,
            timing,
            elapsed: timing.max_lifetime,
            current: StateMap::with_key_count(key_count),
            next: StateMap::with_key_count(key_count),
        }
    }

    fn construct(&mut self, params: RippleParams) {
        self.current.clear();
        self.next.clear();
        self.color = params.color;
        self.timing = RippleTiming::clamped(
            params.step_duration,
            params.propagation_delay,
            params.max_lifetime,
        );
        self.elapsed = 0;
        self.current.insert(params.seed, KeyState::ignited());
    }

    fn teardown(&mut self) {
        self.current.clear();
        self.next.clear();
        self.elapsed = self.timing.max_lifetime;
    }
}

/// Compute one tick: read `current`, write `next`.
///
/// `visit` yields the entries of `current` in any order; the result does not
/// depend on that order.
fn advance<I>(
    current: &StateMap,
    next: &mut StateMap,
    graph: &KeyGraph,
    timing: &RippleTiming,
    visit: I,
) where
    I: IntoIterator<Item = (KeyIndex, KeyState)>,
{
    for (key, key_state) in visit {
        let spreads = key_state.state == RippleState::Ignited
            && key_state.ticks_in_state.saturating_add(1) >= timing.propagation_delay;

        if spreads {
            for &neighbor in graph.neighbors(key) {
                if !current.contains(neighbor) {
                    next.insert(neighbor, KeyState::ignited());
                }
            }
        }

        if let Some(decayed) = key_state.decayed(timing.step_duration) {
            next.insert(key, decayed);
        }
    }
}
