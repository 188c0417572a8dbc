//! Per-key ripple state.
//!
//! A key touched by a ripple walks a strictly ordered brightness sequence
//! and is then dropped:
//!
//! ```text
//! Ignited --> FadingHigh --> FadingLow --> (unlit)
//! ```
//!
//! [`StateMap`] is the "active set" of one ripple: a dense table indexed by
//! [`KeyIndex`] that is sized once and reused, so ticking never allocates.

use crate::graph::KeyIndex;

/// Brightness level of a key inside one ripple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RippleState {
    /// Full color. Only ignited keys spread the ripple.
    Ignited,

    /// About 80% of the ripple color.
    FadingHigh,

    /// About 40% of the ripple color.
    FadingLow,
}

impl RippleState {
    /// The following state, or `None` when the key goes dark.
    pub fn next(self) -> Option<RippleState> {
        match self {
            RippleState::Ignited => Some(RippleState::FadingHigh),
            RippleState::FadingHigh => Some(RippleState::FadingLow),
            RippleState::FadingLow => None,
        }
    }

    /// Scale factor applied to the ripple color (`256` would be unity).
    pub fn intensity(self) -> Option<u8> {
        match self {
            RippleState::Ignited => None,
            RippleState::FadingHigh => Some(204),
            RippleState::FadingLow => Some(102),
        }
    }
}

/// A key's state plus the number of ticks it has spent in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyState {
    pub state: RippleState,
    pub ticks_in_state: u32,
}

impl KeyState {
    /// A freshly lit key.
    pub const fn ignited() -> Self {
        Self {
            state: RippleState::Ignited,
            ticks_in_state: 0,
        }
    }

    /// Age this key by one tick.
    ///
    /// Once `step_duration` ticks have been spent in a state the key moves to
    /// the next one with its counter reset. Returns `None` when the key
    /// leaves `FadingLow`.
    pub fn decayed(self, step_duration: u32) -> Option<KeyState> {
        let ticks = self.ticks_in_state.saturating_add(1);
        if ticks < step_duration {
            return Some(KeyState {
                state: self.state,
                ticks_in_state: ticks,
            });
        }
        self.state.next().map(|state| KeyState {
            state,
            ticks_in_state: 0,
        })
    }
}

/// Dense map from key index to [`KeyState`].
///
/// Indices outside the table are treated as permanently unlit: lookups miss
/// and inserts are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateMap {
    slots: Vec<Option<KeyState>>,
    len: usize,
}

impl StateMap {
    /// Create an empty map able to hold every key of a `key_count` graph.
    pub fn with_key_count(key_count: usize) -> Self {
        Self {
            slots: vec![None; key_count],
            len: 0,
        }
    }

    /// Number of keys the table covers.
    pub fn key_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of active keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, key: KeyIndex) -> Option<KeyState> {
        self.slots.get(key.get()).copied().flatten()
    }

    pub fn contains(&self, key: KeyIndex) -> bool {
        self.get(key).is_some()
    }

    /// Set a key's state. Returns `false` if the key is outside the table.
    pub fn insert(&mut self, key: KeyIndex, state: KeyState) -> bool {
        match self.slots.get_mut(key.get()) {
            Some(slot) => {
                if slot.is_none() {
                    self.len += 1;
                }
                *slot = Some(state);
                true
            }
            None => false,
        }
    }

    /// Unlight every key, keeping the allocation.
    pub fn clear(&mut self) {
        if self.len > 0 {
            self.slots.fill(None);
            self.len = 0;
        }
    }

    /// Active keys in index order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyIndex, KeyState)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|state| (KeyIndex::new(i), state)))
    }
}
