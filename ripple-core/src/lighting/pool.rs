//! Effect Pool
//!
//! A fixed-capacity slab of effect slots. All storage is allocated when the
//! pool is built: every slot holds a vacant effect whose own buffers are
//! already sized for the key graph, and the free list is reserved up front.
//! Creating an effect re-initialises a vacant slot in place; destroying it
//! tears the effect down and pushes the slot back on the free list.
//!
//! # Handles
//!
//! Slots are addressed by [`EffectHandle`], a slot index plus the slot's
//! generation at the time of creation. Destroying a slot bumps its
//! generation, so a handle that was already destroyed, or that belongs to a
//! different pool, is rejected with [`PoolError`] instead of silently
//! freeing someone else's effect.
//!
//! Handles index slots with a `u32`, so a pool holds at most `u32::MAX`
//! slots; larger requests are clamped.

use tracing::warn;

use crate::config::LightingConfig;
use crate::error::PoolError;

/// Effects that can live in a pool slot and be rebuilt in place.
pub trait Recycle {
    /// Everything needed to start a new instance.
    type Params;

    /// Settings shared by every instance a manager starts, such as default
    /// timing.
    type Defaults: Clone;

    /// Read this effect's defaults out of a lighting config.
    fn defaults(config: &LightingConfig) -> Self::Defaults;

    /// Whether `params` can start an instance over `key_count` keys.
    /// Rejected params never occupy a slot.
    fn accepts(_params: &Self::Params, _key_count: usize) -> bool {
        true
    }

    /// An idle instance with storage for a graph of `key_count` keys.
    fn vacant(key_count: usize) -> Self;

    /// Re-initialise this instance from `params`, reusing its storage.
    fn construct(&mut self, params: Self::Params);

    /// Release per-instance state before the slot is reused.
    fn teardown(&mut self);
}

/// Generation-checked reference to a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectHandle {
    slot: u32,
    generation: u32,
}

impl EffectHandle {
    /// Slot index this handle points at.
    pub fn slot(&self) -> usize {
        self.slot as usize
    }

    /// Slot generation the handle was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<E> {
    generation: u32,
    occupied: bool,
    effect: E,
}

/// Fixed-capacity effect storage.
#[derive(Debug)]
pub struct EffectPool<E> {
    slots: Vec<Slot<E>>,

    /// Free slot indices; the next slot handed out is the last one pushed.
    free: Vec<u32>,

    /// Size of the key graph the vacant effects were built for.
    key_count: usize,
}

/// Number of slots a pool asked for `capacity` can address.
fn slot_count(capacity: usize) -> u32 {
    u32::try_from(capacity).unwrap_or_else(|_| {
        warn!(capacity, max = u32::MAX, "effect pool capacity clamped");
        u32::MAX
    })
}

impl<E: Recycle> EffectPool<E> {
    /// Preallocate `capacity` slots for effects over `key_count` keys.
    pub fn new(capacity: usize, key_count: usize) -> Self {
        let count = slot_count(capacity);
        let slots = (0..count)
            .map(|_| Slot {
                generation: 0,
                occupied: false,
                effect: E::vacant(key_count),
            })
            .collect();

        // Reversed so slot 0 is handed out first.
        let free = (0..count).rev().collect();

        Self {
            slots,
            free,
            key_count,
        }
    }

    /// Construct an effect in a free slot.
    pub fn create(&mut self, params: E::Params) -> Result<EffectHandle, PoolError> {
        if !E::accepts(&params, self.key_count) {
            return Err(PoolError::Rejected {
                key_count: self.key_count,
            });
        }

        let slot_index = self.free.pop().ok_or(PoolError::Exhausted {
            capacity: self.slots.len(),
        })?;

        let slot = &mut self.slots[slot_index as usize];
        slot.effect.construct(params);
        slot.occupied = true;

        Ok(EffectHandle {
            slot: slot_index,
            generation: slot.generation,
        })
    }

    /// Tear down the effect behind `handle` and free its slot.
    pub fn destroy(&mut self, handle: EffectHandle) -> Result<(), PoolError> {
        let slot = self.live_slot_mut(handle)?;
        slot.effect.teardown();
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);

        self.free.push(handle.slot);
        Ok(())
    }
}

impl<E> EffectPool<E> {
    /// The live effect behind `handle`.
    pub fn get(&self, handle: EffectHandle) -> Option<&E> {
        self.slots
            .get(handle.slot())
            .filter(|slot| slot.occupied && slot.generation == handle.generation)
            .map(|slot| &slot.effect)
    }

    /// The live effect behind `handle`, mutably.
    pub fn get_mut(&mut self, handle: EffectHandle) -> Option<&mut E> {
        self.live_slot_mut(handle).ok().map(|slot| &mut slot.effect)
    }

    fn live_slot_mut(&mut self, handle: EffectHandle) -> Result<&mut Slot<E>, PoolError> {
        let slot = self
            .slots
            .get_mut(handle.slot())
            .ok_or(PoolError::OutOfRange { slot: handle.slot() })?;

        if !slot.occupied || slot.generation != handle.generation {
            return Err(PoolError::StaleHandle {
                slot: handle.slot(),
                generation: handle.generation,
            });
        }
        Ok(slot)
    }

    /// Number of keys each slot's effect is sized for.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots currently in use.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts its lifecycle calls so the tests can see in-place reuse.
    #[derive(Debug, Default)]
    struct Tally {
        value: u32,
        constructed: u32,
        torn_down: u32,
        storage: Vec<u8>,
    }

    impl Recycle for Tally {
        type Params = u32;
        type Defaults = ();

        fn defaults(_config: &LightingConfig) {}

        /// Zero stands in for params that do not fit the graph.
        fn accepts(value: &u32, _key_count: usize) -> bool {
            *value != 0
        }

        fn vacant(key_count: usize) -> Self {
            Self {
                storage: Vec::with_capacity(key_count),
                ..Self::default()
            }
        }

        fn construct(&mut self, value: u32) {
            self.value = value;
            self.constructed += 1;
        }

        fn teardown(&mut self) {
            self.value = 0;
            self.torn_down += 1;
        }
    }

    #[test]
    fn fills_to_capacity_then_reports_exhaustion() {
        let mut pool: EffectPool<Tally> = EffectPool::new(3, 8);

        for i in 1..=3 {
            assert!(pool.create(i).is_ok());
        }
        assert!(pool.is_full());
        assert_eq!(pool.create(99), Err(PoolError::Exhausted { capacity: 3 }));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn destroy_frees_a_slot_for_immediate_reuse() {
        let mut pool: EffectPool<Tally> = EffectPool::new(2, 8);
        let a = pool.create(1).unwrap();
        let _b = pool.create(2).unwrap();
        assert!(pool.create(3).is_err());

        pool.destroy(a).unwrap();
        assert_eq!(pool.available(), 1);

        let c = pool.create(3).unwrap();
        assert_eq!(c.slot(), a.slot());
        assert_ne!(c.generation(), a.generation());

        let tally = pool.get(c).unwrap();
        assert_eq!(tally.value, 3);
        assert_eq!(tally.constructed, 2);
        assert_eq!(tally.torn_down, 1);
        assert!(tally.storage.capacity() >= 8);
    }

    #[test]
    fn stale_and_foreign_handles_are_rejected() {
        let mut pool: EffectPool<Tally> = EffectPool::new(1, 0);
        let handle = pool.create(7).unwrap();

        pool.destroy(handle).unwrap();
        assert_eq!(
            pool.destroy(handle),
            Err(PoolError::StaleHandle { slot: 0, generation: 0 })
        );
        assert!(pool.get(handle).is_none());

        // A handle issued by a bigger pool points past the end of this one.
        let mut other: EffectPool<Tally> = EffectPool::new(4, 0);
        other.create(1).unwrap();
        other.create(2).unwrap();
        let foreign = other.create(3).unwrap();
        assert_eq!(pool.destroy(foreign), Err(PoolError::OutOfRange { slot: 2 }));
        assert!(pool.get_mut(foreign).is_none());
    }

    #[test]
    fn zero_capacity_pool_never_creates() {
        let mut pool: EffectPool<Tally> = EffectPool::new(0, 4);
        assert!(pool.is_full());
        assert!(pool.is_empty());
        assert_eq!(pool.create(1), Err(PoolError::Exhausted { capacity: 0 }));
    }

    #[test]
    fn rejected_params_leave_the_pool_untouched() {
        let mut pool: EffectPool<Tally> = EffectPool::new(2, 5);

        assert_eq!(pool.create(0), Err(PoolError::Rejected { key_count: 5 }));
        assert_eq!(pool.available(), 2);
        assert!(pool.is_empty());

        let handle = pool.create(4).unwrap();
        assert_eq!(handle.slot(), 0);
        assert_eq!(pool.get(handle).map(|t| t.constructed), Some(1));
    }

    #[test]
    fn oversized_capacity_is_clamped_to_addressable_slots() {
        assert_eq!(slot_count(0), 0);
        assert_eq!(slot_count(20), 20);
        assert_eq!(slot_count(u32::MAX as usize), u32::MAX);
        assert_eq!(slot_count(usize::MAX), u32::MAX);
    }
}
