//! Lighting Manager
//!
//! The manager is the compositor: it owns every running effect, advances
//! them together, and blends their colors into a single frame.
//!
//! # Tick Sequence
//!
//! One call to [`LightingManager::update`]:
//!
//! 1. Advances every live effect by one tick
//! 2. Retires finished effects, returning their slots to the pool; the
//!    remaining effects keep their relative order
//! 3. Recomputes the frame from black, adding each live effect's color for
//!    every key with per-channel saturation
//!
//! Blending is additive so overlapping ripples brighten each other instead
//! of one hiding the other.
//!
//! # Requests
//!
//! New effects join the live list immediately but are first ticked by the
//! next `update`; the current frame is never touched retroactively. A request
//! that cannot be served (pool full, unknown key) is dropped without error:
//! lighting must never take the host application down.

use tracing::{debug, trace, warn};

use super::frame::FrameBuffer;
use super::pool::{EffectHandle, EffectPool, Recycle};
use crate::config::{LightingConfig, DEFAULT_POOL_CAPACITY};
use crate::effect::{Effect, RippleEffect, RippleParams};
use crate::graph::{KeyGraph, KeyId, KeyIndex};
use crate::util::Color;

/// Owns and composes all live effects over one key graph.
pub struct LightingManager<'g, E: Recycle = RippleEffect> {
    /// The layout every effect runs on.
    graph: &'g KeyGraph,

    /// Storage for live effects.
    pool: EffectPool<E>,

    /// Live effects in creation order.
    live: Vec<EffectHandle>,

    /// The frame produced by the last update.
    frame: FrameBuffer,

    /// Number of updates performed.
    ticks: u64,

    /// Effect-specific defaults, such as the ripple timing used by
    /// [`LightingManager::request_default_ripple`].
    defaults: E::Defaults,
}

impl<'g, E: Effect + Recycle> LightingManager<'g, E> {
    /// Create a manager that can run up to `capacity` effects at once.
    pub fn with_capacity(graph: &'g KeyGraph, capacity: usize) -> Self {
        Self::with_defaults(graph, capacity, E::defaults(&LightingConfig::default()))
    }

    /// Create a manager from a configuration.
    pub fn from_config(graph: &'g KeyGraph, config: &LightingConfig) -> Self {
        Self::with_defaults(graph, config.pool_capacity, E::defaults(config))
    }

    fn with_defaults(graph: &'g KeyGraph, capacity: usize, defaults: E::Defaults) -> Self {
        Self {
            graph,
            pool: EffectPool::new(capacity, graph.len()),
            live: Vec::with_capacity(capacity),
            frame: FrameBuffer::new(graph.len()),
            ticks: 0,
            defaults,
        }
    }

    /// Advance every effect by one tick and recompose the frame.
    pub fn update(&mut self) {
        self.ticks += 1;

        let graph = self.graph;
        for &handle in &self.live {
            if let Some(effect) = self.pool.get_mut(handle) {
                effect.update(graph);
            }
        }

        self.retire_finished();
        self.compose();

        trace!(tick = self.ticks, live = self.live.len(), "lighting tick");
    }

    fn retire_finished(&mut self) {
        let pool = &mut self.pool;
        self.live.retain(|&handle| {
            let finished = pool.get(handle).map_or(true, |effect| effect.is_finished());
            if finished {
                match pool.destroy(handle) {
                    Ok(()) => debug!(slot = handle.slot(), "effect retired"),
                    Err(err) => warn!(%err, "failed to release effect slot"),
                }
            }
            !finished
        });
    }

    fn compose(&mut self) {
        self.frame.clear();

        for &handle in &self.live {
            let Some(effect) = self.pool.get(handle) else {
                continue;
            };
            for i in 0..self.frame.len() {
                let key = KeyIndex::new(i);
                self.frame.blend_add(key, effect.color_for(key));
            }
        }
    }

    /// Start a new effect. Returns `false` if the request was dropped
    /// because the pool is full or the effect rejects `params`.
    pub fn request_effect(&mut self, params: E::Params) -> bool {
        match self.pool.create(params) {
            Ok(handle) => {
                self.live.push(handle);
                debug!(slot = handle.slot(), live = self.live.len(), "effect started");
                true
            }
            Err(err) => {
                debug!(%err, "effect request dropped");
                false
            }
        }
    }

    /// Retire every live effect and blank the frame.
    pub fn clear(&mut self) {
        for handle in self.live.drain(..) {
            if let Err(err) = self.pool.destroy(handle) {
                warn!(%err, "failed to release effect slot");
            }
        }
        self.frame.clear();
    }

    /// The frame produced by the last update.
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Live effects in creation order.
    pub fn effects(&self) -> impl Iterator<Item = &E> + '_ {
        let pool = &self.pool;
        self.live.iter().filter_map(move |&handle| pool.get(handle))
    }

    pub fn graph(&self) -> &'g KeyGraph {
        self.graph
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Maximum number of concurrent effects.
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Number of further effects that can start right now.
    pub fn available(&self) -> usize {
        self.pool.available()
    }

    /// Number of updates performed so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

impl<'g> LightingManager<'g, RippleEffect> {
    /// Ripple manager with the default capacity.
    pub fn new(graph: &'g KeyGraph) -> Self {
        Self::with_capacity(graph, DEFAULT_POOL_CAPACITY)
    }

    /// Start a ripple at `seed`.
    ///
    /// Non-positive durations are clamped to one tick. Returns `false` if
    /// the pool is full or `seed` is not a key of this graph.
    pub fn request_new_ripple(
        &mut self,
        seed: KeyIndex,
        color: Color,
        step_duration: i32,
        propagation_delay: i32,
        max_lifetime: i32,
    ) -> bool {
        self.request_ripple(RippleParams {
            seed,
            color,
            step_duration,
            propagation_delay,
            max_lifetime,
        })
    }

    /// Start a ripple at the key with external id `id`.
    pub fn request_ripple_at(
        &mut self,
        id: KeyId,
        color: Color,
        step_duration: i32,
        propagation_delay: i32,
        max_lifetime: i32,
    ) -> bool {
        let Some(seed) = self.graph.index_of(id) else {
            warn!(key_id = id.raw(), "ripple requested for unknown key id");
            return false;
        };
        self.request_new_ripple(seed, color, step_duration, propagation_delay, max_lifetime)
    }

    /// Start a ripple at `seed` using the configured default timing.
    pub fn request_default_ripple(&mut self, seed: KeyIndex, color: Color) -> bool {
        let params = self.defaults.params(seed, color);
        self.request_ripple(params)
    }

    fn request_ripple(&mut self, params: RippleParams) -> bool {
        if !self.graph.contains(params.seed) {
            warn!(seed = params.seed.get(), keys = self.graph.len(), "ripple seed is not a key");
            return false;
        }
        self.request_effect(params)
    }
}

impl<E: Recycle> std::fmt::Debug for LightingManager<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightingManager")
            .field("keys", &self.graph.len())
            .field("live", &self.live.len())
            .field("capacity", &self.pool.capacity())
            .field("ticks", &self.ticks)
            .finish()
    }
}
