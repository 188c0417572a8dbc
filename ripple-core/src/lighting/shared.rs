//! Shared Lighting
//!
//! The lighting core is single-writer: one driver ticks the manager and then
//! reads the frame. Hosts that accept key presses on other threads wrap the
//! manager here, which makes "tick, then read the frame" a single critical
//! section so a request can never land between the two.

use parking_lot::Mutex;

use super::frame::FrameBuffer;
use super::manager::LightingManager;
use super::pool::Recycle;
use crate::effect::{Effect, RippleEffect};
use crate::graph::KeyIndex;
use crate::util::Color;

/// A lighting manager behind a lock.
pub struct SharedLighting<'g, E: Recycle = RippleEffect> {
    inner: Mutex<LightingManager<'g, E>>,
}

impl<'g, E: Effect + Recycle> SharedLighting<'g, E> {
    pub fn new(manager: LightingManager<'g, E>) -> Self {
        Self {
            inner: Mutex::new(manager),
        }
    }

    /// Tick once and hand the fresh frame to `read`, all under the lock.
    pub fn advance<R>(&self, read: impl FnOnce(&FrameBuffer) -> R) -> R {
        let mut manager = self.inner.lock();
        manager.update();
        read(manager.frame_buffer())
    }

    /// Start a new effect. Returns `false` if the request was dropped.
    pub fn request_effect(&self, params: E::Params) -> bool {
        self.inner.lock().request_effect(params)
    }

    /// Run `f` with exclusive access to the manager.
    pub fn with<R>(&self, f: impl FnOnce(&mut LightingManager<'g, E>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn into_inner(self) -> LightingManager<'g, E> {
        self.inner.into_inner()
    }
}

impl<'g> SharedLighting<'g, RippleEffect> {
    /// Start a ripple at `seed`; see [`LightingManager::request_new_ripple`].
    pub fn request_new_ripple(
        &self,
        seed: KeyIndex,
        color: Color,
        step_duration: i32,
        propagation_delay: i32,
        max_lifetime: i32,
    ) -> bool {
        self.inner.lock().request_new_ripple(
            seed,
            color,
            step_duration,
            propagation_delay,
            max_lifetime,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{KeyGraph, KeyId};
    use crate::util::Position;

    #[test]
    fn requests_from_other_threads_show_up_on_the_next_advance() {
        let graph = KeyGraph::build(
            (0..8u16).map(|i| (KeyId(i), Position::new(f32::from(i), 0.0))),
        );
        let shared = SharedLighting::new(LightingManager::new(&graph));

        std::thread::scope(|scope| {
            for seed in 0..4 {
                let shared = &shared;
                scope.spawn(move || {
                    assert!(shared.request_new_ripple(
                        KeyIndex::new(seed * 2),
                        Color::rgb(0, 0, 200),
                        10,
                        10,
                        30,
                    ));
                });
            }
        });

        let lit = shared.advance(|frame| frame.lit().count());
        assert_eq!(lit, 4);
        assert_eq!(shared.with(|manager| manager.live_count()), 4);

        let manager = shared.into_inner();
        assert_eq!(manager.tick_count(), 1);
    }
}
