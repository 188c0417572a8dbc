//! Lighting
//!
//! Everything between individual effects and the device: a fixed-capacity
//! pool that stores running effects without allocating, the manager that
//! ticks and composes them, and the frame buffer it produces.
//!
//! # Memory
//!
//! All storage is sized when the manager is built (pool slots, each effect's
//! per-key tables, the live list and the frame). Steady-state ticking and
//! effect creation reuse that storage and do not touch the heap.
//!
//! # Cost
//!
//! Composition recomputes the whole frame every tick, which is
//! O(keys × live effects). With a keyboard's worth of keys and a few dozen
//! effects this is negligible.

mod frame;
mod manager;
mod pool;
mod shared;

pub use frame::FrameBuffer;
pub use manager::LightingManager;
pub use pool::{EffectHandle, EffectPool, Recycle};
pub use shared::SharedLighting;
