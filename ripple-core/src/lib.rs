//! Ripple Core
//!
//! This crate provides the simulation core for propagating keyboard lighting
//! effects. It implements:
//!
//! - An immutable adjacency graph over the physical key layout
//! - The ripple effect, a cellular automaton that spreads across that graph
//! - A fixed-capacity effect pool that never allocates after setup
//! - A compositor that ticks every live effect and blends them into a frame
//!
//! The core is deterministic and tick-driven. It does not talk to hardware,
//! read input, or keep wall-clock time: a driver calls
//! [`LightingManager::update`] at a fixed rate (typically 60 Hz) and hands
//! the resulting [`FrameBuffer`] to a device backend.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Key nodes and the adjacency graph
//! - `effect`: The effect capability trait and the ripple automaton
//! - `lighting`: Effect pool, compositor and frame buffer
//! - `config`: Serializable tunables
//! - `util`: Color and position value types
//!
//! # Example
//!
//! ```rust,ignore
//! use ripple_core::{Color, KeyGraph, KeyId, KeyIndex, LightingManager, Position};
//!
//! // Build the graph once from the layout
//! let graph = KeyGraph::build(vec![
//!     (KeyId(0), Position::new(0.0, 0.0)),
//!     (KeyId(1), Position::new(1.0, 0.0)),
//! ]);
//!
//! let mut lighting = LightingManager::new(&graph);
//!
//! // A key press starts a ripple
//! lighting.request_new_ripple(KeyIndex::new(0), Color::rgb(255, 0, 0), 4, 2, 20);
//!
//! // Every frame: tick, then render
//! lighting.update();
//! let frame = lighting.frame_buffer();
//! ```

pub mod config;
pub mod effect;
pub mod error;
pub mod graph;
pub mod lighting;
pub mod util;

pub use config::LightingConfig;
pub use effect::{Effect, RippleEffect, RippleParams, RippleState};
pub use error::{ConfigError, PoolError};
pub use graph::{KeyGraph, KeyId, KeyIndex, KeyNode};
pub use lighting::{EffectPool, FrameBuffer, LightingManager, SharedLighting};
pub use util::{Color, Position};
