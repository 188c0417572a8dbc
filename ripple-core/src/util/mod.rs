//! Value Types
//!
//! Plain copyable values shared by every layer: the RGB color every effect
//! produces and the 2D position every key is placed at.

mod color;
mod position;

pub use color::Color;
pub use position::Position;
