//! 2D key positions, measured in key units (one standard key = 1.0).

use serde::{Deserialize, Serialize};

/// The center of a key on the physical layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Sum of absolute coordinate differences.
    pub fn manhattan_distance(&self, other: &Position) -> f32 {
        (other.x - self.x).abs() + (other.y - self.y).abs()
    }

    /// Straight-line distance.
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.manhattan_distance(&b), 7.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.manhattan_distance(&a), a.manhattan_distance(&b));
    }
}
