//! Frame buffer: one color per key, indexed like the key graph.

use crate::graph::KeyIndex;
use crate::util::Color;

/// The composed colors for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameBuffer {
    colors: Vec<Color>,
}

impl FrameBuffer {
    /// An all-black frame for `key_count` keys.
    pub fn new(key_count: usize) -> Self {
        Self {
            colors: vec![Color::BLACK; key_count],
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color of one key. Unknown keys read as black.
    pub fn get(&self, key: KeyIndex) -> Color {
        self.colors.get(key.get()).copied().unwrap_or(Color::BLACK)
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Color> + '_ {
        self.colors.iter()
    }

    /// Keys that are not black, with their colors.
    pub fn lit(&self) -> impl Iterator<Item = (KeyIndex, Color)> + '_ {
        self.colors
            .iter()
            .enumerate()
            .filter(|(_, color)| !color.is_black())
            .map(|(i, &color)| (KeyIndex::new(i), color))
    }

    /// Reset every key to black.
    pub(crate) fn clear(&mut self) {
        self.colors.fill(Color::BLACK);
    }

    /// Add `color` onto a key, saturating per channel.
    pub(crate) fn blend_add(&mut self, key: KeyIndex, color: Color) {
        if let Some(slot) = self.colors.get_mut(key.get()) {
            *slot = *slot + color;
        }
    }
}

impl AsRef<[Color]> for FrameBuffer {
    fn as_ref(&self) -> &[Color] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blending_saturates_and_lit_skips_black() {
        let mut frame = FrameBuffer::new(3);
        frame.blend_add(KeyIndex::new(1), Color::rgb(100, 0, 0));
        frame.blend_add(KeyIndex::new(1), Color::rgb(200, 0, 0));
        frame.blend_add(KeyIndex::new(7), Color::WHITE);

        assert_eq!(frame.get(KeyIndex::new(1)), Color::rgb(255, 0, 0));
        assert_eq!(frame.get(KeyIndex::new(7)), Color::BLACK);
        let lit: Vec<_> = frame.lit().collect();
        assert_eq!(lit, vec![(KeyIndex::new(1), Color::rgb(255, 0, 0))]);

        frame.clear();
        assert_eq!(frame.lit().count(), 0);
        assert_eq!(frame.len(), 3);
    }
}
