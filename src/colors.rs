use std::collections::{HashMap, VecDeque};

use crate::format::Color;

/// Palette handed out to unknown tags. Black is kept for backgrounds.
pub const DEFAULT_PALETTE: [Color; 7] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
];

pub fn default_known_tags() -> HashMap<String, Color> {
    let mut known = HashMap::new();
    known.insert("dalvikvm".to_string(), Color::Blue);
    known.insert("Process".to_string(), Color::Blue);
    known.insert("ActivityManager".to_string(), Color::Cyan);
    known.insert("ActivityThread".to_string(), Color::Cyan);
    known
}

/// Gives every tag a stable color while colors last, recycling the least
/// recently used one when a new tag shows up.
#[derive(Debug, Clone)]
pub struct TagColorAllocator {
    pub known_tags: HashMap<String, Color>,
    /// Front is the least recently used color, back the most recent one.
    pub last_used: VecDeque<Color>,
}

impl Default for TagColorAllocator {
    fn default() -> Self {
        TagColorAllocator::new(default_known_tags(), &DEFAULT_PALETTE)
    }
}

impl TagColorAllocator {
    pub fn new(known_tags: HashMap<String, Color>, palette: &[Color]) -> TagColorAllocator {
        let mut last_used: VecDeque<Color> = VecDeque::new();
        for color in palette {
            if !last_used.contains(color) {
                last_used.push_back(*color);
            }
        }
        if last_used.is_empty() {
            last_used.extend(DEFAULT_PALETTE);
        }

        TagColorAllocator {
            known_tags,
            last_used,
        }
    }

    pub fn color_for(&mut self, tag: &str) -> Color {
        let color = match self.known_tags.get(tag) {
            Some(color) => *color,
            None => {
                let color = self.last_used[0];
                self.known_tags.insert(tag.to_string(), color);
                color
            }
        };

        // Known tags may be bound to a color outside the palette; those don't
        // take part in the recency order.
        if let Some(pos) = self.last_used.iter().position(|c| *c == color) {
            self.last_used.remove(pos);
            self.last_used.push_back(color);
        }
        color
    }

    pub fn palette_len(&self) -> usize {
        self.last_used.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_keep_their_color() {
        let mut allocator = TagColorAllocator::default();
        assert_eq!(allocator.color_for("ActivityManager"), Color::Cyan);
        assert_eq!(allocator.color_for("dalvikvm"), Color::Blue);
        assert_eq!(allocator.color_for("ActivityManager"), Color::Cyan);
    }

    #[test]
    fn test_new_tag_takes_least_recently_used() {
        let mut allocator = TagColorAllocator::default();
        assert_eq!(allocator.color_for("MyApp"), Color::Red);
        assert_eq!(allocator.color_for("Other"), Color::Green);
        assert_eq!(allocator.color_for("MyApp"), Color::Red);
        // Red was just used, so the next fresh tag skips it
        assert_eq!(allocator.color_for("Third"), Color::Yellow);
    }

    #[test]
    fn test_colors_stay_in_palette() {
        let mut allocator = TagColorAllocator::default();
        for i in 0..50 {
            let color = allocator.color_for(&format!("tag{}", i));
            assert!(DEFAULT_PALETTE.contains(&color));
            assert_ne!(color, Color::Black);
        }
        assert_eq!(allocator.palette_len(), DEFAULT_PALETTE.len());
    }

    #[test]
    fn test_eviction_reuses_lru_color() {
        let mut allocator = TagColorAllocator::new(HashMap::new(), &DEFAULT_PALETTE);
        let first = allocator.color_for("tag0");
        for i in 1..DEFAULT_PALETTE.len() {
            allocator.color_for(&format!("tag{}", i));
        }
        // Palette exhausted: the newest tag gets the color of tag0
        assert_eq!(allocator.color_for("newest"), first);
        assert_eq!(allocator.known_tags.len(), DEFAULT_PALETTE.len() + 1);
    }

    #[test]
    fn test_recency_list_keeps_each_color_once() {
        let mut allocator = TagColorAllocator::default();
        for tag in ["a", "b", "Process", "a", "c", "ActivityThread"] {
            allocator.color_for(tag);
        }
        let mut seen: Vec<Color> = allocator.last_used.iter().copied().collect();
        seen.sort_by_key(|c| c.code());
        seen.dedup();
        assert_eq!(seen.len(), DEFAULT_PALETTE.len());
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let mut allocator = TagColorAllocator::new(HashMap::new(), &[]);
        assert_eq!(allocator.color_for("x"), Color::Red);
    }
}
