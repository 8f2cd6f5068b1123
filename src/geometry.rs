use std::fmt;

/// Terminal dimensions in character cells, as reported by resize events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// True when `min` fits inside `self` on both axes.
    pub fn covers(&self, min: Size) -> bool {
        self.width >= min.width && self.height >= min.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Screen area solved for one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// First row below the zone.
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Zones squeezed to nothing by a small terminal are skipped when painting.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
