//! Core geometry types in canvas pixel space

use std::fmt;

/// Width and height of a canvas in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle with an integer origin that may be negative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate (exclusive)
    pub fn right(&self) -> i64 {
        self.x.saturating_add(i64::from(self.width))
    }

    /// Bottom edge y-coordinate (exclusive)
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(i64::from(self.height))
    }

    /// Same size, different origin
    pub fn moved_to(&self, x: i64, y: i64) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }

    /// Check if this rectangle shares any area with another
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// The overlapping area of two rectangles, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, (right - x) as u32, (bottom - y) as u32))
    }

    /// Check whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
    }

    #[test]
    fn test_rect_edges_negative_origin() {
        let r = Rect::new(-30, -5, 20, 10);
        assert_eq!(r.right(), -10);
        assert_eq!(r.bottom(), 5);
    }

    #[test]
    fn test_rect_edges_saturate() {
        let r = Rect::new(i64::MAX - 1, i64::MAX, 8, 8);
        assert_eq!(r.right(), i64::MAX);
        assert_eq!(r.bottom(), i64::MAX);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        let c = Rect::new(200, 200, 50, 50);
        let touching = Rect::new(100, 0, 10, 10);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 60, 100, 100);
        assert_eq!(a.intersection(&b), Some(Rect::new(50, 60, 50, 40)));
        assert_eq!(a.intersection(&Rect::new(300, 0, 1, 1)), None);
    }

    #[test]
    fn test_rect_contains() {
        let canvas = Rect::new(0, 0, 100, 100);
        assert!(canvas.contains(&Rect::new(0, 0, 100, 100)));
        assert!(canvas.contains(&Rect::new(10, 10, 5, 5)));
        assert!(!canvas.contains(&Rect::new(-1, 0, 5, 5)));
        assert!(!canvas.contains(&Rect::new(90, 90, 20, 5)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Size::new(96, 64).to_string(), "96x64");
        assert_eq!(Rect::new(-4, 8, 16, 32).to_string(), "16x32+-4+8");
    }

    #[test]
    fn test_size_area() {
        assert_eq!(Size::new(u32::MAX, u32::MAX).area(), 18446744065119617025);
        assert_eq!(Size::new(3, 4).area(), 12);
    }

    #[test]
    fn test_size_empty() {
        assert!(Size::new(0, 10).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }
}
