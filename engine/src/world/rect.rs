//! Integer Cell Rectangles
//!
//! Half-open bounding boxes over grid cells, used to accumulate the set of
//! cells touched since the last vertex flush.

/// Axis-aligned cell rectangle `[left, right) x [top, bottom)`.
///
/// An empty rectangle has `right <= left` or `bottom <= top`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl DirtyRect {
    pub const EMPTY: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    /// Grow to include the cell at `(x, y)`.
    pub fn union_cell(&mut self, x: i32, y: i32) {
        if self.is_empty() {
            *self = Self::new(x, y, x + 1, y + 1);
        } else {
            self.left = self.left.min(x);
            self.top = self.top.min(y);
            self.right = self.right.max(x + 1);
            self.bottom = self.bottom.max(y + 1);
        }
    }

    /// Grow to include another rectangle.
    pub fn union_rect(&mut self, other: &DirtyRect) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
        } else {
            self.left = self.left.min(other.left);
            self.top = self.top.min(other.top);
            self.right = self.right.max(other.right);
            self.bottom = self.bottom.max(other.bottom);
        }
    }

    /// Intersection with `[0, columns) x [0, rows)`.
    pub fn clipped(&self, columns: usize, rows: usize) -> DirtyRect {
        let clipped = DirtyRect::new(
            self.left.max(0),
            self.top.max(0),
            self.right.min(columns as i32),
            self.bottom.min(rows as i32),
        );
        if clipped.is_empty() {
            DirtyRect::EMPTY
        } else {
            clipped
        }
    }
}
