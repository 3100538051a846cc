//! Dirty Cell Tracker
//!
//! Accumulates the bounding rectangle of cells touched since the last
//! vertex flush, plus a "full rebuild" request.
//!
//! # Thread Safety
//!
//! Producers (game logic) may mark cells from any thread through a cloned
//! [`DirtyHandle`]. The render thread drains the state with
//! [`DirtyHandle::take`], which swaps the accumulated rectangle out and
//! leaves an empty one behind. The lock is held only for a single union or
//! swap, never during vertex regeneration or GPU calls.
//!
//! A mark that returns before `take` starts is part of that flush; a mark
//! racing with `take` lands in this flush or the next one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::world::DirtyRect;

#[derive(Debug, Default)]
struct DirtyState {
    /// Accumulating rectangle
    rect: DirtyRect,
    /// Whole buffer must be re-uploaded
    full_rebuild: bool,
    /// Grid width used to split flat cell indices
    columns: usize,
    rows: usize,
}

/// Work drained from the tracker for one flush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyFlush {
    pub rect: DirtyRect,
    pub full_rebuild: bool,
}

impl DirtyFlush {
    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }
}

/// Shared, cloneable handle onto the accumulating dirty state.
#[derive(Clone, Debug, Default)]
pub struct DirtyHandle {
    shared: Arc<Mutex<DirtyState>>,
}

impl DirtyHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DirtyState> {
        // A panicking producer cannot leave the rectangle half-written.
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Union the flat cell index into the dirty rectangle.
    ///
    /// Ignored until a grid has been assigned.
    pub fn mark_cell(&self, cell: usize) {
        let mut state = self.lock();
        if state.columns == 0 {
            return;
        }
        let (x, y) = ((cell % state.columns) as i32, (cell / state.columns) as i32);
        state.rect.union_cell(x, y);
    }

    /// Union a `(column, row)` position; may lie outside the grid.
    pub fn mark_position(&self, x: i32, y: i32) {
        self.lock().rect.union_cell(x, y);
    }

    pub fn mark_rect(&self, rect: &DirtyRect) {
        self.lock().rect.union_rect(rect);
    }

    /// Dirty the whole grid and request a full re-upload.
    pub fn mark_all(&self) {
        let mut state = self.lock();
        state.rect = DirtyRect::new(0, 0, state.columns as i32, state.rows as i32);
        state.full_rebuild = true;
    }

    /// Adopt new grid dimensions and dirty everything.
    pub(crate) fn reset_grid(&self, columns: usize, rows: usize) {
        let mut state = self.lock();
        state.columns = columns;
        state.rows = rows;
        state.rect = DirtyRect::new(0, 0, columns as i32, rows as i32);
        state.full_rebuild = true;
    }

    /// Swap out the accumulated state, leaving it empty.
    pub fn take(&self) -> DirtyFlush {
        let mut state = self.lock();
        let (columns, rows) = (state.columns, state.rows);
        DirtyFlush {
            rect: std::mem::take(&mut state.rect).clipped(columns, rows),
            full_rebuild: std::mem::take(&mut state.full_rebuild),
        }
    }

    /// Whether anything is waiting to be flushed.
    pub fn is_pending(&self) -> bool {
        let state = self.lock();
        !state.rect.clipped(state.columns, state.rows).is_empty()
    }
}
