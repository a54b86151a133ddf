//! Ordered-collection protocol shared by the reorderable lists (achievements,
//! per-achievement images and links).
//!
//! Positions are 1-based and contiguous: within one scope the set of positions of an
//! at-rest collection is exactly `{1..n}`. Two entry points keep that invariant over one
//! shared primitive: [`renumber`] reassigns the whole list after an interactive reorder,
//! and [`plan_move`] computes the minimal range shift for a single move-to-position.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("position {pos} out of range for a list of {len}")]
    OutOfRange { pos: i64, len: i64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DragError {
    #[error("index {index} out of bounds for a list of {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("no drag in progress")]
    NoActiveDrag,
}

/// An item carrying a persisted 1-based position.
pub trait Positioned {
    fn position(&self) -> i64;
    fn set_position(&mut self, position: i64);
}

/// Assigns contiguous positions `1..=n` following the slice order.
pub fn renumber<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index as i64 + 1);
    }
}

/// A half-closed shift of every position in `lo..=hi` by `delta` (always ±1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeShift {
    pub lo: i64,
    pub hi: i64,
    pub delta: i64,
}

/// Plans a single-item move from `old_pos` to `new_pos` in a list of `len` items.
///
/// Returns `None` when the move is a no-op. Otherwise the returned [`RangeShift`] covers
/// exactly the items strictly between the vacated and the claimed slot; applying it and
/// then writing `new_pos` to the moved item is the minimal change that keeps positions a
/// contiguous `1..=len` permutation. `old_pos` is trusted (it comes from the stored
/// collection); `new_pos` outside `1..=len` is rejected, never clamped.
pub fn plan_move(
    old_pos: i64,
    new_pos: i64,
    len: i64,
) -> Result<Option<RangeShift>, PositionError> {
    if new_pos < 1 || new_pos > len {
        return Err(PositionError::OutOfRange { pos: new_pos, len });
    }
    debug_assert!(old_pos >= 1 && old_pos <= len);

    if new_pos == old_pos {
        Ok(None)
    } else if new_pos > old_pos {
        // Moving later: everything in (old, new] slides one slot earlier.
        Ok(Some(RangeShift {
            lo: old_pos + 1,
            hi: new_pos,
            delta: -1,
        }))
    } else {
        // Moving earlier: everything in [new, old) slides one slot later.
        Ok(Some(RangeShift {
            lo: new_pos,
            hi: old_pos - 1,
            delta: 1,
        }))
    }
}

/// Client-side drag-and-drop session over an ordered list.
///
/// The session owns a working copy that diverges from the baseline (the persisted order)
/// while a drag is active. [`DragSession::commit`] renumbers the working order and
/// promotes it to the new baseline; the caller is responsible for persisting it.
/// [`DragSession::cancel`] restores the baseline verbatim.
#[derive(Debug, Clone)]
pub struct DragSession<T> {
    baseline: Vec<T>,
    working: Vec<T>,
    dragged: Option<usize>,
}

impl<T: Clone + Positioned> DragSession<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            baseline: items.clone(),
            working: items,
            dragged: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    /// The live order, mid-drag or at rest.
    pub fn order(&self) -> &[T] {
        &self.working
    }

    /// Starts dragging the item at `index`. A drag already in progress is implicitly
    /// cancelled first, so no partial reordering from the prior session leaks through.
    pub fn begin(&mut self, index: usize) -> Result<(), DragError> {
        if self.dragged.is_some() {
            self.cancel();
        }
        if index >= self.working.len() {
            return Err(DragError::IndexOutOfBounds {
                index,
                len: self.working.len(),
            });
        }
        self.dragged = Some(index);
        Ok(())
    }

    /// Reinserts the dragged item at `target`. Hovering the dragged item's own index is
    /// a no-op, so repeated identical hover events leave the order unchanged. All other
    /// items keep their relative order.
    pub fn hover(&mut self, target: usize) -> Result<(), DragError> {
        let from = self.dragged.ok_or(DragError::NoActiveDrag)?;
        if target >= self.working.len() {
            return Err(DragError::IndexOutOfBounds {
                index: target,
                len: self.working.len(),
            });
        }
        if target == from {
            return Ok(());
        }
        let item = self.working.remove(from);
        self.working.insert(target, item);
        self.dragged = Some(target);
        Ok(())
    }

    /// Ends the drag: renumbers the working order contiguously from 1 and makes it the
    /// new at-rest baseline. Returns the final order for the caller to persist.
    pub fn commit(&mut self) -> Result<&[T], DragError> {
        self.dragged.take().ok_or(DragError::NoActiveDrag)?;
        renumber(&mut self.working);
        self.baseline = self.working.clone();
        Ok(&self.working)
    }

    /// Abandons the drag and restores the previously persisted order.
    pub fn cancel(&mut self) {
        self.dragged = None;
        self.working = self.baseline.clone();
    }
}
