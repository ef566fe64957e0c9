use thiserror::Error;

use crate::types::{ListEntry, Transition};

/// Which step of a transition was being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStep {
    Delete,
    Insert,
    Update,
}

/// Errors that can occur while applying a transition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// An operation referenced a position outside the list it addresses.
    #[error("{op:?} at index {index} is out of range for list of length {len}")]
    IndexOutOfRange {
        op: ApplyStep,
        index: usize,
        len: usize,
    },
    /// Two operations target the same position in the new list.
    #[error("{op:?} targets index {index}, which is already filled")]
    SlotConflict { op: ApplyStep, index: usize },
    /// An update's previous position is deleted, out of range, or claimed twice.
    #[error("update refers to old index {previous_index}, which is not available")]
    StalePrevious { previous_index: usize },
}

/// In-memory item collection that mirrors what the view layer shows.
#[derive(Debug, Clone)]
pub struct VisibleList<T> {
    items: Vec<T>,
}

impl<T> Default for VisibleList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for VisibleList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: ListEntry> VisibleList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply a transition by position.
    ///
    /// The new list has `len - deletions + insertions` slots. Insertions and
    /// updates fill the slots at their new index; an update also claims its
    /// old item. Remaining slots take the unclaimed old items in their old
    /// order. On error the list is left untouched.
    pub fn apply(&mut self, transition: &Transition<T>) -> Result<(), ApplyError> {
        let old_len = self.items.len();
        let mut claimed = vec![false; old_len];
        for op in &transition.deletions {
            let slot = claimed
                .get_mut(op.index)
                .ok_or(ApplyError::IndexOutOfRange {
                    op: ApplyStep::Delete,
                    index: op.index,
                    len: old_len,
                })?;
            *slot = true;
        }

        let deleted = claimed.iter().filter(|gone| **gone).count();
        let new_len = old_len - deleted + transition.insertions.len();
        let mut slots: Vec<Option<T>> = vec![None; new_len];

        for op in &transition.insertions {
            fill(&mut slots, ApplyStep::Insert, op.index, &op.item)?;
        }

        for op in &transition.updates {
            match claimed.get_mut(op.previous_index) {
                Some(taken) if !*taken => *taken = true,
                _ => {
                    return Err(ApplyError::StalePrevious {
                        previous_index: op.previous_index,
                    });
                }
            }
            fill(&mut slots, ApplyStep::Update, op.index, &op.item)?;
        }

        let mut survivors = self
            .items
            .iter()
            .zip(&claimed)
            .filter(|(_, taken)| !**taken)
            .map(|(item, _)| item);
        for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
            *slot = survivors.next().cloned();
        }

        self.items = slots.into_iter().flatten().collect();
        Ok(())
    }

    /// Stable ids of the current items, in display order.
    pub fn stable_ids(&self) -> Vec<T::Id> {
        self.items.iter().map(T::stable_id).collect()
    }
}

fn fill<T: Clone>(
    slots: &mut [Option<T>],
    op: ApplyStep,
    index: usize,
    item: &T,
) -> Result<(), ApplyError> {
    let len = slots.len();
    let slot = slots
        .get_mut(index)
        .ok_or(ApplyError::IndexOutOfRange { op, index, len })?;
    if slot.is_some() {
        return Err(ApplyError::SlotConflict { op, index });
    }
    *slot = Some(item.clone());
    Ok(())
}
