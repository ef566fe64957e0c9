use std::collections::HashMap;

use tracing::warn;

use crate::types::{Deletion, Insertion, ListEntry, Transition, Update};

/// Compute the operations that turn `old` into `new`.
///
/// Both inputs must be unique by `stable_id`. Entries present only in `new`
/// become insertions, entries present only in `old` become deletions, and
/// entries present in both become updates when their content differs or
/// `force_update_all` is set. Position changes alone produce nothing: there is
/// no move operation, an update simply carries both positions.
///
/// Duplicate ids are a caller bug. They are logged and then silently
/// mis-associated (last occurrence wins in `old`, first in `new`).
pub fn reconcile<T: ListEntry>(old: &[T], new: &[T], force_update_all: bool) -> Transition<T> {
    let old_positions = position_index(old, Occurrence::Last, "old");
    let new_positions = position_index(new, Occurrence::First, "new");

    let mut transition = Transition::default();

    for (index, item) in new.iter().enumerate() {
        match old_positions.get(&item.stable_id()) {
            None => transition.insertions.push(Insertion {
                index,
                item: item.clone(),
                previous_index: None,
            }),
            Some(&previous_index) => {
                if force_update_all || old[previous_index] != *item {
                    transition.updates.push(Update {
                        index,
                        previous_index,
                        item: item.clone(),
                    });
                }
            }
        }
    }

    for (index, item) in old.iter().enumerate() {
        if !new_positions.contains_key(&item.stable_id()) {
            transition.deletions.push(Deletion { index });
        }
    }

    transition
}

#[derive(Clone, Copy)]
enum Occurrence {
    First,
    Last,
}

fn position_index<T: ListEntry>(
    items: &[T],
    keep: Occurrence,
    side: &'static str,
) -> HashMap<T::Id, usize> {
    let mut positions = HashMap::with_capacity(items.len());
    let mut duplicates = 0_usize;

    for (index, item) in items.iter().enumerate() {
        let id = item.stable_id();
        if let Some(existing) = positions.get_mut(&id) {
            duplicates += 1;
            if let Occurrence::Last = keep {
                *existing = index;
            }
        } else {
            positions.insert(id, index);
        }
    }

    if duplicates > 0 {
        warn!(side, duplicates, "reconcile input contains duplicate stable ids");
    }

    positions
}
