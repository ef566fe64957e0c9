use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    reconcile::reconcile,
    types::{ListEntry, PanelLayout, Transition},
};

/// How the view layer should apply one transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Animate the position of the topmost item.
    pub animate_top_item_position: bool,
    /// Crossfade items that change in place.
    pub animate_crossfade: bool,
    /// Slide the whole list up from below once the items are in place.
    pub slide_in: bool,
}

impl ApplyOptions {
    /// The first population lands without per-item animation and then slides
    /// in as a whole; later ones animate per item.
    pub fn for_transition(first_time: bool) -> Self {
        Self {
            animate_top_item_position: !first_time,
            animate_crossfade: !first_time,
            slide_in: first_time,
        }
    }
}

/// Transition paired with whether it is the session's first population.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreparedTransition<T> {
    pub transition: Transition<T>,
    pub first_time: bool,
}

impl<T> PreparedTransition<T> {
    pub fn options(&self) -> ApplyOptions {
        ApplyOptions::for_transition(self.first_time)
    }
}

/// Current-entries holder that turns successive snapshots into transitions.
///
/// Transitions are queued until a layout is known; from then on every
/// update drains the queue in FIFO order.
#[derive(Debug, Clone)]
pub struct ListSession<T> {
    current: Option<Vec<T>>,
    queued: VecDeque<PreparedTransition<T>>,
    layout: Option<PanelLayout>,
}

impl<T> Default for ListSession<T> {
    fn default() -> Self {
        Self {
            current: None,
            queued: VecDeque::new(),
            layout: None,
        }
    }
}

impl<T: ListEntry> ListSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of the last update, or `None` before the first one.
    pub fn current(&self) -> Option<&[T]> {
        self.current.as_deref()
    }

    pub fn layout(&self) -> Option<PanelLayout> {
        self.layout
    }

    /// Number of transitions waiting for a layout.
    pub fn pending(&self) -> usize {
        self.queued.len()
    }

    /// Reconcile `entries` against the current snapshot and make them current.
    ///
    /// Returns the transitions that are ready to apply, which is empty while
    /// no layout has been reported.
    pub fn update_entries(
        &mut self,
        entries: Vec<T>,
        force_update: bool,
    ) -> Vec<PreparedTransition<T>> {
        let first_time = self.current.is_none();
        let previous = self.current.as_deref().unwrap_or(&[]);
        let transition = reconcile(previous, &entries, force_update);

        debug!(
            first_time,
            force_update,
            deletions = transition.deletions.len(),
            insertions = transition.insertions.len(),
            updates = transition.updates.len(),
            "list transition enqueued"
        );

        self.current = Some(entries);
        self.queued.push_back(PreparedTransition {
            transition,
            first_time,
        });
        self.drain_if_laid_out()
    }

    /// Refresh every current entry after shared context (e.g. theme) changed.
    pub fn refresh_all(&mut self) -> Vec<PreparedTransition<T>> {
        match self.current.clone() {
            Some(entries) => self.update_entries(entries, true),
            None => Vec::new(),
        }
    }

    /// Record a layout. The first valid layout flushes anything queued so far.
    pub fn update_layout(&mut self, layout: PanelLayout) -> Vec<PreparedTransition<T>> {
        self.layout = Some(layout);
        self.drain_if_laid_out()
    }

    fn drain_if_laid_out(&mut self) -> Vec<PreparedTransition<T>> {
        if self.layout.is_none() {
            return Vec::new();
        }
        let ready = self.queued.drain(..).collect::<Vec<_>>();
        if !ready.is_empty() {
            debug!(count = ready.len(), "list transitions dequeued");
        }
        ready
    }
}
