//! Swipeable context-menu content sources.
//!
//! A context menu can host several sources side by side; exactly one is
//! active. Children refer back to the set by source id rather than holding a
//! reference to it.

use serde::{Deserialize, Serialize};

use crate::error::PanelError;

/// What a source presents above its action list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    /// Menu anchored at a point in the screen.
    Location { x: i32, y: i32 },
    /// Menu anchored to an existing view, identified by key.
    Reference { view_key: String },
    /// A message bubble lifted out of the chat list.
    Extracted { message_id: i64 },
    /// A full preview controller, e.g. a peer or media preview.
    Controller { controller_key: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextSource {
    pub id: String,
    pub title: String,
    pub kind: SourceKind,
}

/// Non-empty ordered set of sources with one active entry.
#[derive(Debug, Clone)]
pub struct SourceSet {
    sources: Vec<ContextSource>,
    active_index: usize,
}

impl SourceSet {
    /// Build a set whose active source is `initial_id`, or the first one when
    /// no source carries that id.
    pub fn new(sources: Vec<ContextSource>, initial_id: Option<&str>) -> Result<Self, PanelError> {
        if sources.is_empty() {
            return Err(PanelError::empty_sources());
        }
        let active_index = initial_id
            .and_then(|id| sources.iter().position(|source| source.id == id))
            .unwrap_or(0);
        Ok(Self {
            sources,
            active_index,
        })
    }

    pub fn sources(&self) -> &[ContextSource] {
        &self.sources
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active(&self) -> &ContextSource {
        &self.sources[self.active_index]
    }

    /// Paging between sources only makes sense with more than one.
    pub fn allows_paging(&self) -> bool {
        self.sources.len() > 1
    }

    /// Activate the source with `id`. Returns `false` if no source has it.
    pub fn select(&mut self, id: &str) -> bool {
        match self.sources.iter().position(|source| source.id == id) {
            Some(index) => {
                self.active_index = index;
                true
            }
            None => false,
        }
    }

    /// Move the active index by `delta`, clamped to the set bounds.
    /// Returns whether the active source changed.
    pub fn step(&mut self, delta: isize) -> bool {
        let last = self.sources.len() - 1;
        let next = self
            .active_index
            .saturating_add_signed(delta)
            .min(last);
        let changed = next != self.active_index;
        self.active_index = next;
        changed
    }
}
