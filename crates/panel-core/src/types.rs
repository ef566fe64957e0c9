use std::{fmt::Debug, hash::Hash, ops::Range};

use serde::{Deserialize, Serialize};

use crate::{mention::MentionAction, mention::MentionEntry, session::PreparedTransition};

/// An identifiable list value that can be reconciled against a newer snapshot.
///
/// `stable_id` must stay the same for one logical entity across snapshots;
/// `PartialEq` decides whether two entries with the same id differ in content.
pub trait ListEntry: Clone + PartialEq {
    /// Identity key type.
    type Id: Clone + Eq + Hash + Debug;

    /// Identity key that persists across content-changing updates.
    fn stable_id(&self) -> Self::Id;
}

/// Removal of the item at `index` in the old list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deletion {
    /// Position in the old list.
    pub index: usize,
}

/// Insertion of `item` at `index` in the new list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Insertion<T> {
    /// Position in the new list.
    pub index: usize,
    /// New item payload.
    pub item: T,
    /// Position the item occupied in the old list, if any.
    pub previous_index: Option<usize>,
}

/// In-place refresh of an item whose identity survived but content changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Update<T> {
    /// Position in the new list.
    pub index: usize,
    /// Position in the old list.
    pub previous_index: usize,
    /// Updated item payload.
    pub item: T,
}

/// Delete/insert/update operations that turn one list snapshot into another.
///
/// Deletions address the old list, insertions and updates the new one; an
/// update also names the old position it came from. See
/// [`crate::VisibleList::apply`] for the consumer side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transition<T> {
    pub deletions: Vec<Deletion>,
    pub insertions: Vec<Insertion<T>>,
    pub updates: Vec<Update<T>>,
}

impl<T> Transition<T> {
    /// Whether the transition carries no operations at all.
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.updates.is_empty()
    }

    /// Total number of operations across all three sequences.
    pub fn len(&self) -> usize {
        self.deletions.len() + self.insertions.len() + self.updates.len()
    }
}

impl<T> Default for Transition<T> {
    fn default() -> Self {
        Self {
            deletions: Vec::new(),
            insertions: Vec::new(),
            updates: Vec::new(),
        }
    }
}

/// Geometry handed to a panel when its container lays it out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PanelLayout {
    pub width: f32,
    pub height: f32,
    pub left_inset: f32,
    pub right_inset: f32,
    pub bottom_inset: f32,
}

/// Candidate returned by a mention query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MentionCandidate {
    /// Peer identity; used as the entry's stable id.
    pub peer_id: i64,
    /// Public username without the leading `@`, when the peer has one.
    pub address_name: Option<String>,
    /// Short display title used when there is no username.
    pub display_title: String,
}

impl MentionCandidate {
    pub fn new(peer_id: i64, address_name: Option<&str>, display_title: impl Into<String>) -> Self {
        Self {
            peer_id,
            address_name: address_name.map(str::to_owned),
            display_title: display_title.into(),
        }
    }
}

/// Inline mention attached to a span of input text (in chars).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MentionSpan {
    pub peer_id: i64,
    pub range: Range<usize>,
}

/// Chat text input state: text, caret position (in chars) and inline mentions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatTextInput {
    pub text: String,
    pub cursor: usize,
    pub mentions: Vec<MentionSpan>,
}

impl ChatTextInput {
    /// Input with the caret at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            mentions: Vec::new(),
        }
    }
}

/// Command channel input accepted by the panel runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PanelCommand {
    /// Replace the panel's results with a fresh candidate list.
    UpdateResults {
        /// Candidates in display order; may contain duplicates.
        candidates: Vec<MentionCandidate>,
    },
    /// Report a new layout; queued transitions drain once a layout is known.
    UpdateLayout {
        layout: PanelLayout,
    },
    /// Shared rendering context changed; refresh every visible entry.
    ContextChanged,
    /// User picked the candidate with `peer_id`.
    Select {
        peer_id: i64,
        /// Current chat input, used in input mode.
        input: ChatTextInput,
    },
}

/// Event stream output emitted by the panel runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PanelEvent {
    /// A transition is ready to be applied to the visible list.
    TransitionReady(PreparedTransition<MentionEntry>),
    /// Outcome of a `Select` command.
    Selected(MentionAction),
    /// A command could not be handled.
    Error {
        code: String,
        message: String,
    },
}
