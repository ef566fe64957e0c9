//! Mention/search autocomplete panel state.
//!
//! Turns raw candidate lists into indexed, de-duplicated entries, feeds them
//! through a [`ListSession`], and resolves a picked candidate either into an
//! edited chat input (input mode) or a member search request (search mode).

use std::{collections::HashSet, ops::Range};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    session::{ListSession, PreparedTransition},
    types::{ChatTextInput, ListEntry, MentionCandidate, MentionSpan, PanelLayout},
};

/// Row height of one mention result.
pub const MENTION_ITEM_HEIGHT: f32 = 42.0;

/// The panel keeps at least three and a half rows visible.
const MINIMUM_VISIBLE_ROWS: f32 = 3.5;

/// Where the panel is attached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MentionMode {
    /// Completing an `@query` inside the chat input.
    Input,
    /// Picking a member to search messages from; rendered upside down.
    Search,
}

impl MentionMode {
    pub fn is_inverted(self) -> bool {
        matches!(self, Self::Search)
    }
}

/// One row of the panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MentionEntry {
    pub index: usize,
    pub candidate: MentionCandidate,
}

impl ListEntry for MentionEntry {
    type Id = i64;

    fn stable_id(&self) -> i64 {
        self.candidate.peer_id
    }
}

/// Result of picking a candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MentionAction {
    /// Replace the chat input with this state.
    UpdateInput(ChatTextInput),
    /// Start searching messages sent by this peer.
    BeginSearch { peer_id: i64 },
}

/// Errors returned when resolving a selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The picked peer is not among the panel's current entries.
    #[error("peer {0} is not in the current results")]
    UnknownPeer(i64),
    /// The input caret points past the end of the text.
    #[error("cursor {cursor} is past the end of input of {len} chars")]
    CursorOutOfBounds { cursor: usize, len: usize },
}

/// Build panel entries, dropping repeated peers and keeping first occurrences.
pub fn entries_from_candidates(candidates: &[MentionCandidate]) -> Vec<MentionEntry> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .iter()
        .filter(|candidate| seen.insert(candidate.peer_id))
        .enumerate()
        .map(|(index, candidate)| MentionEntry {
            index,
            candidate: candidate.clone(),
        })
        .collect()
}

/// Space left above the rows for a panel of the given height.
pub fn top_inset(height: f32) -> f32 {
    let minimum_item_heights = (MENTION_ITEM_HEIGHT * MINIMUM_VISIBLE_ROWS).floor();
    (height - minimum_item_heights).max(0.0)
}

/// Char range of the `@query` being typed at the caret, excluding the `@`.
///
/// The `@` must start the text or follow whitespace, and the query itself may
/// not contain whitespace.
pub fn mention_query_range(input: &ChatTextInput) -> Option<Range<usize>> {
    let chars = input.text.chars().collect::<Vec<_>>();
    if input.cursor > chars.len() {
        return None;
    }

    let mut start = input.cursor;
    while start > 0 {
        let ch = chars[start - 1];
        if ch == '@' {
            let at = start - 1;
            if at == 0 || chars[at - 1].is_whitespace() {
                return Some(start..input.cursor);
            }
            return None;
        }
        if ch.is_whitespace() {
            return None;
        }
        start -= 1;
    }
    None
}

/// Insert `candidate` in place of the mention query at the caret.
///
/// A username replaces the query text and keeps the `@`. Without one, the
/// display title replaces `@query` and is tagged with a [`MentionSpan`].
/// Input without a mention query, or a candidate with neither name, is
/// returned unchanged.
pub fn complete_mention(input: &ChatTextInput, candidate: &MentionCandidate) -> ChatTextInput {
    let Some(range) = mention_query_range(input) else {
        return input.clone();
    };

    if let Some(address_name) = candidate
        .address_name
        .as_deref()
        .filter(|name| !name.is_empty())
    {
        let replacement = format!("{address_name} ");
        return replace_chars(input, range, &replacement, None);
    }

    if !candidate.display_title.is_empty() {
        let widened = range.start - 1..range.end;
        let title_len = candidate.display_title.chars().count();
        let replacement = format!("{} ", candidate.display_title);
        let span = MentionSpan {
            peer_id: candidate.peer_id,
            range: widened.start..widened.start + title_len,
        };
        return replace_chars(input, widened, &replacement, Some(span));
    }

    input.clone()
}

fn replace_chars(
    input: &ChatTextInput,
    range: Range<usize>,
    replacement: &str,
    span: Option<MentionSpan>,
) -> ChatTextInput {
    let start_byte = byte_offset(&input.text, range.start);
    let end_byte = byte_offset(&input.text, range.end);

    let mut text = String::with_capacity(input.text.len() + replacement.len());
    text.push_str(&input.text[..start_byte]);
    text.push_str(replacement);
    text.push_str(&input.text[end_byte..]);

    let inserted = replacement.chars().count();
    let removed = range.end - range.start;

    let mut mentions = input
        .mentions
        .iter()
        .filter_map(|existing| {
            if existing.range.end <= range.start {
                Some(existing.clone())
            } else if existing.range.start >= range.end {
                Some(MentionSpan {
                    peer_id: existing.peer_id,
                    range: existing.range.start + inserted - removed
                        ..existing.range.end + inserted - removed,
                })
            } else {
                None
            }
        })
        .collect::<Vec<_>>();
    if let Some(span) = span {
        mentions.push(span);
        mentions.sort_by_key(|mention| mention.range.start);
    }

    ChatTextInput {
        text,
        cursor: range.start + inserted,
        mentions,
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Mention panel: a list session over de-duplicated candidate entries.
#[derive(Debug, Clone)]
pub struct MentionPanel {
    mode: MentionMode,
    session: ListSession<MentionEntry>,
}

impl MentionPanel {
    pub fn new(mode: MentionMode) -> Self {
        Self {
            mode,
            session: ListSession::new(),
        }
    }

    pub fn mode(&self) -> MentionMode {
        self.mode
    }

    /// Entries currently shown, empty before the first results arrive.
    pub fn entries(&self) -> &[MentionEntry] {
        self.session.current().unwrap_or(&[])
    }

    pub fn update_results(
        &mut self,
        candidates: &[MentionCandidate],
    ) -> Vec<PreparedTransition<MentionEntry>> {
        self.session
            .update_entries(entries_from_candidates(candidates), false)
    }

    pub fn update_layout(&mut self, layout: PanelLayout) -> Vec<PreparedTransition<MentionEntry>> {
        self.session.update_layout(layout)
    }

    /// Shared rendering context changed; every visible row must be rebuilt.
    pub fn context_changed(&mut self) -> Vec<PreparedTransition<MentionEntry>> {
        self.session.refresh_all()
    }

    /// Top inset for the last reported layout.
    pub fn top_inset(&self) -> Option<f32> {
        self.session.layout().map(|layout| top_inset(layout.height))
    }

    pub fn pending_transitions(&self) -> usize {
        self.session.pending()
    }

    /// Resolve a picked peer according to the panel mode.
    pub fn select(
        &self,
        peer_id: i64,
        input: &ChatTextInput,
    ) -> Result<MentionAction, CompletionError> {
        let entry = self
            .entries()
            .iter()
            .find(|entry| entry.candidate.peer_id == peer_id)
            .ok_or(CompletionError::UnknownPeer(peer_id))?;

        match self.mode {
            MentionMode::Input => {
                let len = input.text.chars().count();
                if input.cursor > len {
                    return Err(CompletionError::CursorOutOfBounds {
                        cursor: input.cursor,
                        len,
                    });
                }
                Ok(MentionAction::UpdateInput(complete_mention(
                    input,
                    &entry.candidate,
                )))
            }
            MentionMode::Search => Ok(MentionAction::BeginSearch { peer_id }),
        }
    }
}
