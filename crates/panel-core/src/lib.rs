//! Core list plumbing shared by chat input panels and their runtime.
//!
//! This crate defines the stable list reconciler, the consumer-side visible
//! list, the queued list session, mention panel state, context sources, the
//! secret media viewer state, wallpaper gallery sources and the command/event
//! protocol used by `panel-runtime`.

/// Stable panel error payload.
pub mod error;
/// Mention/search autocomplete panel.
pub mod mention;
/// Stable list reconciliation.
pub mod reconcile;
/// Secret media viewer countdown and dismissal.
pub mod secret_media;
/// Transition queueing for one displayed list.
pub mod session;
/// Context-menu content sources.
pub mod sources;
/// Shared list and protocol types.
pub mod types;
/// Consumer-side application of transitions.
pub mod visible;
/// Wallpaper gallery sources and entries.
pub mod wallpaper;

pub use error::{PanelError, PanelErrorCategory};
pub use mention::{
    CompletionError, MENTION_ITEM_HEIGHT, MentionAction, MentionEntry, MentionMode, MentionPanel,
    complete_mention, entries_from_candidates, mention_query_range, top_inset,
};
pub use reconcile::reconcile;
pub use secret_media::{
    Countdown, ExpiryAttribute, SecretMedia, SecretMediaKind, SecretMediaTitle,
    SecretMediaViewer, SecretMessage, VIEW_ONCE_TIMEOUT, ViewerUpdate,
};
pub use session::{ApplyOptions, ListSession, PreparedTransition};
pub use sources::{ContextSource, SourceKind, SourceSet};
pub use types::{
    ChatTextInput, Deletion, Insertion, ListEntry, MentionCandidate, MentionSpan, PanelCommand,
    PanelEvent, PanelLayout, Transition, Update,
};
pub use visible::{ApplyError, ApplyStep, VisibleList};
pub use wallpaper::{
    ColorOverrides, Wallpaper, WallpaperEntryId, WallpaperFile, WallpaperGallery,
    WallpaperGalleryEntry, WallpaperListKind, WallpaperOptions, WallpaperSettings,
    WallpaperSource, gallery_for_source, with_overrides,
};
