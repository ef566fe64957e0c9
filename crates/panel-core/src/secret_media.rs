use serde::{Deserialize, Serialize};
use tracing::debug;

/// Expiry timeout that marks media as viewable only once.
pub const VIEW_ONCE_TIMEOUT: i32 = 0x7fff_ffff;

/// Self-destruct attribute attached to a secret message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpiryAttribute {
    /// Seconds the content stays visible once the countdown starts.
    pub timeout: i32,
    /// Unix time at which the countdown started, if it did.
    pub countdown_begin_time: Option<i32>,
}

impl ExpiryAttribute {
    pub fn is_view_once(&self) -> bool {
        self.timeout == VIEW_ONCE_TIMEOUT
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum SecretMedia {
    Image,
    File {
        /// Playback length in seconds for audio/video files.
        duration: Option<f64>,
        animated: bool,
        /// A complete local copy exists and can be played.
        downloaded: bool,
    },
}

/// What the viewer needs to know about the message it shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecretMessage {
    pub id: i64,
    pub incoming: bool,
    pub media: SecretMedia,
    pub autoclear: Option<ExpiryAttribute>,
    pub autoremove: Option<ExpiryAttribute>,
    /// The content was already replaced by an expiry placeholder.
    pub expired: bool,
}

/// Countdown shown over the media, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Countdown {
    pub begin_time: f64,
    pub timeout: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecretMediaKind {
    Gif,
    Video,
    Image,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecretMediaTitle {
    Gif,
    Video,
    VideoViewOnce,
    Image,
    ImageViewOnce,
}

impl SecretMessage {
    /// Autoclear wins over autoremove when both are present.
    pub fn expiry(&self) -> Option<&ExpiryAttribute> {
        self.autoclear.as_ref().or(self.autoremove.as_ref())
    }

    pub fn is_view_once(&self) -> bool {
        self.expiry().is_some_and(ExpiryAttribute::is_view_once)
    }

    pub fn kind(&self) -> SecretMediaKind {
        match self.media {
            SecretMedia::Image => SecretMediaKind::Image,
            SecretMedia::File { animated: true, .. } => SecretMediaKind::Gif,
            SecretMedia::File { .. } => SecretMediaKind::Video,
        }
    }

    /// Countdown to show once the recipient opened the media.
    ///
    /// Playable files count down their own duration from `now`; anything
    /// else counts down the expiry timeout from when it started.
    pub fn countdown(&self, now: f64) -> Option<Countdown> {
        let expiry = self.expiry()?;
        let begin_time = expiry.countdown_begin_time?;
        match self.media {
            SecretMedia::File {
                duration: Some(duration),
                ..
            } => Some(Countdown {
                begin_time: now,
                timeout: duration,
            }),
            _ => Some(Countdown {
                begin_time: f64::from(begin_time),
                timeout: f64::from(expiry.timeout),
            }),
        }
    }

    pub fn title(&self) -> SecretMediaTitle {
        match (self.kind(), self.is_view_once()) {
            (SecretMediaKind::Gif, _) => SecretMediaTitle::Gif,
            (SecretMediaKind::Video, true) => SecretMediaTitle::VideoViewOnce,
            (SecretMediaKind::Video, false) => SecretMediaTitle::Video,
            (SecretMediaKind::Image, true) => SecretMediaTitle::ImageViewOnce,
            (SecretMediaKind::Image, false) => SecretMediaTitle::Image,
        }
    }

    /// Outgoing media the peer has not opened yet gets a "not viewed yet" note.
    pub fn not_viewed_footer(&self, now: f64) -> Option<SecretMediaKind> {
        (!self.incoming && self.countdown(now).is_none()).then(|| self.kind())
    }
}

/// Result of feeding the viewer the latest state of its message.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerUpdate {
    /// A different message is now shown.
    Show {
        message_id: i64,
        title: SecretMediaTitle,
        countdown: Option<Countdown>,
        footer: Option<SecretMediaKind>,
    },
    /// Same message; its countdown (re)started.
    Countdown(Countdown),
    /// Nothing to change.
    Keep,
    /// The message is gone and the viewer should close.
    Dismiss,
}

/// Tracks which secret message the viewer shows and when it must close.
#[derive(Debug, Clone, Default)]
pub struct SecretMediaViewer {
    current: Option<i64>,
    current_is_video: bool,
    current_is_view_once: bool,
}

impl SecretMediaViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<i64> {
        self.current
    }

    /// Apply the latest message state; `None` means it was deleted.
    ///
    /// Expired content counts as deleted. Videos and view-once media stay
    /// open after the message goes away so playback can finish.
    pub fn apply_message(&mut self, message: Option<&SecretMessage>, now: f64) -> ViewerUpdate {
        let Some(message) = message.filter(|message| !message.expired) else {
            if self.current_is_video || self.current_is_view_once {
                return ViewerUpdate::Keep;
            }
            debug!(message_id = ?self.current, "secret media gone; dismissing viewer");
            return ViewerUpdate::Dismiss;
        };

        if self.current == Some(message.id) {
            return match message.countdown(now) {
                Some(countdown) => ViewerUpdate::Countdown(countdown),
                None => ViewerUpdate::Keep,
            };
        }

        self.current = Some(message.id);
        self.current_is_video = matches!(message.media, SecretMedia::File { downloaded: true, .. });
        self.current_is_view_once = message.is_view_once();
        ViewerUpdate::Show {
            message_id: message.id,
            title: message.title(),
            countdown: message.countdown(now),
            footer: message.not_viewed_footer(now),
        }
    }
}
