use panel_core::{MentionEntry, PanelEvent, PreparedTransition};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// Errors returned when talking to a panel runtime.
#[derive(Debug, Error)]
pub enum PanelChannelError {
    /// The runtime task has exited and no longer reads commands.
    #[error("panel runtime has stopped accepting commands")]
    RuntimeStopped,
}

/// Sending half of the runtime's event fan-out.
#[derive(Clone, Debug)]
pub(crate) struct EventSender {
    tx: broadcast::Sender<PanelEvent>,
}

impl EventSender {
    pub(crate) fn new(buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> PanelEvents {
        PanelEvents {
            rx: self.tx.subscribe(),
            missed: 0,
        }
    }

    pub(crate) fn emit(&self, event: PanelEvent) {
        if self.tx.send(event).is_err() {
            debug!("panel event dropped; no subscribers");
        }
    }
}

/// One subscriber's view of the events a panel runtime emits.
///
/// A subscriber that falls more than the event buffer behind loses the
/// oldest events. The loss is logged and counted in [`PanelEvents::missed`];
/// a view layer that missed a transition should rebuild from fresh results.
#[derive(Debug)]
pub struct PanelEvents {
    rx: broadcast::Receiver<PanelEvent>,
    missed: u64,
}

impl PanelEvents {
    /// Next event, or `None` once the runtime has stopped and the buffer is drained.
    pub async fn recv(&mut self) -> Option<PanelEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    self.missed += skipped;
                    warn!(skipped, total = self.missed, "panel event subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next transition, skipping selections and errors on the way.
    pub async fn next_transition(&mut self) -> Option<PreparedTransition<MentionEntry>> {
        while let Some(event) = self.recv().await {
            if let PanelEvent::TransitionReady(prepared) = event {
                return Some(prepared);
            }
        }
        None
    }

    /// Number of events this subscriber lost by lagging.
    pub fn missed(&self) -> u64 {
        self.missed
    }
}
