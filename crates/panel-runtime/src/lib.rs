//! Async runtime that owns one mention panel and serializes every update to it.

mod events;

use panel_core::{
    MentionEntry, MentionMode, MentionPanel, PanelCommand, PanelError, PanelEvent,
    PreparedTransition, VisibleList,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub use events::{PanelChannelError, PanelEvents};

use events::EventSender;

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

#[derive(Clone, Debug)]
pub struct PanelRuntimeHandle {
    command_tx: mpsc::Sender<PanelCommand>,
    events: EventSender,
}

impl PanelRuntimeHandle {
    pub async fn send(&self, command: PanelCommand) -> Result<(), PanelChannelError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| PanelChannelError::RuntimeStopped)
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> PanelEvents {
        self.events.subscribe()
    }
}

/// Spawn a runtime task on the current tokio runtime.
pub fn spawn_runtime(mode: MentionMode) -> PanelRuntimeHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let events = EventSender::new(EVENT_BUFFER);
    let runtime = PanelRuntime::new(command_rx, events.clone(), mode);
    tokio::spawn(async move {
        runtime.run().await;
    });

    PanelRuntimeHandle { command_tx, events }
}

struct PanelRuntime {
    command_rx: mpsc::Receiver<PanelCommand>,
    events: EventSender,
    panel: MentionPanel,
    // Mirror of what the view layer shows once it applied every emitted transition.
    shadow: VisibleList<MentionEntry>,
}

impl PanelRuntime {
    fn new(
        command_rx: mpsc::Receiver<PanelCommand>,
        events: EventSender,
        mode: MentionMode,
    ) -> Self {
        Self {
            command_rx,
            events,
            panel: MentionPanel::new(mode),
            shadow: VisibleList::new(),
        }
    }

    async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            if let Err(err) = self.handle_command(command) {
                warn!(code = %err.code, category = ?err.category, "panel command failed");
                self.events.emit(PanelEvent::Error {
                    code: err.code,
                    message: err.message,
                });
            }
        }
        debug!("panel command channel closed; runtime stopping");
    }

    fn handle_command(&mut self, command: PanelCommand) -> Result<(), PanelError> {
        match command {
            PanelCommand::UpdateResults { candidates } => {
                let ready = self.panel.update_results(&candidates);
                self.emit_transitions(ready)
            }
            PanelCommand::UpdateLayout { layout } => {
                let ready = self.panel.update_layout(layout);
                self.emit_transitions(ready)
            }
            PanelCommand::ContextChanged => {
                let ready = self.panel.context_changed();
                self.emit_transitions(ready)
            }
            PanelCommand::Select { peer_id, input } => {
                let action = self.panel.select(peer_id, &input)?;
                self.events.emit(PanelEvent::Selected(action));
                Ok(())
            }
        }
    }

    /// Emit every ready transition in order.
    ///
    /// A transition that does not apply to the mirror is still emitted; the
    /// mirror is rebuilt from the panel's entries afterwards and the first
    /// failure is returned.
    fn emit_transitions(
        &mut self,
        ready: Vec<PreparedTransition<MentionEntry>>,
    ) -> Result<(), PanelError> {
        let mut failure = None;
        for prepared in ready {
            if failure.is_none()
                && let Err(err) = self.shadow.apply(&prepared.transition)
            {
                warn!(%err, "transition does not apply to the mirrored list");
                failure = Some(PanelError::from(err));
            }
            debug!(
                first_time = prepared.first_time,
                operations = prepared.transition.len(),
                visible = self.shadow.len(),
                "emitting panel transition"
            );
            self.events.emit(PanelEvent::TransitionReady(prepared));
        }

        match failure {
            Some(err) => {
                self.shadow = VisibleList::from(self.panel.entries().to_vec());
                Err(err)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use panel_core::{
        ChatTextInput, Deletion, MentionAction, MentionCandidate, PanelLayout, Transition,
        entries_from_candidates, reconcile,
    };
    use tokio::time::timeout;

    use super::*;

    fn layout() -> PanelLayout {
        PanelLayout {
            width: 390.0,
            height: 320.0,
            ..PanelLayout::default()
        }
    }

    fn candidates() -> Vec<MentionCandidate> {
        vec![
            MentionCandidate::new(1, Some("alice"), "Alice"),
            MentionCandidate::new(2, None, "Bob"),
            MentionCandidate::new(1, Some("alice"), "Alice"),
        ]
    }

    async fn next_event(events: &mut PanelEvents) -> PanelEvent {
        timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("event timeout")
            .expect("runtime should still be running")
    }

    async fn next_transition(events: &mut PanelEvents) -> PreparedTransition<MentionEntry> {
        match next_event(events).await {
            PanelEvent::TransitionReady(prepared) => prepared,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transitions_wait_for_layout() {
        let handle = spawn_runtime(MentionMode::Input);
        let mut events = handle.subscribe();

        handle
            .send(PanelCommand::UpdateResults {
                candidates: candidates(),
            })
            .await
            .expect("command should enqueue");
        handle
            .send(PanelCommand::UpdateLayout { layout: layout() })
            .await
            .expect("command should enqueue");

        let prepared = next_transition(&mut events).await;
        assert!(prepared.first_time);
        assert!(prepared.options().slide_in);
        assert_eq!(prepared.transition.insertions.len(), 2);
    }

    #[tokio::test]
    async fn context_change_emits_forced_updates() {
        let handle = spawn_runtime(MentionMode::Input);
        let mut events = handle.subscribe();

        handle
            .send(PanelCommand::UpdateLayout { layout: layout() })
            .await
            .expect("command should enqueue");
        handle
            .send(PanelCommand::UpdateResults {
                candidates: candidates(),
            })
            .await
            .expect("command should enqueue");
        handle
            .send(PanelCommand::ContextChanged)
            .await
            .expect("command should enqueue");

        let _first = next_transition(&mut events).await;
        let prepared = next_transition(&mut events).await;
        assert!(!prepared.first_time);
        assert_eq!(prepared.transition.updates.len(), 2);
        assert!(prepared.options().animate_crossfade);
    }

    #[tokio::test]
    async fn reordered_results_apply_without_errors() {
        let handle = spawn_runtime(MentionMode::Search);
        let mut events = handle.subscribe();

        handle
            .send(PanelCommand::UpdateLayout { layout: layout() })
            .await
            .expect("command should enqueue");
        handle
            .send(PanelCommand::UpdateResults {
                candidates: vec![
                    MentionCandidate::new(1, Some("alice"), "Alice"),
                    MentionCandidate::new(2, Some("xavier"), "Xavier"),
                    MentionCandidate::new(3, Some("bob"), "Bob"),
                ],
            })
            .await
            .expect("command should enqueue");
        handle
            .send(PanelCommand::UpdateResults {
                candidates: vec![
                    MentionCandidate::new(4, Some("carol"), "Carol"),
                    MentionCandidate::new(2, Some("xavier"), "Xavier"),
                    MentionCandidate::new(1, Some("alice"), "Alice"),
                ],
            })
            .await
            .expect("command should enqueue");
        handle
            .send(PanelCommand::Select {
                peer_id: 4,
                input: ChatTextInput::default(),
            })
            .await
            .expect("command should enqueue");

        let mut view = VisibleList::new();
        for _ in 0..2 {
            let prepared = next_transition(&mut events).await;
            view.apply(&prepared.transition)
                .expect("emitted transition should apply");
        }
        assert_eq!(view.stable_ids(), vec![4, 2, 1]);

        match next_event(&mut events).await {
            PanelEvent::Selected(MentionAction::BeginSearch { peer_id }) => {
                assert_eq!(peer_id, 4)
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn select_emits_completed_input() {
        let handle = spawn_runtime(MentionMode::Input);
        let mut events = handle.subscribe();

        handle
            .send(PanelCommand::UpdateResults {
                candidates: candidates(),
            })
            .await
            .expect("command should enqueue");
        handle
            .send(PanelCommand::Select {
                peer_id: 1,
                input: ChatTextInput::new("ping @al"),
            })
            .await
            .expect("command should enqueue");

        match next_event(&mut events).await {
            PanelEvent::Selected(MentionAction::UpdateInput(input)) => {
                assert_eq!(input.text, "ping @alice ");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn select_of_unknown_peer_emits_error() {
        let handle = spawn_runtime(MentionMode::Search);
        let mut events = handle.subscribe();

        handle
            .send(PanelCommand::Select {
                peer_id: 99,
                input: ChatTextInput::default(),
            })
            .await
            .expect("command should enqueue");

        match next_event(&mut events).await {
            PanelEvent::Error { code, .. } => assert_eq!(code, "unknown_peer"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_fails_once_runtime_is_gone() {
        let (command_tx, command_rx) = mpsc::channel(1);
        drop(command_rx);
        let handle = PanelRuntimeHandle {
            command_tx,
            events: EventSender::new(1),
        };

        let err = handle
            .send(PanelCommand::ContextChanged)
            .await
            .expect_err("closed runtime should reject commands");
        assert!(matches!(err, PanelChannelError::RuntimeStopped));
    }

    #[tokio::test]
    async fn broken_transition_does_not_hold_back_later_ones() {
        let events = EventSender::new(8);
        let mut subscriber = events.subscribe();
        let (_command_tx, command_rx) = mpsc::channel(1);
        let mut runtime = PanelRuntime::new(command_rx, events, MentionMode::Input);

        let broken = PreparedTransition {
            transition: Transition {
                deletions: vec![Deletion { index: 9 }],
                ..Transition::default()
            },
            first_time: true,
        };
        let entries = entries_from_candidates(&candidates());
        let valid = PreparedTransition {
            transition: reconcile(&[], &entries, false),
            first_time: false,
        };

        let err = runtime
            .emit_transitions(vec![broken, valid])
            .expect_err("broken transition should be reported");
        assert_eq!(err.code, "transition_not_applicable");

        let first = next_transition(&mut subscriber).await;
        assert_eq!(first.transition.deletions.len(), 1);
        let second = next_transition(&mut subscriber).await;
        assert_eq!(second.transition.insertions.len(), 2);
        assert!(runtime.shadow.items() == runtime.panel.entries());
    }
}
