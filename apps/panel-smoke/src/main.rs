mod config;
mod logging;

use std::time::Duration;

use config::SmokeConfig;
use panel_core::{ChatTextInput, MentionCandidate, PanelCommand, PanelEvent, PanelLayout};
use panel_runtime::{PanelChannelError, PanelEvents, spawn_runtime};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{error, info};

/// Ways a scripted smoke run can fail.
#[derive(Debug, Error)]
enum SmokeError {
    #[error(transparent)]
    Channel(#[from] PanelChannelError),
    #[error("no panel event within {ms}ms")]
    Timeout { ms: u128 },
    #[error("panel runtime stopped before the script finished")]
    RuntimeStopped,
    #[error("panel reported {code}: {message}")]
    Panel { code: String, message: String },
}

#[tokio::main]
async fn main() {
    logging::init();

    let config = match SmokeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config).await {
        error!("panel smoke run failed: {err}");
        std::process::exit(1);
    }
}

async fn run(config: &SmokeConfig) -> Result<(), SmokeError> {
    let handle = spawn_runtime(config.mode);
    let mut events = handle.subscribe();
    let wait = Duration::from_millis(config.event_timeout_ms);

    let script = vec![
        PanelCommand::UpdateResults {
            candidates: vec![
                MentionCandidate::new(1, Some("alice"), "Alice"),
                MentionCandidate::new(2, None, "Bob Stone"),
                MentionCandidate::new(1, Some("alice"), "Alice"),
            ],
        },
        PanelCommand::UpdateLayout {
            layout: PanelLayout {
                width: config.layout_width,
                height: config.layout_height,
                ..PanelLayout::default()
            },
        },
        PanelCommand::UpdateResults {
            candidates: vec![
                MentionCandidate::new(2, None, "Bob Stone"),
                MentionCandidate::new(3, Some("carol"), "Carol"),
            ],
        },
        PanelCommand::ContextChanged,
        PanelCommand::Select {
            peer_id: 2,
            input: ChatTextInput::new("hey @bo"),
        },
    ];
    let expected_events = 4;

    for command in script {
        handle.send(command).await?;
    }

    for _ in 0..expected_events {
        let event = next_event(&mut events, wait).await?;
        report(&event);
        if let PanelEvent::Error { code, message } = event {
            return Err(SmokeError::Panel { code, message });
        }
    }

    info!(missed = events.missed(), "panel smoke run completed");
    Ok(())
}

async fn next_event(events: &mut PanelEvents, wait: Duration) -> Result<PanelEvent, SmokeError> {
    timeout(wait, events.recv())
        .await
        .map_err(|_| SmokeError::Timeout {
            ms: wait.as_millis(),
        })?
        .ok_or(SmokeError::RuntimeStopped)
}

fn report(event: &PanelEvent) {
    match event {
        PanelEvent::TransitionReady(prepared) => info!(
            first_time = prepared.first_time,
            deletions = prepared.transition.deletions.len(),
            insertions = prepared.transition.insertions.len(),
            updates = prepared.transition.updates.len(),
            "transition ready"
        ),
        PanelEvent::Selected(action) => info!(?action, "selection resolved"),
        PanelEvent::Error { code, message } => error!(%code, %message, "panel error"),
    }
}
