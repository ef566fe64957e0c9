//! Tracing bootstrap for the smoke binary.

use std::env;

use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,panel_smoke=debug,panel_runtime=debug";

/// Environment keys consulted for filter directives, highest priority first.
const FILTER_KEYS: [&str; 3] = ["RUST_LOG", "PANEL_SMOKE_LOG", "PANEL_LOG"];

/// Filter directives together with where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterChoice {
    origin: &'static str,
    directives: String,
}

/// Install the global subscriber; a second call is a no-op.
pub fn init() {
    let choice = resolve_filter(|key| env::var(key).ok());
    let filter = EnvFilter::try_new(&choice.directives)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let installed = tracing_subscriber::fmt()
        .compact()
        .with_target(true)
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        debug!(origin = choice.origin, directives = %choice.directives, "log filter selected");
    }
}

/// First key with non-blank directives that parse wins; otherwise the default.
fn resolve_filter<F>(mut lookup: F) -> FilterChoice
where
    F: FnMut(&str) -> Option<String>,
{
    FILTER_KEYS
        .into_iter()
        .find_map(|key| {
            let directives = lookup(key)?.trim().to_owned();
            let usable = !directives.is_empty() && EnvFilter::try_new(&directives).is_ok();
            usable.then_some(FilterChoice {
                origin: key,
                directives,
            })
        })
        .unwrap_or_else(|| FilterChoice {
            origin: "default",
            directives: DEFAULT_DIRECTIVES.to_owned(),
        })
}
