use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info,lesen=debug";

/// Install the global subscriber; `RUST_LOG` overrides the default filter
pub fn init(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true);

    let installed = if json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder
            .with_ansi(atty::is(atty::Stream::Stdout))
            .try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))
}
