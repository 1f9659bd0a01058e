//! rtagclock main entrypoint.

use rtagclock::run;
use rtagclock::ui::messages::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        tracing::error!(error = %e, category = ?e.category(), "command failed");
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
