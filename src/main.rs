use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Logs go to stderr so command output on stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("QUADCALC_LOG")
                .unwrap_or_else(|_| EnvFilter::new("quadcalc=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    quadcalc::run()?;
    Ok(())
}
