use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install color-eyre hooks and the global subscriber: env-driven filter
/// (default `info`), compact fmt output, and span capture for error reports.
pub fn init_tracing() -> Result<()> {
    color_eyre::install()?;
    let fmt_layer = fmt::layer().compact();
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
