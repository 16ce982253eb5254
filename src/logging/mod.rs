use crate::logging::format::Formatter;
pub use log_writer::LogWriter;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

mod format;
mod log_writer;

fn is_own_module(module_path: &str) -> bool {
    module_path == "pricewatch" || module_path.starts_with("pricewatch::")
}

/// Installs the global subscriber.
///
/// stdout belongs to the interactive prompt, so events go to `file` when one
/// is configured and to stderr otherwise.
pub fn registry_logs(
    writer: &mut LogWriter,
    level: Level,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let own_events = move |metadata: &tracing::Metadata<'_>| {
        metadata.module_path().map(is_own_module).unwrap_or(false) && metadata.level() <= &level
    };
    let layer = match file {
        Some(path) => {
            let file = writer.create_file_writer(path)?;
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(Formatter::new(false))
                .with_writer(file)
                .with_filter(filter::filter_fn(own_events))
                .boxed()
        }
        None => tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .event_format(Formatter::new(true))
            .with_writer(std::io::stderr)
            .with_filter(filter::filter_fn(own_events))
            .boxed(),
    };
    tracing_subscriber::registry()
        .with(layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;
    Ok(())
}
