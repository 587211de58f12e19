use anyhow::{Context, Result};
use log::{log, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::sync::mpsc::Receiver;

use crate::destination::EventLogItem;

/// Initialize terminal logging with the specified verbosity level.
///
/// Meant for the embedding binary's startup. Only one logger can be
/// installed per process, so a second call fails.
pub fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Replay event log records through the `log` facade until every sender is dropped.
///
/// Returns the number of records forwarded.
pub async fn drain_event_log(mut event_log: Receiver<EventLogItem>) -> usize {
    let mut forwarded = 0;

    while let Some(item) = event_log.recv().await {
        log!(target: "archive_event", item.level.log_level(), "{}", item.message);
        forwarded += 1;
    }

    forwarded
}
