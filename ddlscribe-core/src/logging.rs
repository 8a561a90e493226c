//! Logging bootstrap shared by the ddlscribe binary and tests.

use crate::Result;

/// Initializes structured logging from the CLI verbosity level.
///
/// Verbosity maps to levels as: 0=ERROR (failures only), 1=INFO
/// (category-boundary messages), 2=DEBUG (per-step progress),
/// 3=TRACE (per-statement tracing). Values above 3 are rejected by
/// argument parsing before this is called; they map to TRACE here.
///
/// # Errors
/// Returns a configuration error if a global subscriber is already set.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            crate::error::DdlScribeError::configuration(format!(
                "Failed to initialize logging: {e}"
            ))
        })?;

    Ok(())
}
