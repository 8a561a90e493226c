//! ddlscribe binary: one-shot SQL Server DDL export.
//!
//! Drives the extraction session category by category in the fixed order
//! (schemas, tables, functions, procedures, views) and writes each
//! category's objects to disk before reading the next, so a run that fails
//! mid-way leaves the already-written categories behind.

use std::process::ExitCode;

use clap::Parser;
use ddlscribe_core::{init_logging, DdlScribeError, ObjectKind, Result};
use ddlscribe_core::mssql::ExtractionSession;
use ddlscribe_export::cli::Cli;
use ddlscribe_export::writer::DdlWriter;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Invalid arguments exit with 2 via clap before we get here.
    let cli = Cli::parse();

    if let Err(error) = run(&cli).await {
        eprintln!("{}", error.format_detailed());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: &Cli) -> Result<()> {
    init_logging(cli.verbosity)?;

    let config = cli.connection_config()?;
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling extraction");
            signal_cancel.cancel();
        }
    });

    info!("==== Writing DDL to {}", cli.output.display());
    let writer = DdlWriter::new(&cli.output, &config.server, &config.database, !cli.no_header);

    let session = ExtractionSession::begin(config, cancel.clone()).await?;

    let mut total = 0usize;
    let outcome = async {
        for kind in ObjectKind::CATEGORY_ORDER {
            info!("==== Writing {} to {}", kind.label(), cli.output.display());
            let objects = session.read_category(kind).await?;
            let written = writer.write_category(kind, &objects, &cancel).await?;
            total = total.saturating_add(written);
        }
        Ok::<(), DdlScribeError>(())
    }
    .await;

    // Helper teardown runs on success, failure, and cancellation alike.
    session.end().await;
    outcome?;

    println!("Exported {total} objects to {}", writer.root().display());
    Ok(())
}
