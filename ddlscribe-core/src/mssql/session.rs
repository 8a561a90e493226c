//! Extraction session: helper lifecycle plus the five category reads.
//!
//! The session is strictly sequential. Each category opens its own
//! connection, drains the streaming adapter into an ordered list, and
//! releases the connection before the next category begins, so the helper's
//! create/drop can never race a read and no transaction crosses categories.

use tokio_util::sync::CancellationToken;

use crate::config::ConnectionConfig;
use crate::error::{DdlScribeError, Result};
use crate::models::{ObjectKind, SqlObject};
use crate::mssql::connection::SqlServerClient;
use crate::mssql::helper::TableDdlHelper;
use crate::mssql::queries;
use crate::mssql::stream::SqlObjectStream;

/// Run-scoped extraction context.
///
/// Two-phase lifecycle: [`ExtractionSession::begin`] installs the
/// server-side helper, [`ExtractionSession::end`] drops it. Teardown is
/// explicit rather than drop-timed because the drop must be deterministic
/// and logged separately from extraction success or failure.
#[derive(Debug)]
pub struct ExtractionSession {
    config: ConnectionConfig,
    cancel: CancellationToken,
}

impl ExtractionSession {
    /// Validates the configuration and installs the table-DDL helper over
    /// a fresh connection.
    ///
    /// # Errors
    /// Fails when the configuration is invalid, the connection cannot be
    /// opened, or the helper cannot be installed. Install failure is fatal
    /// to the whole extraction.
    pub async fn begin(config: ConnectionConfig, cancel: CancellationToken) -> Result<Self> {
        config.validate()?;

        let mut client = SqlServerClient::connect(&config, &cancel).await?;
        TableDdlHelper::install(&mut client, &cancel).await?;

        Ok(Self { config, cancel })
    }

    /// Reads one category into an ordered list.
    ///
    /// Opens its own connection, runs the category query, drains the
    /// streaming adapter fully, closes the stream (committing the held
    /// transaction), and releases the connection before returning.
    ///
    /// # Errors
    /// Fails on cancellation (checked before the category begins and at
    /// every pull), on connection failure, or on any statement error. On
    /// the error path the open transaction is discarded with the
    /// connection; no explicit rollback is issued.
    pub async fn read_category(&self, kind: ObjectKind) -> Result<Vec<SqlObject>> {
        if self.cancel.is_cancelled() {
            return Err(DdlScribeError::cancelled(format!(
                "before reading {}",
                kind.label().to_lowercase()
            )));
        }

        tracing::debug!(category = kind.label(), "opening connection for category");
        let mut client = SqlServerClient::connect(&self.config, &self.cancel).await?;

        let cursor = client
            .execute_cursor(queries::category_query(kind), &self.cancel)
            .await?;
        let mut stream = SqlObjectStream::new(cursor);

        let mut objects = Vec::new();
        while let Some(object) = stream.next(&self.cancel)? {
            objects.push(object);
        }
        stream.close(&self.cancel).await?;

        tracing::debug!(
            category = kind.label(),
            count = objects.len(),
            "category drained"
        );
        Ok(objects)
    }

    /// Drops the server-side helper over a fresh connection.
    ///
    /// Runs on success, failure, and cancellation alike once the session
    /// reached the helper-installed state; a fresh token is used so a
    /// cancelled run still cleans up. Teardown failure is logged at WARN
    /// and never converts a successful extraction into a failure.
    pub async fn end(self) {
        let cancel = CancellationToken::new();
        let teardown = async {
            let mut client = SqlServerClient::connect(&self.config, &cancel).await?;
            TableDdlHelper::drop(&mut client, &cancel).await
        };
        if let Err(error) = teardown.await {
            tracing::warn!(%error, "failed to drop the table-DDL helper at session end");
        }
    }
}
