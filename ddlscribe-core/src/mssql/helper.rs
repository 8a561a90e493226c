//! Lifecycle of the server-side table-DDL helper function.
//!
//! Full table DDL (columns, primary keys, foreign keys, indexes) cannot be
//! computed by a single catalog query; the tables category invokes
//! `dbo.FN_EXPORT_TABLE_DDL` per table instead. The function is installed
//! at session start when absent and always dropped at session end, so the
//! server carries no leftover artifacts between runs.

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::mssql::connection::SqlServerClient;
use crate::mssql::execution::Scalar;
use crate::mssql::queries;

/// Install/drop operations for `[dbo].[FN_EXPORT_TABLE_DDL]`.
pub struct TableDdlHelper;

impl TableDdlHelper {
    /// Fully qualified name of the helper function.
    pub const FUNCTION_NAME: &'static str = "[dbo].[FN_EXPORT_TABLE_DDL]";

    /// Installs the helper when absent.
    ///
    /// The existence probe avoids re-sending the large install batch, and
    /// the batch's own server-side `IF NOT EXISTS` guard keeps install
    /// idempotent across concurrent sessions.
    ///
    /// # Errors
    /// Install failure is fatal to the whole extraction; the error is
    /// surfaced, not retried.
    pub async fn install(client: &mut SqlServerClient, cancel: &CancellationToken) -> Result<()> {
        match client
            .execute_scalar::<i32>(queries::HELPER_PROBE, cancel)
            .await?
        {
            Scalar::Value(_) => {
                tracing::debug!(function = Self::FUNCTION_NAME, "helper already present");
            }
            Scalar::Absent => {
                tracing::debug!(function = Self::FUNCTION_NAME, "installing helper");
                client.execute(queries::HELPER_INSTALL, cancel).await?;
            }
        }
        Ok(())
    }

    /// Drops the helper unconditionally.
    ///
    /// # Errors
    /// The caller decides whether a drop failure matters; at session end it
    /// is logged and must not mask an extraction already written to disk.
    pub async fn drop(client: &mut SqlServerClient, cancel: &CancellationToken) -> Result<()> {
        tracing::debug!(function = Self::FUNCTION_NAME, "dropping helper");
        client.execute(queries::HELPER_DROP, cancel).await?;
        Ok(())
    }
}
