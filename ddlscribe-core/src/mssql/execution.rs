//! Scoped execution unit: one statement paired with one transaction.
//!
//! tiberius exposes no native transaction API; `BEGIN TRANSACTION` and
//! `COMMIT TRANSACTION` are issued as raw T-SQL batches, the established
//! technique for this driver. There is no rollback path: a unit dropped
//! without commit leaves its open transaction to be discarded when the
//! connection closes.

use tokio_util::sync::CancellationToken;

use crate::error::{DdlScribeError, Result};
use crate::mssql::connection::SqlServerClient;

/// Typed scalar result: a value, or nothing (no row, or SQL NULL).
///
/// Replaces default-on-mismatch casting; a wrong column type surfaces as an
/// execution error instead of a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar<T> {
    /// The first column of the first row held a non-null value
    Value(T),
    /// The result set was empty or the value was SQL NULL
    Absent,
}

impl<T> Scalar<T> {
    /// Converts into an `Option`, discarding the distinction's name.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent => None,
        }
    }
}

/// A (statement, transaction) pair bound to one client.
///
/// Construction issues `BEGIN TRANSACTION`; every completing path issues
/// `COMMIT TRANSACTION` before the unit is released. The borrow on the
/// client enforces release order: nothing else can run on the connection
/// while the unit (or a cursor holding it) is alive.
pub(crate) struct ScopedExecution<'a> {
    client: &'a mut SqlServerClient,
    statement: String,
    committed: bool,
}

impl<'a> ScopedExecution<'a> {
    /// Rejects empty statement text, then opens a transaction on the client.
    pub(crate) async fn open(
        client: &'a mut SqlServerClient,
        statement: &str,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        if statement.trim().is_empty() {
            return Err(DdlScribeError::configuration(
                "statement text cannot be empty",
            ));
        }

        client.run_execute("BEGIN TRANSACTION", cancel).await?;

        Ok(Self {
            client,
            statement: statement.to_string(),
            committed: false,
        })
    }

    /// Runs the statement and returns the full first result set.
    pub(crate) async fn fetch_rows(&mut self, cancel: &CancellationToken) -> Result<Vec<tiberius::Row>> {
        let statement = self.statement.clone();
        self.client.run_query(&statement, cancel).await
    }

    /// Runs the statement and reads the first column of the first row.
    pub(crate) async fn fetch_scalar<T>(&mut self, cancel: &CancellationToken) -> Result<Scalar<T>>
    where
        T: for<'r> tiberius::FromSql<'r> + 'static,
    {
        let rows = self.fetch_rows(cancel).await?;
        let Some(row) = rows.first() else {
            return Ok(Scalar::Absent);
        };
        let value: Option<T> = row.try_get(0).map_err(|e| {
            DdlScribeError::execution(
                format!("scalar column type mismatch on {}", self.client.context()),
                e,
            )
        })?;
        Ok(value.map_or(Scalar::Absent, Scalar::Value))
    }

    /// Runs the statement as a non-query and returns the affected count.
    pub(crate) async fn run(&mut self, cancel: &CancellationToken) -> Result<u64> {
        let statement = self.statement.clone();
        self.client.run_execute(&statement, cancel).await
    }

    /// Commits the transaction. Idempotent: a second call is a no-op.
    pub(crate) async fn commit(&mut self, cancel: &CancellationToken) -> Result<()> {
        if self.committed {
            return Ok(());
        }
        self.client.run_execute("COMMIT TRANSACTION", cancel).await?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for ScopedExecution<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!(
                "execution unit dropped with an open transaction; uncommitted work is discarded with the connection"
            );
        }
    }
}
