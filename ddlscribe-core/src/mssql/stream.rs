//! Row cursor and the lazy streaming adapter over it.
//!
//! tiberius delivers rows at result-set granularity, so the cursor drains
//! the result set up front while the transaction stays open, then yields
//! rows one by one. The observable contract is unchanged: single-pass,
//! per-pull cancellation, commit at close, innermost-first release.

use tokio_util::sync::CancellationToken;

use crate::error::{DdlScribeError, Result};
use crate::models::{ObjectKind, SqlObject};
use crate::mssql::execution::ScopedExecution;

/// Forward-only, single-pass view over one statement's result set.
///
/// Holds its execution unit, and therefore the open transaction, until
/// [`RowCursor::close`] commits, or until the cursor is dropped and the
/// uncommitted transaction is discarded with the connection. The borrow
/// chain keeps the cursor from outliving its unit or its connection.
pub struct RowCursor<'a> {
    unit: ScopedExecution<'a>,
    rows: std::vec::IntoIter<tiberius::Row>,
    current: Option<tiberius::Row>,
    done: bool,
}

impl<'a> RowCursor<'a> {
    pub(crate) async fn open(
        mut unit: ScopedExecution<'a>,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let rows = unit.fetch_rows(cancel).await?;
        Ok(Self {
            unit,
            rows: rows.into_iter(),
            current: None,
            done: false,
        })
    }

    /// Advances to the next row. Returns `false` at end of the result set;
    /// an exhausted or cancelled cursor never restarts.
    ///
    /// # Errors
    /// Fails with a cancellation error when the token has fired.
    pub fn advance(&mut self, cancel: &CancellationToken) -> Result<bool> {
        if cancel.is_cancelled() {
            self.done = true;
            self.current = None;
            return Err(DdlScribeError::cancelled("while reading result rows"));
        }
        if self.done {
            return Ok(false);
        }
        self.current = self.rows.next();
        if self.current.is_none() {
            self.done = true;
        }
        Ok(self.current.is_some())
    }

    /// The row the cursor is positioned on.
    ///
    /// # Errors
    /// Fails when called before the first `advance` or after the end.
    pub fn current(&self) -> Result<&tiberius::Row> {
        self.current
            .as_ref()
            .ok_or_else(|| DdlScribeError::execution_message("cursor is not positioned on a row"))
    }

    /// Commits the held transaction and releases the cursor.
    ///
    /// # Errors
    /// Fails when the commit itself fails or is cancelled.
    pub async fn close(mut self, cancel: &CancellationToken) -> Result<()> {
        self.unit.commit(cancel).await
    }
}

/// Lazy, finite, non-restartable sequence of [`SqlObject`] over a cursor.
///
/// Reads the four fixed string columns (schema, object name, type,
/// definition) in order. Closing the stream closes the underlying cursor,
/// which commits the transaction and releases the statement.
pub struct SqlObjectStream<'a> {
    cursor: RowCursor<'a>,
}

impl<'a> SqlObjectStream<'a> {
    /// Wraps a cursor whose result set follows the four-column contract.
    #[must_use]
    pub const fn new(cursor: RowCursor<'a>) -> Self {
        Self { cursor }
    }

    /// Advances one row; `false` at end.
    ///
    /// # Errors
    /// Fails on cancellation.
    pub fn advance(&mut self, cancel: &CancellationToken) -> Result<bool> {
        self.cursor.advance(cancel)
    }

    /// Builds the object for the current row.
    ///
    /// # Errors
    /// Fails when a required column is NULL, of the wrong type, or when the
    /// type literal is not one of the five categories.
    pub fn current(&self) -> Result<SqlObject> {
        let row = self.cursor.current()?;
        let schema = read_string_column(row, 0, "schema")?;
        let name = read_string_column(row, 1, "object name")?;
        let type_literal = read_string_column(row, 2, "type")?;
        let definition = read_string_column(row, 3, "definition")?;

        let kind = ObjectKind::from_wire(&type_literal).ok_or_else(|| {
            DdlScribeError::execution_message(format!(
                "unknown object type literal '{type_literal}' for {schema}.{name}"
            ))
        })?;

        Ok(SqlObject::new(schema, name, kind, definition))
    }

    /// Advances and reads in one pull; `None` at end.
    ///
    /// # Errors
    /// Fails on cancellation or on a malformed row.
    pub fn next(&mut self, cancel: &CancellationToken) -> Result<Option<SqlObject>> {
        if self.advance(cancel)? {
            self.current().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Closes the underlying cursor, committing the held transaction.
    ///
    /// # Errors
    /// Fails when the commit itself fails or is cancelled.
    pub async fn close(self, cancel: &CancellationToken) -> Result<()> {
        self.cursor.close(cancel).await
    }
}

fn read_string_column(row: &tiberius::Row, index: usize, name: &str) -> Result<String> {
    let value: Option<&str> = row.try_get(index).map_err(|e| {
        DdlScribeError::execution(format!("failed to read the {name} column"), e)
    })?;
    value
        .map(str::to_owned)
        .ok_or_else(|| DdlScribeError::execution_message(format!("the {name} column was NULL")))
}
