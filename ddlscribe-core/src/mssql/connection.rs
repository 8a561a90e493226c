//! Connection gateway: one client per logical unit of work, no pooling.

use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tokio_util::sync::CancellationToken;

use crate::config::ConnectionConfig;
use crate::error::{DdlScribeError, Result};
use crate::mssql::execution::{Scalar, ScopedExecution};
use crate::mssql::stream::RowCursor;

/// One open connection to a SQL Server instance.
///
/// Each execute operation allocates a fresh [`ScopedExecution`] around the
/// statement; the client itself holds no per-call state. Sequential calls on
/// one client are safe; concurrent calls are ruled out by `&mut self`.
/// The connection is released exactly once, when the client drops.
pub struct SqlServerClient {
    client: Client<Compat<TcpStream>>,
    // user@host:port/database, used for error contexts; never the password
    context: String,
}

impl SqlServerClient {
    /// Opens a connection honoring the cancellation token and the
    /// configured connect timeout.
    ///
    /// # Errors
    /// Fails with a configuration error when the configuration is invalid,
    /// a connection error when TCP connect, handshake, or authentication
    /// fails or times out, and a cancellation error when the token fires
    /// first.
    pub async fn connect(config: &ConnectionConfig, cancel: &CancellationToken) -> Result<Self> {
        config.validate()?;

        let mut tiberius_config = Config::new();
        tiberius_config.host(&config.server);
        tiberius_config.port(config.port);
        tiberius_config.database(&config.database);
        tiberius_config
            .authentication(AuthMethod::sql_server(&config.username, config.password.as_str()));
        if config.encrypt {
            tiberius_config.encryption(EncryptionLevel::Required);
        } else {
            tiberius_config.encryption(EncryptionLevel::NotSupported);
        }
        if config.trust_server_certificate {
            tiberius_config.trust_cert();
        }

        let context = config.to_string();
        tracing::debug!(target = %context, "opening connection");

        let handshake = async {
            let tcp = TcpStream::connect(tiberius_config.get_addr())
                .await
                .map_err(|e| DdlScribeError::connection(format!("failed to reach {context}"), e))?;
            tcp.set_nodelay(true)
                .map_err(|e| DdlScribeError::connection(format!("failed to reach {context}"), e))?;
            Client::connect(tiberius_config, tcp.compat_write())
                .await
                .map_err(|e| {
                    DdlScribeError::connection(format!("failed to authenticate as {context}"), e)
                })
        };

        let client = tokio::select! {
            result = tokio::time::timeout(config.connect_timeout, handshake) => match result {
                Ok(client) => client?,
                Err(_) => {
                    return Err(DdlScribeError::connection(
                        format!("timed out connecting to {context}"),
                        std::io::Error::new(
                            std::io::ErrorKind::TimedOut,
                            format!("no response within {:?}", config.connect_timeout),
                        ),
                    ));
                }
            },
            () = cancel.cancelled() => {
                return Err(DdlScribeError::cancelled(format!("while connecting to {context}")));
            }
        };

        tracing::debug!(target = %context, "connection established");
        Ok(Self { client, context })
    }

    /// Executes a statement and returns its single scalar value as a typed
    /// result: `Value` when the first column of the first row is non-null,
    /// `Absent` when there is no row or the value is SQL NULL. A column of
    /// the wrong type is an execution error, never a silent default.
    ///
    /// The transaction commits even when execution fails, so no work is
    /// left pending server-side; the first error wins.
    ///
    /// # Errors
    /// Fails on empty statement text, driver errors, or cancellation.
    pub async fn execute_scalar<T>(
        &mut self,
        statement: &str,
        cancel: &CancellationToken,
    ) -> Result<Scalar<T>>
    where
        T: for<'r> tiberius::FromSql<'r> + 'static,
    {
        let mut unit = ScopedExecution::open(self, statement, cancel).await?;
        let value = unit.fetch_scalar::<T>(cancel).await;
        let committed = unit.commit(cancel).await;
        let value = value?;
        committed?;
        Ok(value)
    }

    /// Executes a statement and returns the full first result set.
    ///
    /// The transaction commits even when execution fails, so no work is
    /// left pending server-side; the first error wins.
    ///
    /// # Errors
    /// Fails on empty statement text, driver errors, or cancellation.
    pub async fn execute_rows(
        &mut self,
        statement: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<tiberius::Row>> {
        let mut unit = ScopedExecution::open(self, statement, cancel).await?;
        let rows = unit.fetch_rows(cancel).await;
        let committed = unit.commit(cancel).await;
        let rows = rows?;
        committed?;
        Ok(rows)
    }

    /// Executes a non-query statement and returns the affected row count.
    ///
    /// The transaction commits even when execution fails, so no work is
    /// left pending server-side; the first error wins.
    ///
    /// # Errors
    /// Fails on empty statement text, driver errors, or cancellation.
    pub async fn execute(&mut self, statement: &str, cancel: &CancellationToken) -> Result<u64> {
        let mut unit = ScopedExecution::open(self, statement, cancel).await?;
        let affected = unit.run(cancel).await;
        let committed = unit.commit(cancel).await;
        let affected = affected?;
        committed?;
        Ok(affected)
    }

    /// Executes a statement and returns a forward-only cursor over its
    /// rows. The transaction stays open until the cursor is closed, because
    /// rows must be read before the transaction commits.
    ///
    /// # Errors
    /// Fails on empty statement text, driver errors, or cancellation.
    pub async fn execute_cursor(
        &mut self,
        statement: &str,
        cancel: &CancellationToken,
    ) -> Result<RowCursor<'_>> {
        let unit = ScopedExecution::open(self, statement, cancel).await?;
        RowCursor::open(unit, cancel).await
    }

    /// Error context for this connection (`user@host:port/database`).
    pub(crate) fn context(&self) -> &str {
        &self.context
    }

    pub(crate) async fn run_query(
        &mut self,
        statement: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<tiberius::Row>> {
        tracing::trace!(statement, "executing query");
        let context = self.context.clone();
        let query = async {
            let stream = self.client.query(statement, &[]).await?;
            stream.into_first_result().await
        };
        tokio::select! {
            result = query => result
                .map_err(|e| DdlScribeError::execution(format!("query failed on {context}"), e)),
            () = cancel.cancelled() => {
                Err(DdlScribeError::cancelled(format!("mid-query on {context}")))
            }
        }
    }

    pub(crate) async fn run_execute(
        &mut self,
        statement: &str,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        tracing::trace!(statement, "executing non-query");
        let context = self.context.clone();
        let execute = self.client.execute(statement, &[]);
        tokio::select! {
            result = execute => result
                .map(|outcome| outcome.total())
                .map_err(|e| DdlScribeError::execution(format!("statement failed on {context}"), e)),
            () = cancel.cancelled() => {
                Err(DdlScribeError::cancelled(format!("mid-statement on {context}")))
            }
        }
    }
}

impl std::fmt::Debug for SqlServerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlServerClient")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
