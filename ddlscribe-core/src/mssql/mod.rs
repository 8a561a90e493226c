//! SQL Server access layer.
//!
//! Layered bottom-up: [`connection`] opens one client per logical unit of
//! work and exposes the four execute operations; [`execution`] pairs each
//! statement with a transaction and guarantees commit-or-propagate;
//! [`stream`] adapts a forward-only cursor into a lazy sequence of
//! [`crate::SqlObject`]; [`helper`] installs and drops the temporary
//! server-side table-DDL function; [`session`] sequences the five category
//! reads and owns the helper lifecycle.

pub mod connection;
pub mod execution;
pub mod helper;
pub mod queries;
pub mod session;
pub mod stream;

pub use connection::SqlServerClient;
pub use execution::Scalar;
pub use helper::TableDdlHelper;
pub use session::ExtractionSession;
pub use stream::{RowCursor, SqlObjectStream};
