//! Core library for ddlscribe, a one-shot SQL Server DDL export tool.
//!
//! This crate contains everything below the CLI surface: the connection
//! configuration, the SQL Server gateway with its transaction-scoped
//! execution units, the row streaming adapter, the temporary server-side
//! helper function used to compute table DDL, and the extraction session
//! that sequences the five object categories (schemas, tables, functions,
//! procedures, views).
//!
//! # Security
//! Passwords never appear in error messages, log output, or `Display`
//! renderings of the connection configuration.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod mssql;

pub use config::ConnectionConfig;
pub use error::{DdlScribeError, Result};
pub use logging::init_logging;
pub use models::{ObjectKind, SqlObject};
