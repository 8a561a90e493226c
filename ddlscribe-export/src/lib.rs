//! Library module for ddlscribe-export.
//!
//! Exposes the CLI surface and the export writer for testing; the binary
//! entry point is in main.rs.

pub mod cli;
pub mod writer;
