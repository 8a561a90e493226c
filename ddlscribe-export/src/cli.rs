//! CLI surface for the ddlscribe binary.
//!
//! Invalid arguments are clap usage errors and exit with code 2, distinct
//! from runtime failures (1); `--help` prints to stdout and exits 0.

use std::path::PathBuf;

use clap::Parser;
use ddlscribe_core::{ConnectionConfig, Result};
use zeroize::Zeroizing;

/// CLI argument structure
#[derive(Parser, Debug)]
#[command(name = "ddlscribe")]
#[command(about = "SQL Server DDL export tool")]
#[command(version)]
#[command(long_about = "
ddlscribe - one-shot SQL Server DDL export

Connects to one database and writes each object's DDL to an individual
.sql file, organized by server, database, and category:

  <output>/<server>/<database>/{schemas,tables,functions,procedures,views}/<name>.sql

A temporary helper function is installed on the server to compute full
table DDL (columns, primary keys, foreign keys, indexes) and is dropped
again when the run ends.

EXAMPLES:
  ddlscribe --user sa --password '...' --database app --server localhost --output ~/ddl
  ddlscribe --user sa --password '...' --database app --server db.example.com,14330 --output '$EXPORTS/ddl' --verbosity 2
")]
pub struct Cli {
    /// User to connect to the database
    #[arg(long, short = 'u')]
    pub user: String,

    /// Password to connect to the database; wiped from memory on drop
    #[arg(long, short = 'p', value_parser = secret_value)]
    pub password: Zeroizing<String>,

    /// Database to connect to
    #[arg(long, short = 'd')]
    pub database: String,

    /// Server to connect to, as `host` or `host,port`
    #[arg(long, short = 's')]
    pub server: String,

    /// Output directory; `~` and environment variables are expanded
    #[arg(long, short = 'o', value_parser = expand_output_path)]
    pub output: PathBuf,

    /// Verbosity: 0 quiet, 1 minimal, 2 normal, 3 detailed
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub verbosity: u8,

    /// Write definitions without the generated header comment block
    #[arg(long)]
    pub no_header: bool,
}

impl Cli {
    /// Builds the connection configuration from the parsed arguments.
    ///
    /// # Errors
    /// Fails when the `host,port` server spec carries an invalid port or
    /// any required value is empty.
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        let config = ConnectionConfig::new(
            &self.server,
            &self.database,
            &self.user,
            self.password.as_str(),
        )?;
        config.validate()?;
        Ok(config)
    }
}

/// Value parser for `--password`: wraps the argument so the buffer is
/// wiped when the CLI struct drops.
fn secret_value(raw: &str) -> std::result::Result<Zeroizing<String>, String> {
    Ok(Zeroizing::new(raw.to_owned()))
}

/// Value parser for `--output`: `~` and environment-variable expansion.
fn expand_output_path(raw: &str) -> std::result::Result<PathBuf, String> {
    Ok(PathBuf::from(expand_path(raw)))
}

/// Expands a leading `~` to `$HOME`, then `$VAR` / `${VAR}` from the
/// environment. Unset variables expand to the empty string.
#[must_use]
pub fn expand_path(raw: &str) -> String {
    let tilde_expanded = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => {
            format!("{}{rest}", std::env::var("HOME").unwrap_or_default())
        }
        _ => raw.to_string(),
    };
    expand_env_vars(&tilde_expanded)
}

fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if closed {
                    out.push_str(&std::env::var(&name).unwrap_or_default());
                } else {
                    // unterminated ${...} is kept verbatim
                    out.push_str("${");
                    out.push_str(&name);
                }
            }
            Some(&next) if next.is_ascii_alphanumeric() || next == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&std::env::var(&name).unwrap_or_default());
            }
            _ => out.push('$'),
        }
    }

    out
}
