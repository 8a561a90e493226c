//! Connection configuration for the SQL Server gateway.
//!
//! Carries the live credential for the session, so this struct is neither
//! serializable nor `Debug`-printable in a form that could leak it: the
//! password is wiped on drop and omitted from `Display` and `Debug`.

use std::time::Duration;

use zeroize::Zeroizing;

use crate::error::{DdlScribeError, Result};

const DEFAULT_PORT: u16 = 1433;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for one SQL Server connection.
///
/// Encryption is required and the server certificate is trusted by default,
/// matching the exporter's legacy connection-string defaults (no certificate
/// validation).
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Server host name or address
    pub server: String,
    /// TCP port, default 1433
    pub port: u16,
    /// Database to connect to
    pub database: String,
    /// Login user name
    pub username: String,
    /// Login password; wiped from memory on drop
    pub password: Zeroizing<String>,
    /// TCP connect and TDS handshake timeout
    pub connect_timeout: Duration,
    /// Require TLS encryption on the wire
    pub encrypt: bool,
    /// Trust the server certificate without validation
    pub trust_server_certificate: bool,
}

impl ConnectionConfig {
    /// Creates a configuration from discrete CLI values.
    ///
    /// `server` accepts `host` or the SQL Server `host,port` convention.
    ///
    /// # Errors
    /// Returns a configuration error if the port in a `host,port` spec is
    /// not a valid port number.
    pub fn new(
        server: &str,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let (host, port) = match server.split_once(',') {
            Some((host, port)) => {
                let port = port.trim().parse::<u16>().map_err(|_| {
                    DdlScribeError::configuration(format!(
                        "invalid port in server spec '{server}'"
                    ))
                })?;
                (host.trim().to_string(), port)
            }
            None => (server.trim().to_string(), DEFAULT_PORT),
        };

        Ok(Self {
            server: host,
            port,
            database: database.into(),
            username: username.into(),
            password: Zeroizing::new(password.into()),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            encrypt: true,
            trust_server_certificate: true,
        })
    }

    /// Builder method to set the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder method to set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to toggle wire encryption.
    #[must_use]
    pub const fn with_encrypt(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    /// Builder method to toggle server-certificate trust.
    #[must_use]
    pub const fn with_trust_server_certificate(mut self, trust: bool) -> Self {
        self.trust_server_certificate = trust;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns a configuration error for an empty server, database, or
    /// user name, a zero port, or a zero connect timeout.
    pub fn validate(&self) -> Result<()> {
        if self.server.is_empty() {
            return Err(DdlScribeError::configuration("server cannot be empty"));
        }
        if self.database.is_empty() {
            return Err(DdlScribeError::configuration("database cannot be empty"));
        }
        if self.username.is_empty() {
            return Err(DdlScribeError::configuration("user cannot be empty"));
        }
        if self.port == 0 {
            return Err(DdlScribeError::configuration(
                "port must be greater than 0",
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(DdlScribeError::configuration(
                "connect timeout must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never include the password
        write!(
            f,
            "{}@{}:{}/{}",
            self.username, self.server, self.port, self.database
        )
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"****")
            .field("connect_timeout", &self.connect_timeout)
            .field("encrypt", &self.encrypt)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::new("localhost", "app", "sa", "secret").unwrap();
        assert_eq!(config.server, "localhost");
        assert_eq!(config.port, 1433);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert!(config.encrypt);
        assert!(config.trust_server_certificate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_host_comma_port_spec() {
        let config = ConnectionConfig::new("db.example.com,14330", "app", "sa", "x").unwrap();
        assert_eq!(config.server, "db.example.com");
        assert_eq!(config.port, 14330);

        assert!(ConnectionConfig::new("db.example.com,notaport", "app", "sa", "x").is_err());
    }

    #[test]
    fn test_validation_failures() {
        let config = ConnectionConfig::new("", "app", "sa", "x").unwrap();
        assert!(config.validate().is_err());

        let config = ConnectionConfig::new("localhost", "", "sa", "x").unwrap();
        assert!(config.validate().is_err());

        let config = ConnectionConfig::new("localhost", "app", "", "x").unwrap();
        assert!(config.validate().is_err());

        let config = ConnectionConfig::new("localhost", "app", "sa", "x")
            .unwrap()
            .with_connect_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_and_debug_omit_password() {
        let config = ConnectionConfig::new("localhost", "app", "sa", "hunter2").unwrap();

        let display = config.to_string();
        assert_eq!(display, "sa@localhost:1433/app");
        assert!(!display.contains("hunter2"));

        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("****"));
    }

    #[test]
    fn test_builders() {
        let config = ConnectionConfig::new("localhost", "app", "sa", "x")
            .unwrap()
            .with_port(1434)
            .with_encrypt(false)
            .with_trust_server_certificate(false)
            .with_connect_timeout(Duration::from_secs(5));

        assert_eq!(config.port, 1434);
        assert!(!config.encrypt);
        assert!(!config.trust_server_certificate);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }
}
