//! Connection parameters for opening a session.
//!
//! Declarative tools deserialize this straight from their configuration
//! source. Credentials are optional as a pair: leaving both out selects the
//! externally pre-authenticated (wallet) path, where the service name alone
//! is handed to the driver as a TNS alias.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    1521
}

/// Target and credential descriptor for one database.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database host/hostname
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Database port (typically 1521)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Oracle service name, or the wallet TNS alias when no credentials are set
    pub service_name: String,

    /// Database username; must be paired with `password`
    #[serde(default)]
    pub username: Option<String>,

    /// Database password; must be paired with `username`
    #[serde(default)]
    pub password: Option<String>,

    /// Connect with SYSDBA privileges
    #[serde(default)]
    pub sysdba: bool,

    /// Oracle client installation root, overriding the ORACLE_HOME environment
    #[serde(default)]
    pub oracle_home: Option<String>,
}

impl ConnectionConfig {
    /// Creates a config with no credentials and default privileges.
    pub fn new(
        hostname: impl Into<String>,
        port: u16,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            service_name: service_name.into(),
            username: None,
            password: None,
            sysdba: false,
            oracle_home: None,
        }
    }

    /// Sets the username/password pair.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Requests SYSDBA privileges for the session.
    pub fn sysdba(mut self, sysdba: bool) -> Self {
        self.sysdba = sysdba;
        self
    }

    /// Points the client bootstrap at a specific installation root.
    pub fn oracle_home(mut self, path: impl Into<String>) -> Self {
        self.oracle_home = Some(path.into());
        self
    }

    /// Validates the connection configuration.
    pub fn validate(&self) -> Result<()> {
        if self.hostname.is_empty() {
            return Err(Error::InvalidConfig("Host cannot be empty".to_string()));
        }
        if self.service_name.is_empty() {
            return Err(Error::InvalidConfig(
                "Service name cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(Error::InvalidConfig(
                "Port must be greater than 0".to_string(),
            ));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(Error::InvalidConfig(
                "Username and password must be provided together".to_string(),
            ));
        }
        Ok(())
    }

    /// True when neither username nor password is set and the wallet
    /// authenticates the connection.
    pub fn uses_wallet(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    /// Builds the driver connect descriptor.
    ///
    /// Format: `host:port/service_name`, or the bare service name on the
    /// wallet path (the alias is resolved by the client configuration).
    pub fn connect_descriptor(&self) -> String {
        if self.uses_wallet() {
            self.service_name.clone()
        } else {
            format!("{}:{}/{}", self.hostname, self.port, self.service_name)
        }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("service_name", &self.service_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "**"))
            .field("sysdba", &self.sysdba)
            .field("oracle_home", &self.oracle_home)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_defaults() {
        let config = ConnectionConfig::new("localhost", 1521, "ORCL");
        assert!(config.validate().is_ok());
        assert!(config.uses_wallet());
    }

    #[test]
    fn test_validate_rejects_lone_username() {
        let mut config = ConnectionConfig::new("localhost", 1521, "ORCL");
        config.username = Some("scott".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("together"));
    }

    #[test]
    fn test_validate_rejects_empty_service() {
        let config = ConnectionConfig::new("localhost", 1521, "");
        assert!(config.validate().is_err());

        let config = ConnectionConfig::new("localhost", 0, "ORCL");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connect_descriptor() {
        let config = ConnectionConfig::new("dbhost", 1521, "ORCL").credentials("scott", "tiger");
        assert_eq!(config.connect_descriptor(), "dbhost:1521/ORCL");
        assert!(!config.uses_wallet());

        let wallet = ConnectionConfig::new("dbhost", 1521, "PRODDB_ALIAS");
        assert_eq!(wallet.connect_descriptor(), "PRODDB_ALIAS");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"service_name": "ORCL"}"#).unwrap();
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.port, 1521);
        assert!(config.uses_wallet());
        assert!(!config.sysdba);
    }

    #[test]
    fn test_debug_masks_password() {
        let config = ConnectionConfig::new("dbhost", 1521, "ORCL").credentials("scott", "tiger");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("tiger"));
        assert!(rendered.contains("scott"));
    }
}
