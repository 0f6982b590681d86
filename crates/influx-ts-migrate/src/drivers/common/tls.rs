//! TLS configuration for PostgreSQL connections.

use std::sync::Arc;

use rustls::ClientConfig;
use tokio_postgres::config::SslMode as PgSslMode;
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::{info, warn};

use crate::error::{MigrateError, Result};

/// SSL modes understood by the target connection.
///
/// Mirrors the `sslmode` parameter of the connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    /// Plain TCP connection.
    #[default]
    Disable,
    /// Try TLS, fall back to plain TCP if the server refuses.
    Prefer,
    /// TLS is mandatory.
    Require,
}

impl SslMode {
    /// Take the mode from a parsed connection string.
    pub fn from_pg_config(config: &tokio_postgres::Config) -> Self {
        match config.get_ssl_mode() {
            PgSslMode::Disable => SslMode::Disable,
            PgSslMode::Require => SslMode::Require,
            _ => SslMode::Prefer,
        }
    }

    /// Check if this mode may negotiate TLS.
    pub fn uses_tls(&self) -> bool {
        !matches!(self, SslMode::Disable)
    }
}

/// Builder for PostgreSQL TLS connectors.
pub struct TlsBuilder {
    ssl_mode: SslMode,
}

impl TlsBuilder {
    pub fn new(ssl_mode: SslMode) -> Self {
        Self { ssl_mode }
    }

    pub fn ssl_mode(&self) -> SslMode {
        self.ssl_mode
    }

    /// Build a connector for deadpool-postgres.
    ///
    /// Returns None if TLS is disabled.
    pub fn build(&self) -> Result<Option<MakeRustlsConnect>> {
        if !self.ssl_mode.uses_tls() {
            warn!("PostgreSQL TLS is disabled. Credentials will be transmitted in plaintext.");
            return Ok(None);
        }

        let config = self.build_client_config()?;
        Ok(Some(MakeRustlsConnect::new(config)))
    }

    /// Build the rustls ClientConfig. Certificates are verified against the
    /// webpki root store in every TLS mode.
    pub fn build_client_config(&self) -> Result<ClientConfig> {
        if !self.ssl_mode.uses_tls() {
            return Err(MigrateError::Config(
                "Cannot build TLS config for sslmode=disable".into(),
            ));
        }

        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        info!(
            "sslmode={:?}: certificate and hostname verification enabled",
            self.ssl_mode
        );
        // ring and aws-lc-rs are both linked, so no process default exists
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| MigrateError::Config(format!("TLS setup failed: {}", e)))?
            .with_root_certificates(root_store)
            .with_no_client_auth();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn mode(conn: &str) -> SslMode {
        SslMode::from_pg_config(&tokio_postgres::Config::from_str(conn).unwrap())
    }

    #[test]
    fn test_ssl_mode_from_conn_string() {
        assert_eq!(mode("host=db sslmode=disable"), SslMode::Disable);
        assert_eq!(mode("host=db sslmode=require"), SslMode::Require);
        assert_eq!(mode("host=db sslmode=prefer"), SslMode::Prefer);
        // libpq default
        assert_eq!(mode("host=db"), SslMode::Prefer);
    }

    #[test]
    fn test_disable_builds_no_connector() {
        let builder = TlsBuilder::new(SslMode::Disable);
        assert!(builder.build().unwrap().is_none());
        assert!(builder.build_client_config().is_err());
    }

    #[test]
    fn test_require_builds_connector() {
        let builder = TlsBuilder::new(SslMode::Require);
        assert!(builder.build().unwrap().is_some());
    }
}
