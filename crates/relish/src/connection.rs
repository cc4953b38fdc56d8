use relish_core::{Error, Result};

use std::any::Any;
use std::sync::Arc;

use tokio_postgres::{tls::MakeTlsConnect, Client, Config, NoTls, Socket};
use url::Url;

/// The connection collaborator, seen from the repository side.
///
/// A registry elsewhere owns pooling, DSN assembly, and lifecycle; all the
/// repository needs is the live handle. For PostgreSQL repositories the
/// handle must hold a [`tokio_postgres::Client`].
pub trait Adapter: Send + Sync {
    fn handle(&self) -> Arc<dyn Any + Send + Sync>;
}

pub(crate) fn client_from(adapter: &dyn Adapter) -> Result<Arc<Client>> {
    adapter
        .handle()
        .downcast::<Client>()
        .map_err(|_| Error::connection_handle())
}

/// Connects to a PostgreSQL database using a `postgresql://` connection
/// string and returns a shareable client handle.
pub async fn connect(url: &str) -> Result<Arc<Client>> {
    let url = Url::parse(url).map_err(|e| Error::invalid_connection_url(e.to_string()))?;

    if url.scheme() != "postgresql" {
        return Err(Error::invalid_connection_url(format!(
            "expected a `postgresql` scheme; url={url}"
        )));
    }

    let host = url.host_str().ok_or_else(|| {
        Error::invalid_connection_url(format!("missing host in connection URL; url={url}"))
    })?;

    if url.path().trim_start_matches('/').is_empty() {
        return Err(Error::invalid_connection_url(format!(
            "no database specified - missing path in connection URL; url={url}"
        )));
    }

    let mut config = Config::new();
    config.host(host);
    config.dbname(url.path().trim_start_matches('/'));

    if let Some(port) = url.port() {
        config.port(port);
    }

    if !url.username().is_empty() {
        config.user(url.username());
    }

    if let Some(password) = url.password() {
        config.password(password);
    }

    connect_with_config(config, NoTls).await
}

/// Connects using a prepared [`tokio_postgres::Config`] and TLS connector.
///
/// The connection task is spawned onto the current tokio runtime; dropping
/// every clone of the returned client shuts it down.
pub async fn connect_with_config<T>(config: Config, tls: T) -> Result<Arc<Client>>
where
    T: MakeTlsConnect<Socket> + 'static,
    T::Stream: Send,
{
    let (client, connection) = config.connect(tls).await.map_err(Error::driver)?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!(error = %e, "postgres connection task ended with error");
        }
    });

    Ok(Arc::new(client))
}
