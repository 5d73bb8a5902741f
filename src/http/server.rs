//! HTTP server: binds the selected transport and serves the router.
//!
//! # Responsibilities
//! - Bind the listen address in the selected transport mode
//! - Load manual certificates before binding
//! - Start the ACME acceptor for automatic certificates
//! - Serve until the listener stops or a shutdown signal arrives

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use tokio::net::TcpListener;

use crate::lifecycle::signals::shutdown_signal;
use crate::net::{self, acme, tls, TlsMode, TransportError};

/// How long in-flight TLS connections may drain after a shutdown signal.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully wired router waiting to be bound.
pub struct HttpServer {
    router: Router,
    listen: String,
    mode: TlsMode,
}

impl HttpServer {
    pub fn new(router: Router, listen: impl Into<String>, mode: TlsMode) -> Self {
        Self {
            router,
            listen: listen.into(),
            mode,
        }
    }

    pub fn mode(&self) -> &TlsMode {
        &self.mode
    }

    pub fn listen(&self) -> &str {
        &self.listen
    }

    /// Bind and serve. Blocks until the server stops.
    ///
    /// Manual certificates are loaded before the port is bound; in every mode
    /// a bind failure is reported as [`TransportError::Bind`].
    pub async fn run(self) -> Result<(), TransportError> {
        tracing::info!(
            listen = %self.listen,
            mode = self.mode.name(),
            tls = self.mode.is_tls(),
            "HTTP server starting"
        );

        match self.mode {
            TlsMode::Plain => {
                let listener = net::bind(&self.listen).await?;
                serve_plain(self.router, listener).await
            }
            TlsMode::Manual { cert_path, key_path } => {
                let config = tls::load_tls_config(&cert_path, &key_path).await?;
                tracing::info!(cert = %cert_path.display(), key = %key_path.display(), "Certificate loaded");

                let listener = bind_std(&self.listen).await?;
                axum_server::tls_rustls::from_tcp_rustls(listener, config)
                    .handle(graceful_handle())
                    .serve(self.router.into_make_service_with_connect_info::<SocketAddr>())
                    .await
                    .map_err(TransportError::Serve)?;
                tracing::info!("HTTP server stopped");
                Ok(())
            }
            TlsMode::Auto(auto) => {
                let listener = bind_std(&self.listen).await?;
                let acceptor = acme::acceptor(&auto);
                axum_server::from_tcp(listener)
                    .acceptor(acceptor)
                    .handle(graceful_handle())
                    .serve(self.router.into_make_service_with_connect_info::<SocketAddr>())
                    .await
                    .map_err(TransportError::Serve)?;
                tracing::info!("HTTP server stopped");
                Ok(())
            }
        }
    }
}

/// Bind with Tokio and hand the (non-blocking) std listener to axum-server.
async fn bind_std(listen: &str) -> Result<std::net::TcpListener, TransportError> {
    let listener = net::bind(listen).await?;
    let addr = listener.local_addr().map_err(TransportError::Serve)?;
    tracing::info!(address = %addr, "Listening for connections");
    listener.into_std().map_err(TransportError::Serve)
}

/// Serve plaintext HTTP on an already bound listener.
pub async fn serve_plain(router: Router, listener: TcpListener) -> Result<(), TransportError> {
    let addr = listener.local_addr().map_err(TransportError::Serve)?;
    tracing::info!(address = %addr, "Listening for connections");

    let app = router.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(TransportError::Serve)?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// A server handle that starts draining when a shutdown signal arrives.
fn graceful_handle() -> Handle {
    let handle = Handle::new();
    let trigger = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
    });
    handle
}
