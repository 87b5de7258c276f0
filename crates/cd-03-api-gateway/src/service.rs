//! API Gateway service: binds the listener and serves the application
//! until the shutdown signal fires.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::router::{build_router, AppState, GatewayApp};
use axum::extract::Request;
use axum::{Router, ServiceExt};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::info;

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    app: GatewayApp,
}

impl ApiGatewayService {
    /// Validate the configuration and assemble the application.
    pub fn new(config: GatewayConfig, state: AppState, extra_routes: Router) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        let app = build_router(&config, state, extra_routes);
        Ok(Self { config, app })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The application, for driving in-process (tests, embedding).
    pub fn app(&self) -> GatewayApp {
        self.app.clone()
    }

    /// Bind the configured HTTP address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })
    }

    /// Serve on `listener` until `shutdown` completes, then drain in-flight
    /// requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr: Option<SocketAddr> = listener.local_addr().ok();
        info!(addr = ?local_addr, "Starting HTTP server");

        axum::serve(listener, ServiceExt::<Request>::into_make_service(self.app))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Bind and serve in a background task.
    ///
    /// Returns the bound address and a handle whose `shutdown` stops the
    /// server gracefully.
    pub async fn start(self) -> Result<RunningGateway, GatewayError> {
        let listener = self.bind().await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(self.serve(listener, async {
            let _ = shutdown_rx.await;
        }));
        Ok(RunningGateway {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }
}

/// Handle to a gateway started with [`ApiGatewayService::start`].
pub struct RunningGateway {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<Result<(), GatewayError>>,
}

impl RunningGateway {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Trigger graceful shutdown and wait for the server to finish.
    pub async fn shutdown(mut self) -> Result<(), GatewayError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.task.await {
            Ok(result) => result,
            Err(join) => Err(GatewayError::Serve(std::io::Error::other(join.to_string()))),
        }
    }
}
