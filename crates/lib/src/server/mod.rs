//! HTTP request layer: routes for registration, login and item CRUD.
//!
//! [`router`] builds the axum application over a [`SessionManager`];
//! [`TodoServer`] owns a running instance of it and can be started and stopped
//! repeatedly. Every start reinitialises the user and session stores.

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_cookies::CookieManagerLayer;
use tracing::{info, warn};

use crate::{Result, constants::ITEM_PATH, session::SessionManager};

pub mod errors;
mod handlers;
pub mod protocol;

pub use errors::ServerError;
pub use protocol::{HealthResponse, STATUS_FAILURE, STATUS_SUCCESS, StatusResponse};

/// Build the application router over `manager`.
pub fn router(manager: SessionManager) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route(
            ITEM_PATH,
            get(handlers::list_items)
                .post(handlers::add_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/health", get(handlers::health))
        .layer(CookieManagerLayer::new())
        .with_state(manager)
}

/// Bookkeeping for a running server task.
#[derive(Debug, Default)]
struct ServerState {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    address: Option<SocketAddr>,
}

impl ServerState {
    fn is_running(&self) -> bool {
        self.address.is_some()
    }

    fn server_started(
        &mut self,
        address: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<()>,
    ) {
        self.address = Some(address);
        self.shutdown = Some(shutdown);
        self.task = Some(task);
    }

    /// Signal shutdown and hand back the task to wait on.
    fn stop_server(&mut self) -> Option<JoinHandle<()>> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.address = None;
        self.task.take()
    }
}

/// Start/stop handle around the HTTP server.
#[derive(Debug)]
pub struct TodoServer {
    manager: SessionManager,
    state: ServerState,
}

impl TodoServer {
    pub fn new(manager: SessionManager) -> Self {
        Self {
            manager,
            state: ServerState::default(),
        }
    }

    /// The session manager shared with the request handlers.
    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Address the server is bound to, if running.
    pub fn address(&self) -> Option<SocketAddr> {
        self.state.address
    }

    /// Reset all users and sessions, bind `addr` and start serving.
    ///
    /// Returns the bound address, which differs from `addr` when port 0 is
    /// requested.
    pub async fn start(&mut self, addr: &str) -> Result<SocketAddr> {
        if let Some(address) = self.state.address {
            return Err(ServerError::AlreadyRunning {
                address: address.to_string(),
            }
            .into());
        }

        self.manager.reset().await;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                address: addr.to_string(),
                reason: e.to_string(),
            })?;
        let local_addr = listener.local_addr()?;

        let app = router(self.manager.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                warn!("server terminated with error: {e}");
            }
        });

        self.state.server_started(local_addr, shutdown_tx, task);
        info!(address = %local_addr, "todo server listening");
        Ok(local_addr)
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn stop(&mut self) -> Result<()> {
        if !self.state.is_running() {
            return Err(ServerError::NotRunning.into());
        }
        if let Some(task) = self.state.stop_server()
            && let Err(e) = task.await
        {
            warn!("server task did not shut down cleanly: {e}");
        }
        info!("todo server stopped");
        Ok(())
    }
}
