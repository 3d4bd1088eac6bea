//! Node lifecycle: bootstrap, registration and serving.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::NodeConfig;
use crate::error::{NodeError, NodeResult};
use crate::health::{HealthEvent, HealthState};
use crate::info::InfoStore;
use crate::layers::harden;
use crate::routes::core_routes;
use crate::shutdown::termination_signal;
use crate::state::NodeContext;
use crate::version::MINIMUM_INFO_VERSION;

/// A bootstrapped node that has not started listening yet.
#[derive(Debug)]
pub struct Node {
    config: NodeConfig,
    context: NodeContext,
}

impl Node {
    /// Run the boot sequence.
    ///
    /// Reads the info record, marks the node `Outdated` if the record is older
    /// than [`MINIMUM_INFO_VERSION`], and rewrites it with a fresh `Start`.
    /// A failed rewrite is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the info record
    /// cannot be read or parsed.
    pub async fn bootstrap(config: NodeConfig) -> NodeResult<Self> {
        config.validate()?;

        let store = InfoStore::new(&config.info_path);
        let mut record = store.load().await.inspect_err(|e| {
            error!(error = %e, "failed to load info record");
        })?;

        let context = NodeContext::new(store);

        if record.is_outdated(MINIMUM_INFO_VERSION) {
            context.apply(HealthEvent::InfoOutdated);
            warn!(
                info_version = record.info_version,
                minimum = MINIMUM_INFO_VERSION,
                "Info outdated"
            );
        }

        record.stamp_start(Utc::now());
        if let Err(e) = context.info_store().save(&record).await {
            warn!(error = %e, "failed to write info record");
        }

        info!(
            commit = %record.commit,
            info_version = record.info_version,
            health = %context.health(),
            "node bootstrapped"
        );

        Ok(Self { config, context })
    }

    /// The node configuration.
    #[must_use]
    pub const fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Shared context handed to route handlers.
    #[must_use]
    pub const fn context(&self) -> &NodeContext {
        &self.context
    }

    /// Current health state.
    #[must_use]
    pub fn health(&self) -> HealthState {
        self.context.health()
    }

    /// Build the full router: core routes, `routes`, fallback and layers.
    pub fn router(&self, routes: Router) -> Router {
        harden(core_routes(self.context.clone()).merge(routes))
    }

    /// Bind the listener on `port` and mark the node healthy.
    ///
    /// Consumes the node, so registration happens at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn register(self, port: u16, routes: Router) -> NodeResult<RunningNode> {
        let router = self.router(routes);
        let host = self.config.bind_host.as_str();

        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|source| NodeError::BindFailed {
                addr: format!("{host}:{port}"),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| NodeError::BindFailed {
                addr: format!("{host}:{port}"),
                source,
            })?;

        let health = self.context.apply(HealthEvent::Listening);
        info!(
            port = local_addr.port(),
            %health,
            "Server now running on port {}",
            local_addr.port()
        );

        Ok(RunningNode {
            listener,
            router,
            context: self.context,
            local_addr,
        })
    }
}

/// A node whose listener is bound and ready to serve.
#[derive(Debug)]
pub struct RunningNode {
    listener: TcpListener,
    router: Router,
    context: NodeContext,
    local_addr: SocketAddr,
}

impl RunningNode {
    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Current health state.
    #[must_use]
    pub fn health(&self) -> HealthState {
        self.context.health()
    }

    /// Serve requests until `shutdown` resolves, then drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> NodeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(NodeError::Serve)?;

        info!("HTTP server closed");
        Ok(())
    }

    /// Serve requests until the process receives a termination signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails.
    pub async fn serve(self) -> NodeResult<()> {
        self.serve_with_shutdown(termination_signal()).await
    }
}
