mod cors;
mod health;

use std::net::SocketAddr;

use axum::{Router, extract::Request, routing::get};
use encore_config::Config;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use health::LIVENESS_MESSAGE;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails `Config::validate`, or the
    /// provider client or staging directory cannot be initialized
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let listen_address = config.server.listen_address();
        let relay_state = encore_relay::build_state(config)?;

        let mut app = Router::new().route("/", get(health::liveness_handler));

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        app = app.merge(encore_relay::endpoint_router().with_state(relay_state));

        // Apply middleware layers (innermost first)
        app = app.layer(PropagateRequestIdLayer::x_request_id());
        app = app.layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }));
        app = app.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        app = app.layer(cors::cors_layer(config.server.cors.as_ref()));

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
