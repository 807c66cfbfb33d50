//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, sessions, login check)
//! - Serve static resources for paths no handler claims
//! - Apply exemption list reloads
//! - Serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_sessions::MemoryStore;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::accounts::{EmployeeDirectory, UserDirectory};
use crate::config::schema::SmsConfig;
use crate::config::GateConfig;
use crate::error::ServerError;
use crate::http::handlers;
use crate::routing::ExemptPaths;
use crate::security::login_check::{login_check_middleware, LoginCheck};
use crate::session::session_layer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub login_check: LoginCheck,
    pub employees: Arc<EmployeeDirectory>,
    pub users: UserDirectory,
    pub sms: SmsConfig,
}

impl AppState {
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            login_check: LoginCheck::new(&config.login_check),
            employees: Arc::new(EmployeeDirectory::from_config(&config.accounts.employees)),
            users: UserDirectory::new(),
            sms: config.sms.clone(),
        }
    }
}

/// HTTP server for the login gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        Self::with_routes(config, Router::new())
    }

    /// Create a server that also serves `extra` behind the login check.
    ///
    /// Routes in `extra` take precedence over files under the static root.
    pub fn with_routes(config: GateConfig, extra: Router<AppState>) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(&config, state.clone(), extra);
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, state: AppState, extra: Router<AppState>) -> Router {
        let login_check = state.login_check.clone();

        let static_root = &config.static_files.root;
        if !static_root.is_dir() {
            tracing::warn!(root = %static_root.display(), "Static root is not a directory");
        }

        handlers::routes()
            .merge(extra)
            .fallback_service(ServeDir::new(static_root))
            .with_state(state)
            .layer(middleware::from_fn_with_state(login_check, login_check_middleware))
            .layer(session_layer(&config.session, MemoryStore::default()))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs received on `config_updates` replace the exemption list.
    /// Returns once `shutdown` fires and in-flight requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            exempt_patterns = self.state.login_check.exempt_paths().len(),
            static_root = %self.config.static_files.root.display(),
            employees = self.state.employees.len(),
            "HTTP server starting"
        );

        let login_check = self.state.login_check.clone();
        let mut current = self.config.clone();
        let reload = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                apply_reload(&login_check, &current, &new_config);
                current = new_config;
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reload.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn apply_reload(login_check: &LoginCheck, current: &GateConfig, new_config: &GateConfig) {
    if current.login_check.exempt_paths != new_config.login_check.exempt_paths {
        login_check.replace_exempt_paths(ExemptPaths::from_patterns(
            new_config.login_check.exempt_paths.iter().cloned(),
        ));
    } else {
        tracing::debug!("Exemption list unchanged");
    }
    tracing::info!("Other configuration changes take effect after restart");
}
