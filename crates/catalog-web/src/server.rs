//! HTTP server implementation using Axum.

use crate::handlers::{api, handle_health, pages};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use catalog_core::{CatalogApi, EntityKind};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across handlers.
pub struct AppState {
    pub api: CatalogApi,
}

/// JSON and page routes of one entity.
///
/// The kind travels to handlers as an `Extension`, so every handler is
/// written once for all three entities.
fn entity_routes(kind: EntityKind) -> Router<Arc<AppState>> {
    let api_base = format!("/api/{}", kind.plural());
    let page_base = format!("/{}", kind.as_str());

    Router::new()
        .route(&api_base, get(api::list).post(api::create))
        .route(
            &format!("{}/:id", api_base),
            get(api::get_one).put(api::update).delete(api::delete),
        )
        .route(&page_base, get(pages::list_page).post(pages::create_form))
        .route(&format!("{}/:id", page_base), post(pages::update_form))
        .route(&format!("{}/:id/edit", page_base), get(pages::edit_page))
        .route(
            &format!("{}/:id/delete", page_base),
            get(pages::confirm_delete_page).post(pages::delete_form),
        )
        .layer(Extension(kind))
}

/// Build the full router around `api`.
pub fn build_router(api: CatalogApi) -> Router {
    let state = Arc::new(AppState { api });

    // Configure CORS for the JSON API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(handle_health))
        .route("/", get(pages::home));
    for kind in EntityKind::all() {
        router = router.merge(entity_routes(kind));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Start the server in the background.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(api: CatalogApi, host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let listener = bind(host, port).await?;
    let actual_addr = listener.local_addr()?;
    let app = build_router(api);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}

/// Serve in the foreground until Ctrl-C or SIGTERM.
pub async fn serve(api: CatalogApi, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = bind(host, port).await?;
    let app = build_router(api);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
