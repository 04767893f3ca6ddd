//! HTTP front controller: sign-in, token persistence and event creation.

pub mod error;
pub mod routes;
pub mod state;
pub mod views;

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub use error::AppError;
pub use routes::routes;
pub use state::AppState;

/// Serve until Ctrl-C.
///
/// Binds to the loopback interface only. When no token is stored yet and
/// `open_browser` is set, the local URL is opened in the default browser.
pub async fn run(state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let url = state.config.local_url();
    let signed_in = state.tokens.has_token();
    let open_browser = state.config.open_browser;

    let (bound, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {} ({})", url, bound);

    if !signed_in && open_browser {
        if let Err(e) = webbrowser::open(&url) {
            tracing::warn!("Could not open browser, visit {} manually: {}", url, e);
        }
    }

    server.await;
    tracing::info!("Server stopped");
    Ok(())
}
