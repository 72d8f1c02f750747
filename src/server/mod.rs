//! Web server exposing the crawl job API.
//!
//! Lets a caller start a crawl without blocking, poll its status and
//! read the accumulated tender table.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::jobs::JobController;
use crate::services::CrawlService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<JobController>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let runner = Arc::new(CrawlService::new(settings.clone()));
        Self {
            controller: Arc::new(JobController::new(runner)),
            settings,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
