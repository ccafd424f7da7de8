use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;

use live_stream_service::{handlers, logging, Config, LiveStreamService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting live-stream-service v{}", env!("CARGO_PKG_VERSION"));
    info!(region = %config.aws.region, table = %config.aws.table_name, "AWS configuration loaded");

    let service = web::Data::new(LiveStreamService::from_config(&config.aws).await);

    let bind_addr = config.bind_addr();
    info!(%bind_addr, "HTTP server listening");

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(handlers::cors())
            .wrap(TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind on {bind_addr}"))?
    .run()
    .await
    .context("HTTP server error")?;

    Ok(())
}
