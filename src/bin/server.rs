use grubdash::app::App;
use grubdash::cli::ServerConfig;
use grubdash::database::Database;
use grubdash::errors::Result;
use grubdash::http::HttpServer;
use grubdash::logging::setup_tracing;
use std::sync::Arc;

fn run() -> Result<()> {
    let config = ServerConfig::load(|key| std::env::var(key).ok(), std::env::args())?;

    let db = if config.seed {
        Database::seeded()?
    } else {
        Database::new()
    };
    tracing::info!(
        dishes = db.dishes.len(),
        orders = db.orders.len(),
        "database ready"
    );

    let app = Arc::new(App::new(db)?);
    let server = HttpServer::new(&config.address)?;
    tracing::info!(address = %config.address, workers = config.workers, "listening");

    server.serve(config.workers, move |request| app.handle(request));
    Ok(())
}

fn main() {
    setup_tracing();
    if let Err(err) = run() {
        tracing::error!(%err, "server stopped");
        std::process::exit(1);
    }
}
