use product_api::app::product::handler::AppState;
use product_api::config::load_config;
use product_api::infrastructure::logger::Logger;
use product_api::{build_router, serve, shutdown_signal, Backend};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = load_config()?;
    let _log_guard = Logger::init(&config.logging)?;

    match &source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    info!("Starting product API...");

    // 后端不可达时直接退出，不做部分启动
    let backend = Backend::connect(&config).await.map_err(|e| {
        error!("{:#}", e);
        e
    })?;

    let app = build_router(AppState::new(backend.store.clone()), &config.http);

    let listener = TcpListener::bind(config.http.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("Product API running on http://{}", addr);
    info!("   GET    /products/      - List products");
    info!("   GET    /products/:id   - Show product");
    info!("   POST   /products/      - Create product");
    info!("   PATCH  /products/:id   - Update product");
    info!("   DELETE /products/:id   - Delete product");

    serve(listener, app, shutdown_signal()).await?;

    backend.close().await;
    info!("Server stopped");

    Ok(())
}
