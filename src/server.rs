//! 路由装配、存储后端生命周期与优雅停机

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::app::product::{self, handler::AppState, memory_store::MemoryStore, store::DataStore};
use crate::config::{Config, HttpConfig, StoreBackend};
use crate::core::middleware::request_logging_middleware;

#[cfg(feature = "database")]
use crate::{app::product::pg_store::PgStore, infrastructure::database::DatabaseManager};
#[cfg(feature = "database")]
use anyhow::Context;

/// 创建路由并挂载中间件
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    product::routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(Duration::from_secs(http.timeout_seconds)))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// 运行服务直到 `shutdown` 完成，之后等待进行中的请求结束
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// 进程级的存储资源，启动时创建一次
pub struct Backend {
    pub store: Arc<dyn DataStore>,
    #[cfg(feature = "database")]
    database: Option<DatabaseManager>,
}

impl Backend {
    pub fn memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            #[cfg(feature = "database")]
            database: None,
        }
    }

    /// 按配置打开存储，数据库不可达时返回错误，调用方应终止启动
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        match config.store.backend {
            StoreBackend::Memory => {
                warn!("Using in-memory store, data will not survive a restart");
                Ok(Self::memory())
            }
            #[cfg(feature = "database")]
            StoreBackend::Postgres => {
                let database = DatabaseManager::new(&config.database)
                    .await
                    .context("could not connect to database")?;
                let store = PgStore::new(database.get_pool().clone());

                if config.database.ensure_schema {
                    store
                        .ensure_schema()
                        .await
                        .context("could not create products table")?;
                }

                info!("Connected to database");
                Ok(Self {
                    store: Arc::new(store),
                    database: Some(database),
                })
            }
            #[cfg(not(feature = "database"))]
            StoreBackend::Postgres => {
                anyhow::bail!("the postgres backend requires the `database` feature")
            }
        }
    }

    pub async fn close(self) {
        #[cfg(feature = "database")]
        if let Some(database) = self.database {
            database.close().await;
        }
    }
}

/// Ctrl-C 或 SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {}", e);
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
                warn!("failed to listen for SIGTERM: {}", e);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::NewProduct;

    #[tokio::test]
    async fn test_memory_backend_from_config() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Memory;

        let backend = Backend::connect(&config).await.unwrap();
        let created = backend
            .store
            .create_product(NewProduct {
                title: "Widget".to_string(),
                description: String::new(),
                price: 9.99,
            })
            .await
            .unwrap();
        assert_eq!(backend.store.all_products().await.unwrap(), vec![created]);

        backend.close().await;
    }
}
