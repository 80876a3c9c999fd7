//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 建立连接池，连接失败（包括 ping 失败）直接返回错误
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        info!("Connecting to database: {}", redact_url(&config.url));

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 等待借出的连接归还后关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// 日志中隐藏连接串里的密码，包括 `user:pass@` 和 `?password=` 两种写法
pub fn redact_url(raw: &str) -> String {
    let mut url = match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => url,
        _ => return "<unparseable database url>".to_string(),
    };

    if url.password().is_some() {
        let _ = url.set_password(Some("***"));
    }

    let has_password_param = url.query_pairs().any(|(key, _)| key == "password");
    if has_password_param {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "password" {
                    "***".to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}
