//! 基于 Postgres 的产品存储

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use super::model::{NewProduct, Product, ProductChanges};
use super::store::{ProductStore, StoreError, StoreResult};

// 显式转换列类型，兼容 SERIAL / NUMERIC / 可空 description / TIMESTAMP 的旧表结构
const PRODUCT_COLUMNS: &str = r#"
    id::int8 AS id,
    title,
    COALESCE(description, '') AS description,
    price::float8 AS price,
    created_at::timestamptz AS created_at
"#;

/// Postgres 产品存储，内部的连接池自带同步，可以直接克隆共享
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 表不存在时创建（在实际部署中应由迁移负责）
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                price DOUBLE PRECISION NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn all_products(&self) -> StoreResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM products", PRODUCT_COLUMNS);
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn find_product(&self, id: i64) -> StoreResult<Product> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        let sql = format!(
            "INSERT INTO products (title, description, price) VALUES ($1, $2, $3) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.title)
            .bind(&product.description)
            .bind(product.price)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update_product(&self, id: i64, changes: ProductChanges) -> StoreResult<Product> {
        let sql = format!(
            r#"
            UPDATE products SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price)
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.price)
            .fetch_one(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
