//! 内存产品存储
//!
//! 测试替身，同时支持在没有 Postgres 的环境下运行服务。

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::model::{NewProduct, Product, ProductChanges};
use super::store::{ProductStore, StoreError, StoreResult};

#[derive(Debug)]
struct Inner {
    rows: BTreeMap<i64, Product>,
    next_id: i64,
}

#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// 用已有的行初始化，保留原 id，后续分配的 id 从最大值之后开始
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let rows: BTreeMap<i64, Product> = products.into_iter().map(|p| (p.id, p)).collect();
        let next_id = rows.keys().next_back().map_or(1, |max| max + 1);

        Self {
            inner: RwLock::new(Inner { rows, next_id }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.rows.is_empty()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn all_products(&self) -> StoreResult<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_product(&self, id: i64) -> StoreResult<Product> {
        let inner = self.inner.read().await;
        inner.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut inner = self.inner.write().await;

        let id = inner.next_id;
        inner.next_id += 1;

        let created = Product {
            id,
            title: product.title,
            description: product.description,
            price: product.price,
            created_at: Utc::now(),
        };
        inner.rows.insert(id, created.clone());

        Ok(created)
    }

    async fn update_product(&self, id: i64, changes: ProductChanges) -> StoreResult<Product> {
        let mut inner = self.inner.write().await;
        let product = inner.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        changes.apply_to(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
