//! 产品存储抽象
//!
//! 处理器只依赖这里的 trait，具体实现可以是 Postgres，也可以是内存存储。

use async_trait::async_trait;
use thiserror::Error;

use super::model::{NewProduct, Product, ProductChanges};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 存储层错误，调用方只需要区分“未找到”和“其他失败”
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product not found")]
    NotFound,

    #[error("backend failure: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    pub fn backend(err: impl Into<BoxError>) -> Self {
        StoreError::Backend(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(Box::new(other)),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 产品存储能力
///
/// 每个操作对应后端的一次往返，不重试、不缓存。
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 全部产品，表为空时返回空列表
    async fn all_products(&self) -> StoreResult<Vec<Product>>;

    async fn find_product(&self, id: i64) -> StoreResult<Product>;

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product>;

    /// 部分更新，后写入者覆盖先写入者
    async fn update_product(&self, id: i64, changes: ProductChanges) -> StoreResult<Product>;

    async fn delete_product(&self, id: i64) -> StoreResult<()>;
}

/// 服务端持有的聚合存储能力
pub trait DataStore: ProductStore {}

impl<T: ProductStore + ?Sized> DataStore for T {}
