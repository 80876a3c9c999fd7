//! 产品资源

pub mod handler;
pub mod memory_store;
pub mod model;
#[cfg(feature = "database")]
pub mod pg_store;
pub mod store;

use axum::{routing::get, Router};

use handler::{
    create_product, delete_product, list_products, show_product, update_product,
    update_product_from_body, AppState,
};

/// 产品路由，集合路径同时接受 `/products` 和 `/products/`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(list_products)
                .post(create_product)
                .patch(update_product_from_body),
        )
        .route(
            "/products/",
            get(list_products)
                .post(create_product)
                .patch(update_product_from_body),
        )
        .route(
            "/products/:id",
            get(show_product).patch(update_product).delete(delete_product),
        )
}
