//! 产品处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};
use validator::Validate;

use super::{
    model::{describe_validation, CreateProductRequest, NewProduct, UpdateProductRequest},
    store::DataStore,
};
use crate::core::{error::CoreError, response::json};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

fn parse_id(raw: &str) -> Result<i64, CoreError> {
    raw.parse::<i64>()
        .map_err(|e| CoreError::BadRequest(format!("could not parse ID {:?}: {}", raw, e)))
}

/// 请求体解析失败时沿用 axum 的状态码（400/415/422），响应体仍为状态文本
fn body_rejection(rejection: JsonRejection) -> CoreError {
    let message = format!("invalid request body: {}", rejection.body_text());
    match rejection.status() {
        StatusCode::UNPROCESSABLE_ENTITY => CoreError::UnprocessableEntity(message),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => CoreError::UnsupportedMediaType(message),
        _ => CoreError::BadRequest(message),
    }
}

// GET /products/
pub async fn list_products(State(state): State<AppState>) -> Result<Response, CoreError> {
    let products = state
        .store
        .all_products()
        .await
        .map_err(|e| CoreError::from_store("error fetching products", e))?;

    Ok(json(StatusCode::OK, &products))
}

// GET /products/:id
pub async fn show_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, CoreError> {
    let id = parse_id(&raw_id)?;

    let product = state
        .store
        .find_product(id)
        .await
        .map_err(|e| CoreError::from_store("error fetching product", e))?;

    Ok(json(StatusCode::OK, &product))
}

// POST /products/
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Response, CoreError> {
    let Json(payload) = payload.map_err(body_rejection)?;
    payload
        .validate()
        .map_err(|e| CoreError::UnprocessableEntity(describe_validation(&e)))?;

    let product = state
        .store
        .create_product(NewProduct::from(payload))
        .await
        .map_err(|e| CoreError::from_store("error creating product", e))?;

    info!("Created product: {} ({})", product.title, product.id);

    let mut response = json(StatusCode::CREATED, &product);
    if response.status() == StatusCode::CREATED {
        if let Ok(location) = HeaderValue::from_str(&format!("/products/{}", product.id)) {
            response.headers_mut().insert(header::LOCATION, location);
        }
    }
    Ok(response)
}

// PATCH /products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Response, CoreError> {
    let id = parse_id(&raw_id)?;
    let Json(payload) = payload.map_err(body_rejection)?;

    if let Some(body_id) = payload.id {
        if body_id != id {
            return Err(CoreError::BadRequest(format!(
                "path id {} does not match body id {}",
                id, body_id
            )));
        }
    }

    apply_update(&state, id, payload).await
}

// PATCH /products/，id 来自请求体
pub async fn update_product_from_body(
    State(state): State<AppState>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Response, CoreError> {
    let Json(payload) = payload.map_err(body_rejection)?;
    let id = payload
        .id
        .ok_or_else(|| CoreError::UnprocessableEntity("missing product id".to_string()))?;

    apply_update(&state, id, payload).await
}

async fn apply_update(
    state: &AppState,
    id: i64,
    payload: UpdateProductRequest,
) -> Result<Response, CoreError> {
    payload
        .validate()
        .map_err(|e| CoreError::UnprocessableEntity(describe_validation(&e)))?;

    let changes = payload.into_changes();
    if changes.is_empty() {
        return Err(CoreError::UnprocessableEntity("no fields to update".to_string()));
    }

    let product = state
        .store
        .update_product(id, changes)
        .await
        .map_err(|e| CoreError::from_store("error updating product", e))?;

    info!("Updated product: {} ({})", product.title, product.id);

    Ok(json(StatusCode::OK, &product))
}

// DELETE /products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, CoreError> {
    let id = parse_id(&raw_id)?;

    state
        .store
        .delete_product(id)
        .await
        .map_err(|e| CoreError::from_store("error deleting product", e))?;

    debug!("Deleted product: {}", id);

    Ok(StatusCode::NO_CONTENT.into_response())
}
