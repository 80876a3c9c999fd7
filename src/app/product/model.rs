//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 已持久化的产品
///
/// 所有字段都来自数据库中的一行，返回给处理器后即为不可变快照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// 待插入的产品，id 和 created_at 由存储层分配
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
}

/// 部分更新，`None` 表示保留原值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.price.is_none()
    }

    /// 把修改应用到已有产品上（内存存储使用）
    pub fn apply_to(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}

// 创建产品请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Title must not be empty"), custom(function = "not_blank"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            description: req.description,
            price: req.price,
        }
    }
}

// 更新产品请求
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    /// 仅在 `PATCH /products/` 上使用，路径中带 id 时可省略
    pub id: Option<i64>,

    #[validate(length(min = 1, message = "Title must not be empty"), custom(function = "not_blank"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,
}

impl UpdateProductRequest {
    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            price: self.price,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Title must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// 把 validator 的错误整理成一行可读信息
pub fn describe_validation(err: &validator::ValidationErrors) -> String {
    let messages: Vec<String> = err
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();

    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_serializes_with_wire_keys() {
        let product = Product {
            id: 1,
            title: "Widget".to_string(),
            description: "A widget".to_string(),
            price: 9.99,
            created_at: "2024-01-02T03:04:05Z".parse().unwrap(),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "title": "Widget",
                "description": "A widget",
                "price": 9.99,
                "created_at": "2024-01-02T03:04:05Z"
            })
        );
    }

    #[test]
    fn test_create_request_validation() {
        let ok = CreateProductRequest {
            title: "Widget".to_string(),
            description: String::new(),
            price: 0.0,
        };
        assert!(ok.validate().is_ok());

        let blank = CreateProductRequest {
            title: "   ".to_string(),
            description: String::new(),
            price: 1.0,
        };
        assert!(blank.validate().is_err());

        let negative = CreateProductRequest {
            title: "Widget".to_string(),
            description: String::new(),
            price: -0.01,
        };
        let err = negative.validate().unwrap_err();
        assert_eq!(describe_validation(&err), "Price must not be negative");
    }

    #[test]
    fn test_update_request_changes() {
        let req: UpdateProductRequest =
            serde_json::from_str(r#"{"title":"  Gadget ","price":3.5}"#).unwrap();
        assert!(req.validate().is_ok());

        let changes = req.into_changes();
        assert_eq!(changes.title.as_deref(), Some("Gadget"));
        assert_eq!(changes.price, Some(3.5));
        assert!(changes.description.is_none());

        let empty: UpdateProductRequest = serde_json::from_str(r#"{"id":4}"#).unwrap();
        assert!(empty.into_changes().is_empty());
    }
}
