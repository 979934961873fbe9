//! Product catalog models and request DTOs.

use serde::{Deserialize, Serialize};

/// Catalog product. The image join comes back under the backend's addon key
/// `_product_image_of_product`; at most one image per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: i64,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default, rename = "_product_image_of_product")]
    pub image: Option<ProductImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub image: Option<ImageDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDetails {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub meta: Option<ImageMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMeta {
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

/// Scalar-only creation body; images are attached in separate steps.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub brand: String,
    pub category: String,
}

/// Partial update body. `None` fields are omitted from the JSON entirely so
/// the backend leaves them untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProductRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssociateImageRequest {
    pub product_id: i64,
    pub image_id: i64,
}

/// Validated product form fields, shared by the create and edit paths.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub brand: String,
    pub category: String,
}

impl ProductDraft {
    pub fn to_create_request(&self) -> CreateProductRequest {
        CreateProductRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock: self.stock,
            brand: self.brand.clone(),
            category: self.category.clone(),
        }
    }

    pub fn to_update_request(&self) -> UpdateProductRequest {
        UpdateProductRequest {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            price: Some(self.price),
            stock: Some(self.stock),
            brand: Some(self.brand.clone()),
            category: Some(self.category.clone()),
            enabled: None,
        }
    }
}
