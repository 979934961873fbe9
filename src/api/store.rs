//! Typed endpoints for the store API group: products, image uploads, and
//! product/image associations.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};

use crate::config::ApiConfig;
use crate::model::{
    AssociateImageRequest, CreateProductRequest, Product, ProductImage, UpdateProductRequest,
};
use crate::session::SessionStore;

use super::{join_url, ApiClient, ApiError};

/// Multipart field name the upload endpoint expects.
const UPLOAD_FIELD: &str = "content";

pub struct StoreApi {
    client: ApiClient,
    base: String,
}

impl StoreApi {
    /// Every store endpoint requires an authenticated session.
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::with_session(config, session)?,
            base: config.store_base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base, path)
    }

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get(&self.url("product")).await
    }

    pub async fn product(&self, id: i64) -> Result<Product, ApiError> {
        self.client.get(&self.url(&format!("product/{}", id))).await
    }

    pub async fn create_product(&self, request: &CreateProductRequest) -> Result<Product, ApiError> {
        self.client.post(&self.url("product"), request).await
    }

    pub async fn update_product(
        &self,
        id: i64,
        request: &UpdateProductRequest,
    ) -> Result<Product, ApiError> {
        self.client
            .patch(&self.url(&format!("product/{}", id)), request)
            .await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&self.url(&format!("product/{}", id)))
            .await
    }

    /// Upload raw image bytes. The backend stores the file and returns the
    /// image record to associate in a follow-up call.
    pub async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> Result<ProductImage, ApiError> {
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())
            .map_err(|err| ApiError::Validation(format!("Unsupported image type: {}", err)))?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        self.client
            .post_multipart(&self.url("upload/image"), form)
            .await
    }

    pub async fn associate_image(&self, product_id: i64, image_id: i64) -> Result<(), ApiError> {
        let request = AssociateImageRequest {
            product_id,
            image_id,
        };
        self.client
            .post_unit(&self.url("product_image"), &request)
            .await
    }

    /// Drop an image from its product (edits that remove images).
    pub async fn remove_image(&self, image_id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&self.url(&format!("product_image/{}", image_id)))
            .await
    }
}
