//! The product save saga.
//!
//! One authoritative product call (create or update) followed by per-image
//! steps: upload the file, then associate the stored image with the product.
//! Image steps are fault-isolated: a failed upload or association never rolls
//! back the product, it lands in the report instead. On edits, images the
//! form no longer carries are dissociated server-side as an explicit final
//! step.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::api::{ApiError, StoreApi};
use crate::model::{Product, ProductDraft, ProductImage, UpdateProductRequest};

use super::validation;

/// One image slot on the product form: either a file still on disk or an
/// image already stored server-side from a previous save.
#[derive(Debug, Clone)]
pub enum ImageItem {
    Local(PathBuf),
    Existing(ProductImage),
}

/// A per-image failure, preserved for the caller to surface.
#[derive(Debug)]
pub struct ImageFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a save: the authoritative product plus what happened to each
/// image step.
#[derive(Debug)]
pub struct SaveReport {
    pub product: Product,
    pub created: bool,
    /// Images uploaded and associated during this save
    pub attached: Vec<ProductImage>,
    /// Images that failed to upload or associate
    pub failed: Vec<ImageFailure>,
    /// Image ids dissociated because the form dropped them
    pub removed: Vec<i64>,
}

impl SaveReport {
    pub fn fully_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Create or update a product, then run the image steps. `existing` carries
/// the product being edited; `None` means create.
pub async fn save_product(
    store: &StoreApi,
    draft: &ProductDraft,
    images: Vec<ImageItem>,
    existing: Option<&Product>,
) -> Result<SaveReport, ApiError> {
    validation::validate_product_draft(draft).map_err(ApiError::Validation)?;

    let (product, created) = match existing {
        None => {
            info!("Creating product {}", draft.name);
            let product = store.create_product(&draft.to_create_request()).await?;
            (product, true)
        }
        Some(current) => {
            info!("Updating product {} ({})", draft.name, current.id);
            let product = store
                .update_product(current.id, &draft.to_update_request())
                .await?;
            (product, false)
        }
    };

    let mut new_paths = Vec::new();
    let mut retained = HashSet::new();
    for item in images {
        match item {
            ImageItem::Local(path) => new_paths.push(path),
            ImageItem::Existing(image) => {
                retained.insert(image.id);
            }
        }
    }

    // Each image runs upload-then-associate on its own; siblings proceed
    // concurrently and one failure never blocks the rest.
    let uploads = new_paths.into_iter().map(|path| async move {
        match upload_and_associate(store, product.id, &path).await {
            Ok(image) => Ok(image),
            Err(err) => {
                warn!("Image {} not attached: {}", path.display(), err);
                Err(ImageFailure {
                    path,
                    reason: err.to_string(),
                })
            }
        }
    });

    let mut attached = Vec::new();
    let mut failed = Vec::new();
    for result in join_all(uploads).await {
        match result {
            Ok(image) => attached.push(image),
            Err(failure) => failed.push(failure),
        }
    }

    // Edits: dissociate whatever the form no longer carries. Failures here
    // are tolerated the same way upload failures are.
    let mut removed = Vec::new();
    if let Some(current) = existing {
        for image in current.image.iter().filter(|img| !retained.contains(&img.id)) {
            debug!("Removing image {} from product {}", image.id, product.id);
            match store.remove_image(image.id).await {
                Ok(()) => removed.push(image.id),
                Err(err) => warn!("Failed to remove image {}: {}", image.id, err),
            }
        }
    }

    info!(
        "Saved product {}: {} attached, {} failed, {} removed",
        product.id,
        attached.len(),
        failed.len(),
        removed.len()
    );

    Ok(SaveReport {
        product,
        created,
        attached,
        failed,
        removed,
    })
}

/// Upload one file and associate the result. The association only happens
/// once the upload reports a usable storage path.
async fn upload_and_associate(
    store: &StoreApi,
    product_id: i64,
    path: &Path,
) -> Result<ProductImage, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| ApiError::Validation(format!("Could not read {}: {}", path.display(), err)))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image.jpg")
        .to_string();

    let image = store.upload_image(&filename, bytes).await?;
    let storage_path = image
        .image
        .as_ref()
        .and_then(|details| details.path.as_deref())
        .unwrap_or("");
    if storage_path.is_empty() {
        return Err(ApiError::Decode(
            "upload response carried no storage path".to_string(),
        ));
    }

    store.associate_image(product_id, image.id).await?;
    Ok(image)
}

/// Flip a product's enabled flag with a partial update, leaving every other
/// field untouched. A product that never had the flag counts as enabled.
pub async fn toggle_product(store: &StoreApi, product: &Product) -> Result<Product, ApiError> {
    let request = UpdateProductRequest {
        enabled: Some(!product.enabled.unwrap_or(true)),
        ..Default::default()
    };
    info!(
        "Toggling product {} to enabled={}",
        product.id,
        request.enabled.unwrap_or_default()
    );
    store.update_product(product.id, &request).await
}
