//! Catalog browsing: one fetch per screen, then local filtering.

use tracing::debug;

use crate::api::{ApiError, StoreApi};
use crate::model::Product;

/// A catalog snapshot. Narrowing a search never refetches; every query runs
/// against this cache.
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Fetch the full product list once.
    pub async fn load(store: &StoreApi) -> Result<Self, ApiError> {
        let products = store.products().await?;
        debug!("Loaded {} catalog products", products.len());
        Ok(Self::new(products))
    }

    /// The unfiltered snapshot, in the order the backend returned it.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive substring match on product names. A blank query
    /// returns the full list, order preserved.
    pub fn filter(&self, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|product| product.name.to_lowercase().contains(&query))
            .collect()
    }
}
