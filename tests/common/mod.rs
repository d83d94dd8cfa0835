// common/mod.rs - Shared test utilities
//
// - product(): build a product with predictable fields
// - sample_backend(): in-memory backend seeded with the sample catalog
// - StalledBackend: a backend whose requests never complete
// - fake_api (web feature): a real HTTP server speaking the catalog API

#![allow(dead_code)]

#[cfg(feature = "ssr")]
pub mod fake_api;

use std::sync::Once;

use catalog_admin::fixtures::{InMemoryBackend, SampleCatalog};
use catalog_admin::web_app::api::CatalogBackend;
use catalog_admin::web_app::error::ApiError;
use catalog_admin::web_app::model::{FilterCriteria, Product, ProductDraft, ProductId, ProductPage};
use rust_decimal::Decimal;

static TRACING: Once = Once::new();

/// Route tracing output through the test harness (RUST_LOG=debug to see it)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn product(id: ProductId) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        price: Decimal::new(1000 + i64::from(id), 2),
        image_url: format!("https://img.example/{id}.png"),
        stock: 10 + id,
    }
}

pub fn page_of(ids: &[ProductId], more: bool) -> ProductPage {
    ProductPage {
        results: ids.iter().copied().map(product).collect(),
        next: more.then(|| "/products/?page=next".to_string()),
        count: None,
    }
}

/// Sample catalog (12 products) served `page_size` at a time
pub fn sample_backend(page_size: usize) -> InMemoryBackend {
    init_tracing();
    InMemoryBackend::from_fixture::<SampleCatalog>().with_page_size(page_size)
}

pub fn ids(products: &[Product]) -> Vec<ProductId> {
    products.iter().map(|p| p.id).collect()
}

/// Backend whose requests never complete
pub struct StalledBackend;

impl CatalogBackend for StalledBackend {
    async fn fetch_page(&self, _page: u32, _filter: &FilterCriteria) -> Result<ProductPage, ApiError> {
        std::future::pending().await
    }

    async fn create_product(&self, _draft: &ProductDraft) -> Result<Product, ApiError> {
        std::future::pending().await
    }

    async fn update_product(&self, _id: ProductId, _draft: &ProductDraft) -> Result<Product, ApiError> {
        std::future::pending().await
    }

    async fn delete_product(&self, _id: ProductId) -> Result<(), ApiError> {
        std::future::pending().await
    }
}
