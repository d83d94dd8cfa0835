// web_app/api/mod.rs - REST backend access
//
// This module contains the HTTP client for the catalog backend and the trait
// the list controller uses to reach it. The controller never sees reqwest:
// tests and local demos plug in the in-memory backend from `fixtures` instead.

pub mod client;
pub mod config;
pub mod session;

pub use client::{ApiClient, CatalogApi, SessionContext};
pub use config::ApiConfig;

use crate::web_app::error::ApiError;
use crate::web_app::model::{FilterCriteria, Product, ProductDraft, ProductId, ProductPage};

/// Product endpoints consumed by the catalog list
///
/// Futures are not required to be `Send`: everything runs on one event loop.
#[allow(async_fn_in_trait)]
pub trait CatalogBackend {
    /// `GET /products?page=<n>&<filters>`
    async fn fetch_page(&self, page: u32, filter: &FilterCriteria) -> Result<ProductPage, ApiError>;

    /// `POST /products/`
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError>;

    /// `PATCH /products/<id>/`
    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, ApiError>;

    /// `DELETE /products/<id>/`
    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;
}
