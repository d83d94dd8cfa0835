// fixtures/mod.rs - Reusable catalog data and an in-memory backend
//
// Tests and offline demos need a backend that behaves like the REST service:
// paginated listing with a `next` link, filters, CRUD and error answers.
// `InMemoryBackend` provides that over any `CatalogFixture` data set.
//
// Example:
//   let backend = InMemoryBackend::from_fixture::<SampleCatalog>().with_page_size(4);
//   controller.load_next_page(&backend).await;

pub mod backend;
pub mod catalog;

pub use backend::InMemoryBackend;
pub use catalog::SampleCatalog;

use crate::web_app::model::Product;

/// A named set of products to seed a backend with
pub trait CatalogFixture {
    /// Products in listing order; ids must be unique
    fn products() -> Vec<Product>;
}
