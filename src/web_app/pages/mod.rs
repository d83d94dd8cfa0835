// web_app/pages/mod.rs - Page components module
//
// - CatalogPage: product list with filtering, infinite scroll and editing

pub mod catalog;

pub use catalog::CatalogPage;
