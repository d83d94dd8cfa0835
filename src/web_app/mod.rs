// web_app/mod.rs - Root module for the catalog admin web application
//
// Architecture:
// - model/: Shared data types (products, pages, filter criteria, session info)
// - error.rs: Error types surfaced to the UI
// - forms.rs: Raw form state and validation
// - api/: REST client for the catalog backend and the `CatalogBackend` trait
// - controller/: List state machine (pagination, filtering, mutations)
// - components/, pages/, app.rs: Leptos UI (SSR and hydrate builds only)
//
// Everything above the UI layer compiles natively without Leptos so it can be
// driven from tests and the command-line checker.

pub mod api;
pub mod controller;
pub mod error;
pub mod forms;
pub mod model;

#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod components;

#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod pages;

#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod app;

#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub use app::App;
