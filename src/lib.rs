// lib.rs - Root module for the catalog_admin library
//
// The library holds the admin client (web_app) and an in-memory catalog
// (fixtures) used by tests and offline demos. With the `hydrate` feature it
// also exports the WASM entry point that takes over the server-rendered page.

#![recursion_limit = "256"]

pub mod fixtures;
pub mod web_app;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::web_app::App;

    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
