// web_app/controller/driver.rs - Async operations over a CatalogBackend
//
// Each operation runs the begin/finish pair of the controller around one backend
// call. The command-line checker and the tests use these directly; the Leptos
// page splits them across `spawn_local` so the controller signal is not held
// while the request is in flight.

use super::{CatalogController, LoadOutcome, PageTicket, ScrollMetrics};
use crate::web_app::api::CatalogBackend;
use crate::web_app::error::{ApiError, CatalogError};
use crate::web_app::forms::{ProductForm, SaveRequest};
use crate::web_app::model::{FilterCriteria, Product, ProductId};

/// Releases the loading state if the request future is dropped before it completes
struct LoadGuard<'a> {
    controller: &'a mut CatalogController,
    ticket: Option<PageTicket>,
}

impl<'a> LoadGuard<'a> {
    fn new(controller: &'a mut CatalogController, ticket: PageTicket) -> Self {
        LoadGuard {
            controller,
            ticket: Some(ticket),
        }
    }

    fn finish(mut self, result: Result<crate::web_app::model::ProductPage, ApiError>) -> LoadOutcome {
        match self.ticket.take() {
            Some(ticket) => self.controller.finish_load(ticket, result),
            None => LoadOutcome::Stale,
        }
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.controller.abandon_load(&ticket);
        }
    }
}

/// Dispatch a validated save to create or update
pub async fn execute_save<B: CatalogBackend>(backend: &B, request: &SaveRequest) -> Result<Product, ApiError> {
    match request.target {
        None => backend.create_product(&request.draft).await,
        Some(id) => backend.update_product(id, &request.draft).await,
    }
}

impl CatalogController {
    /// Fetch the page described by `ticket` and merge it
    pub async fn run_load<B: CatalogBackend>(&mut self, backend: &B, ticket: PageTicket) -> LoadOutcome {
        let page = ticket.page;
        let filter = ticket.filter.clone();
        let guard = LoadGuard::new(self, ticket);
        let result = backend.fetch_page(page, &filter).await;
        guard.finish(result)
    }

    /// Load the next page; `None` when no request was warranted
    pub async fn load_next_page<B: CatalogBackend>(&mut self, backend: &B) -> Option<LoadOutcome> {
        let ticket = self.begin_next_page()?;
        Some(self.run_load(backend, ticket).await)
    }

    pub async fn scroll<B: CatalogBackend>(&mut self, backend: &B, metrics: ScrollMetrics) -> Option<LoadOutcome> {
        let ticket = self.on_scroll(metrics)?;
        Some(self.run_load(backend, ticket).await)
    }

    pub async fn filter_by<B: CatalogBackend>(&mut self, backend: &B, filter: FilterCriteria) -> LoadOutcome {
        let ticket = self.apply_filter(filter);
        self.run_load(backend, ticket).await
    }

    pub async fn reload<B: CatalogBackend>(&mut self, backend: &B) -> LoadOutcome {
        let ticket = self.refresh();
        self.run_load(backend, ticket).await
    }

    pub async fn delete<B: CatalogBackend>(&mut self, backend: &B, id: ProductId) -> Result<(), CatalogError> {
        self.begin_delete(id)?;
        let result = backend.delete_product(id).await;
        self.finish_delete(id, result)
    }

    /// Validate `form` and create (`target == None`) or update the product
    pub async fn save<B: CatalogBackend>(
        &mut self,
        backend: &B,
        form: &ProductForm,
        target: Option<ProductId>,
    ) -> Result<Product, CatalogError> {
        let request = self.begin_save(form, target)?;
        let result = execute_save(backend, &request).await;
        self.finish_save(&request, result)
    }
}
