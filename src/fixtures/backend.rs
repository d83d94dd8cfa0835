// fixtures/backend.rs - In-memory CatalogBackend
//
// Mirrors the REST service closely enough for controller tests: page numbers
// start at 1, a page past the end is a 404, `next` is set while more results
// remain and errors carry the same JSON bodies the service sends.
//
// Every call is recorded so tests can assert that no request was issued.

use std::cell::RefCell;

use serde_json::json;

use crate::fixtures::CatalogFixture;
use crate::web_app::api::CatalogBackend;
use crate::web_app::error::ApiError;
use crate::web_app::model::{FilterCriteria, Product, ProductDraft, ProductId, ProductPage};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One request received by the backend
#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    FetchPage { page: u32, filter: FilterCriteria },
    Create(ProductDraft),
    Update(ProductId, ProductDraft),
    Delete(ProductId),
}

#[derive(Debug, Default)]
struct State {
    products: Vec<Product>,
    next_id: ProductId,
    calls: Vec<BackendCall>,
    fail_next: Option<ApiError>,
}

#[derive(Debug)]
pub struct InMemoryBackend {
    state: RefCell<State>,
    page_size: usize,
}

impl InMemoryBackend {
    pub fn new(products: Vec<Product>) -> Self {
        let next_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        InMemoryBackend {
            state: RefCell::new(State {
                products,
                next_id,
                ..Default::default()
            }),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_fixture<F: CatalogFixture>() -> Self {
        InMemoryBackend::new(F::products())
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Answer the next request with `err` instead of handling it
    pub fn fail_next(&self, err: ApiError) {
        self.state.borrow_mut().fail_next = Some(err);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    /// Current server-side contents
    pub fn products(&self) -> Vec<Product> {
        self.state.borrow().products.clone()
    }

    /// Change a product behind the client's back
    pub fn replace(&self, product: Product) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.products.iter_mut().find(|p| p.id == product.id) {
            *slot = product;
        }
    }

    fn record(&self, call: BackendCall) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        tracing::debug!("In-memory backend received {:?}", call);
        state.calls.push(call);
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found() -> ApiError {
    ApiError::from_response(404, &json!({ "detail": "Not found." }).to_string())
}

fn check_draft(draft: &ProductDraft) -> Result<(), ApiError> {
    if draft.name.trim().is_empty() {
        let body = json!({ "name": ["This field may not be blank."] });
        return Err(ApiError::from_response(400, &body.to_string()));
    }
    if draft.image_url.trim().is_empty() {
        let body = json!({ "image_url": ["This field may not be blank."] });
        return Err(ApiError::from_response(400, &body.to_string()));
    }
    Ok(())
}

impl CatalogBackend for InMemoryBackend {
    async fn fetch_page(&self, page: u32, filter: &FilterCriteria) -> Result<ProductPage, ApiError> {
        self.record(BackendCall::FetchPage {
            page,
            filter: filter.clone(),
        })?;

        let state = self.state.borrow();
        let matching: Vec<&Product> = state.products.iter().filter(|p| filter.matches(p)).collect();

        let start = (page.max(1) as usize - 1) * self.page_size;
        if page == 0 || (start >= matching.len() && page > 1) {
            return Err(ApiError::from_response(
                404,
                &json!({ "detail": "Invalid page." }).to_string(),
            ));
        }
        let end = (start + self.page_size).min(matching.len());

        Ok(ProductPage {
            results: matching[start..end].iter().map(|p| (*p).clone()).collect(),
            next: (end < matching.len()).then(|| format!("/products/?page={}", page + 1)),
            count: Some(matching.len() as u64),
        })
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.record(BackendCall::Create(draft.clone()))?;
        check_draft(draft)?;

        let mut state = self.state.borrow_mut();
        let product = draft.clone().with_id(state.next_id);
        state.next_id += 1;
        state.products.insert(0, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.record(BackendCall::Update(id, draft.clone()))?;
        check_draft(draft)?;

        let mut state = self.state.borrow_mut();
        let slot = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(not_found)?;
        *slot = draft.clone().with_id(id);
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.record(BackendCall::Delete(id))?;

        let mut state = self.state.borrow_mut();
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        if state.products.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
