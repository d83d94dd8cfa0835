// web_app/controller/mod.rs - Catalog list controller
//
// Owns the loaded product list, the page cursor, the active filter and the
// load state. It is written sans-IO: `begin_*` methods decide whether a request
// should be issued and describe it, `finish_*` methods merge the response.
// The Leptos page spawns the request in between; `driver.rs` offers async
// helpers that do both halves against any `CatalogBackend`.
//
// Every page request carries a ticket stamped with the current generation.
// Applying a filter bumps the generation, so a response that arrives for a
// superseded filter is recognised and dropped instead of being appended.

pub mod driver;
pub mod scroll;

pub use driver::execute_save;
pub use scroll::{ScrollMetrics, NEAR_BOTTOM_THRESHOLD_PX};

use crate::web_app::error::{ApiError, CatalogError};
use crate::web_app::forms::{ProductForm, SaveRequest};
use crate::web_app::model::{FilterCriteria, Product, ProductId, ProductPage};

/// Position in the paginated listing
///
/// The backend pages by offset, so removing a row the user has already seen
/// shifts every later row one place towards the start. `next_offset` tracks
/// where the first unseen row sits now; the next page is chosen to cover it and
/// rows fetched twice are dropped by the id check when merging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    loaded: bool,
    has_more: bool,
    next_offset: usize,
    page_size: Option<usize>,
    removed_in_flight: usize,
}

impl PageCursor {
    /// Page the most recent request targeted (1-based)
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Whether `page()` has been merged into the list
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Server-side position of the first row not fetched yet (a lower bound)
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    /// Page to request next, or `None` when the listing is exhausted
    fn next_page(&self) -> Option<u32> {
        if self.loaded && !self.has_more {
            return None;
        }
        match self.page_size {
            Some(size) if size > 0 => Some(u32::try_from(self.next_offset / size + 1).unwrap_or(u32::MAX)),
            _ if self.loaded => Some(self.page + 1),
            _ => Some(self.page),
        }
    }

    /// Record a merged page that held `fetched` rows before de-duplication
    fn record_page(&mut self, page: u32, fetched: usize, has_more: bool) {
        if has_more && self.page_size.is_none() {
            self.page_size = Some(fetched);
        }
        let start = self.page_size.unwrap_or(fetched) * (page as usize).saturating_sub(1);
        if self.removed_in_flight == 0 {
            self.next_offset = start + fetched;
            self.has_more = has_more;
        } else {
            // rows removed while the request ran may or may not be reflected in
            // the response; resume from where they would have been
            self.next_offset = start.saturating_sub(self.removed_in_flight);
            self.has_more = true;
        }
        self.removed_in_flight = 0;
        self.page = page;
        self.loaded = true;
    }

    /// A loaded row left the server-side result set
    fn record_removal(&mut self, loading: bool) {
        self.next_offset = self.next_offset.saturating_sub(1);
        if loading {
            self.removed_in_flight += 1;
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        PageCursor {
            page: 1,
            loaded: false,
            has_more: true,
            next_offset: 0,
            page_size: None,
            removed_in_flight: 0,
        }
    }
}

/// Description of one page request
#[derive(Clone, Debug, PartialEq)]
pub struct PageTicket {
    pub generation: u64,
    pub page: u32,
    pub filter: FilterCriteria,
    /// Scroll offset to restore once the page has been appended
    pub restore_scroll: Option<f64>,
}

impl PageTicket {
    fn same_request(&self, other: &PageTicket) -> bool {
        self.generation == other.generation && self.page == other.page
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading(PageTicket),
    Error(String),
}

/// What `finish_load` did with a response
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    Loaded {
        appended: usize,
        has_more: bool,
        restore_scroll: Option<f64>,
    },
    Failed(String),
    /// The response belonged to a superseded request and was ignored
    Stale,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogController {
    products: Vec<Product>,
    cursor: PageCursor,
    state: LoadState,
    filter: FilterCriteria,
    generation: u64,
    error: Option<String>,
}

impl CatalogController {
    pub fn new() -> Self {
        CatalogController::default()
    }

    /// Start with criteria already set; nothing is requested yet
    pub fn with_filter(filter: FilterCriteria) -> Self {
        CatalogController {
            filter,
            ..Default::default()
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.product(id).is_some()
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading(_))
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Most recent error from any operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Show a message raised outside the controller (e.g. unparsable filter input)
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Request the next page of the current listing
    ///
    /// Returns `None` while a load is in flight or when the listing is exhausted.
    /// A page that failed to load is requested again rather than skipped.
    pub fn begin_next_page(&mut self) -> Option<PageTicket> {
        self.begin_next_page_at(None)
    }

    /// Scroll event on the list viewport
    ///
    /// Evaluated on every event; the in-flight check keeps repeated events near
    /// the bottom from issuing duplicate requests.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<PageTicket> {
        if !metrics.near_bottom() || !self.cursor.has_more || self.is_loading() {
            return None;
        }
        self.begin_next_page_at(Some(metrics.scroll_top))
    }

    fn begin_next_page_at(&mut self, restore_scroll: Option<f64>) -> Option<PageTicket> {
        if let LoadState::Loading(active) = &self.state {
            tracing::debug!("Ignoring page request: page {} already loading", active.page);
            return None;
        }
        let Some(page) = self.cursor.next_page() else {
            tracing::debug!("Ignoring page request: no more pages");
            return None;
        };
        if self.cursor.loaded && page <= self.cursor.page {
            tracing::debug!("Refetching page {} after rows were removed", page);
        }
        self.cursor.page = page;
        self.cursor.loaded = false;
        Some(self.start_load(restore_scroll))
    }

    /// Replace the filter criteria and reload from page 1
    ///
    /// Always issues a request; a load still in flight for the old criteria is
    /// superseded and its response will be discarded.
    pub fn apply_filter(&mut self, filter: FilterCriteria) -> PageTicket {
        if let LoadState::Loading(active) = &self.state {
            tracing::debug!("Superseding in-flight request for page {}", active.page);
        }
        tracing::info!("Applying filter {:?}", filter);
        self.filter = filter;
        self.generation += 1;
        self.products.clear();
        self.cursor = PageCursor::default();
        self.start_load(None)
    }

    /// Discard the list and fetch it again under the same criteria
    pub fn refresh(&mut self) -> PageTicket {
        let filter = self.filter.clone();
        self.apply_filter(filter)
    }

    fn start_load(&mut self, restore_scroll: Option<f64>) -> PageTicket {
        let ticket = PageTicket {
            generation: self.generation,
            page: self.cursor.page,
            filter: self.filter.clone(),
            restore_scroll,
        };
        self.error = None;
        self.cursor.removed_in_flight = 0;
        self.state = LoadState::Loading(ticket.clone());
        ticket
    }

    /// Merge the response for `ticket`
    ///
    /// Leaves the loading state in every case where the ticket is still current.
    pub fn finish_load(&mut self, ticket: PageTicket, result: Result<ProductPage, ApiError>) -> LoadOutcome {
        let current = matches!(&self.state, LoadState::Loading(active) if active.same_request(&ticket));
        if !current {
            tracing::debug!(
                "Dropping stale response for page {} (generation {}, now {})",
                ticket.page,
                ticket.generation,
                self.generation
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(page) => {
                let fetched = page.results.len();
                let has_more = page.has_more();
                let before = self.products.len();
                for product in page.results {
                    if self.contains(product.id) {
                        tracing::debug!("Skipping duplicate product id={}", product.id);
                        continue;
                    }
                    self.products.push(product);
                }
                let appended = self.products.len() - before;

                self.cursor.record_page(ticket.page, fetched, has_more);
                let has_more = self.cursor.has_more;
                self.state = LoadState::Idle;
                tracing::info!(
                    "Loaded page {}: {} new products, {} total, more={}",
                    ticket.page,
                    appended,
                    self.products.len(),
                    has_more
                );

                LoadOutcome::Loaded {
                    appended,
                    has_more,
                    restore_scroll: if appended > 0 { ticket.restore_scroll } else { None },
                }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!("Loading page {} failed: {}", ticket.page, message);
                self.state = LoadState::Error(message.clone());
                self.error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Give up on `ticket` without a response (the request was dropped)
    pub fn abandon_load(&mut self, ticket: &PageTicket) {
        if matches!(&self.state, LoadState::Loading(active) if active.same_request(ticket)) {
            tracing::debug!("Abandoning page {} request", ticket.page);
            self.state = LoadState::Idle;
        }
    }

    /// Check that `id` can be deleted; no request should be sent on error
    pub fn begin_delete(&mut self, id: ProductId) -> Result<(), CatalogError> {
        if !self.contains(id) {
            return Err(self.record_error(CatalogError::NotLoaded(id)));
        }
        self.error = None;
        Ok(())
    }

    /// Remove `id` once the backend confirmed the delete
    pub fn finish_delete(&mut self, id: ProductId, result: Result<(), ApiError>) -> Result<(), CatalogError> {
        match result {
            Ok(()) => {
                self.products.retain(|p| p.id != id);
                let loading = self.is_loading();
                self.cursor.record_removal(loading);
                tracing::info!("Removed product id={} from the list", id);
                Ok(())
            }
            Err(err) => Err(self.record_error(err.into())),
        }
    }

    /// Validate a create/update form; no request should be sent on error
    pub fn begin_save(&mut self, form: &ProductForm, target: Option<ProductId>) -> Result<SaveRequest, CatalogError> {
        match form.validate() {
            Ok(draft) => {
                self.error = None;
                Ok(SaveRequest { target, draft })
            }
            Err(err) => Err(self.record_error(err.into())),
        }
    }

    /// Merge a confirmed create (prepended) or update (replaced in place)
    pub fn finish_save(
        &mut self,
        request: &SaveRequest,
        result: Result<Product, ApiError>,
    ) -> Result<Product, CatalogError> {
        let product = match result {
            Ok(product) => product,
            Err(err) => return Err(self.record_error(err.into())),
        };

        match request.target {
            None => {
                if !self.contains(product.id) {
                    self.products.insert(0, product.clone());
                }
                tracing::info!("Created product id={}", product.id);
            }
            Some(id) => match self.products.iter_mut().find(|p| p.id == id) {
                Some(slot) => {
                    *slot = product.clone();
                    tracing::info!("Updated product id={}", id);
                    if !self.filter.matches(&product) {
                        // still shown, but later pages no longer count it
                        tracing::debug!("Updated product id={} no longer matches the filter", id);
                        let loading = self.is_loading();
                        self.cursor.record_removal(loading);
                    }
                }
                None => tracing::debug!("Updated product id={} is not in the current list", id),
            },
        }
        Ok(product)
    }

    fn record_error(&mut self, err: CatalogError) -> CatalogError {
        tracing::warn!("Catalog operation failed: {}", err);
        self.error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: ProductId) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            price: Decimal::new(100 + i64::from(id), 2),
            image_url: format!("https://img.example/{id}.png"),
            stock: id,
        }
    }

    fn page(ids: &[ProductId], more: bool) -> ProductPage {
        ProductPage {
            results: ids.iter().copied().map(product).collect(),
            next: more.then(|| "page=next".to_string()),
            count: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let controller = CatalogController::new();
        assert!(controller.products().is_empty());
        assert_eq!(controller.cursor().page(), 1);
        assert!(controller.has_more());
        assert_eq!(controller.state(), &LoadState::Idle);
    }

    #[test]
    fn test_first_request_is_page_one() {
        let mut controller = CatalogController::new();
        let ticket = controller.begin_next_page().unwrap();
        assert_eq!(ticket.page, 1);
        assert!(controller.is_loading());
    }

    #[test]
    fn test_second_begin_is_rejected_while_loading() {
        let mut controller = CatalogController::new();
        assert!(controller.begin_next_page().is_some());
        assert!(controller.begin_next_page().is_none());
    }

    #[test]
    fn test_failed_page_is_retried() {
        let mut controller = CatalogController::new();
        let first = controller.begin_next_page().unwrap();
        controller.finish_load(first, Ok(page(&[1, 2], true)));

        let second = controller.begin_next_page().unwrap();
        assert_eq!(second.page, 2);
        let outcome = controller.finish_load(second, Err(ApiError::Transport("offline".into())));
        assert_eq!(outcome, LoadOutcome::Failed("Request failed: offline".to_string()));
        assert_eq!(controller.error(), Some("Request failed: offline"));
        assert!(matches!(controller.state(), LoadState::Error(_)));

        let retry = controller.begin_next_page().unwrap();
        assert_eq!(retry.page, 2);
        assert_eq!(controller.error(), None);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut controller = CatalogController::new();
        let old = controller.begin_next_page().unwrap();
        let fresh = controller.apply_filter(FilterCriteria::default().with_name("lamp"));

        assert_eq!(controller.finish_load(old, Ok(page(&[1], true))), LoadOutcome::Stale);
        assert!(controller.products().is_empty());
        assert!(controller.is_loading());

        controller.finish_load(fresh, Ok(page(&[7], false)));
        assert_eq!(controller.products().len(), 1);
        assert!(!controller.has_more());
    }

    #[test]
    fn test_exhausted_listing() {
        let mut controller = CatalogController::new();
        let ticket = controller.begin_next_page().unwrap();
        controller.finish_load(ticket, Ok(page(&[1], false)));
        assert!(controller.begin_next_page().is_none());
    }

    #[test]
    fn test_duplicate_ids_are_skipped() {
        let mut controller = CatalogController::new();
        let ticket = controller.begin_next_page().unwrap();
        controller.finish_load(ticket, Ok(page(&[1, 2], true)));
        let ticket = controller.begin_next_page().unwrap();
        let outcome = controller.finish_load(ticket, Ok(page(&[2, 3], false)));
        assert!(matches!(outcome, LoadOutcome::Loaded { appended: 1, .. }));
        let ids: Vec<_> = controller.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_abandon_clears_loading() {
        let mut controller = CatalogController::new();
        let ticket = controller.begin_next_page().unwrap();
        controller.abandon_load(&ticket);
        assert_eq!(controller.state(), &LoadState::Idle);
        assert_eq!(controller.begin_next_page().map(|t| t.page), Some(1));
    }

    #[test]
    fn test_scroll_restore_only_when_content_grew() {
        let mut controller = CatalogController::new();
        let ticket = controller.begin_next_page().unwrap();
        controller.finish_load(ticket, Ok(page(&[1], true)));

        let ticket = controller.on_scroll(ScrollMetrics::new(300.0, 400.0, 705.0)).unwrap();
        assert_eq!(ticket.restore_scroll, Some(300.0));
        let outcome = controller.finish_load(ticket, Ok(page(&[], false)));
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                appended: 0,
                has_more: false,
                restore_scroll: None
            }
        );
    }

    #[test]
    fn test_error_slot_lifecycle() {
        let mut controller = CatalogController::new();
        controller.report_error("price_min must be a number");
        assert_eq!(controller.error(), Some("price_min must be a number"));
        controller.dismiss_error();
        assert!(controller.error().is_none());

        let ticket = controller.begin_next_page().unwrap();
        controller.finish_load(ticket, Err(ApiError::Transport("timed out".to_string())));
        assert_eq!(controller.error(), Some("Request failed: timed out"));

        // the retry clears the previous failure
        controller.begin_next_page().unwrap();
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_error_reported_during_load_survives_merge() {
        let mut controller = CatalogController::new();
        let ticket = controller.begin_next_page().unwrap();
        controller.report_error("Request failed with status 503");

        controller.finish_load(ticket, Ok(page(&[1, 2], true)));
        assert_eq!(controller.error(), Some("Request failed with status 503"));
        assert_eq!(controller.products().len(), 2);
    }

    #[test]
    fn test_removal_moves_next_page_back() {
        let mut controller = CatalogController::new();
        let ticket = controller.begin_next_page().unwrap();
        controller.finish_load(ticket, Ok(page(&[1, 2, 3], true)));
        assert_eq!(controller.cursor().next_offset(), 3);

        controller.begin_delete(2).unwrap();
        controller.finish_delete(2, Ok(())).unwrap();
        assert_eq!(controller.cursor().next_offset(), 2);
        assert_eq!(controller.begin_next_page().map(|t| t.page), Some(1));
    }
}
