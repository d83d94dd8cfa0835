// web_app/pages/catalog.rs - Catalog admin page
//
// Wires the list controller to the UI. The controller lives in a signal; every
// action runs its `begin_*` step synchronously, spawns the request and applies
// the `finish_*` step when the response arrives. Nothing blocks while a request
// is in flight, so scroll events keep arriving and are filtered by the
// controller's loading state.

use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::web_app::api::{ApiClient, ApiConfig, CatalogApi, CatalogBackend, SessionContext};
use crate::web_app::components::*;
use crate::web_app::controller::{execute_save, CatalogController, LoadOutcome, PageTicket, ScrollMetrics};
use crate::web_app::forms::{LoginForm, ProductEditor};
use crate::web_app::model::{FilterCriteria, Product, ProductId};

/// Run a controller step and notify subscribers only when it produced something
///
/// Scroll events fire constantly; most of them change nothing and should not
/// re-render the table.
fn step<T>(
    controller: RwSignal<CatalogController>,
    f: impl FnOnce(&mut CatalogController) -> Option<T>,
) -> Option<T> {
    let result = controller.try_update_untracked(f).flatten();
    if result.is_some() {
        controller.notify();
    }
    result
}

/// Fetch the page for `ticket` and merge it once it arrives
///
/// A refetch after rows were removed can come back with nothing new while more
/// pages remain; the following page is requested straight away since no scroll
/// event may follow.
fn load_page(
    api: CatalogApi,
    controller: RwSignal<CatalogController>,
    list_ref: NodeRef<Div>,
    ticket: PageTicket,
) {
    spawn_local(async move {
        let result = api.fetch_page(ticket.page, &ticket.filter).await;
        match controller.try_update(|c| c.finish_load(ticket, result)) {
            Some(LoadOutcome::Loaded {
                restore_scroll: Some(top),
                ..
            }) => {
                // wait for the new rows to be laid out
                request_animation_frame(move || {
                    if let Some(el) = list_ref.get_untracked() {
                        el.set_scroll_top(top as i32);
                    }
                });
            }
            Some(LoadOutcome::Loaded {
                appended: 0,
                has_more: true,
                ..
            }) => {
                if let Some(next) = step(controller, CatalogController::begin_next_page) {
                    load_page(api, controller, list_ref, next);
                }
            }
            _ => {}
        }
    });
}

#[component]
pub fn CatalogPage() -> impl IntoView {
    let client = match ApiClient::new(ApiConfig::default()) {
        Ok(client) => StoredValue::new_local(client),
        Err(err) => {
            tracing::error!("Could not create API client: {}", err);
            let message: Signal<Option<String>> = Signal::stored(Some(err.to_string()));
            return view! { <ErrorBanner message=message /> }.into_any();
        }
    };

    let controller = RwSignal::new(CatalogController::new());
    let session = RwSignal::new(SessionContext::new());
    let login_form = RwSignal::new(LoginForm::default());
    let editor = RwSignal::new(None::<ProductEditor>);
    let list_ref = NodeRef::<Div>::new();

    let run_load = move |ticket: PageTicket| {
        let api = client.with_value(|c| c.catalog(&session.get_untracked()));
        load_page(api, controller, list_ref, ticket);
    };

    // Session first so mutations carry a CSRF token, then the first page
    Effect::new(move |_| {
        let api = client.get_value();
        let mut ctx = session.get_untracked();
        spawn_local(async move {
            let session_error = match api.fetch_session(&mut ctx).await {
                Ok(_) => {
                    session.set(ctx);
                    None
                }
                Err(err) => {
                    tracing::warn!("Session lookup failed: {}", err);
                    Some(err.to_string())
                }
            };
            if let Some(ticket) = step(controller, CatalogController::begin_next_page) {
                run_load(ticket);
            }
            // reported after the load started, which clears earlier messages
            if let Some(message) = session_error {
                controller.update(|c| c.report_error(message));
            }
        });
    });

    let on_scroll = Callback::new(move |metrics: ScrollMetrics| {
        if let Some(ticket) = step(controller, |c| c.on_scroll(metrics)) {
            run_load(ticket);
        }
    });

    let on_filter = Callback::new(move |criteria: FilterCriteria| {
        if let Some(el) = list_ref.get_untracked() {
            el.set_scroll_top(0);
        }
        if let Some(ticket) = controller.try_update(|c| c.apply_filter(criteria)) {
            run_load(ticket);
        }
    });

    let on_invalid_filter = Callback::new(move |message: String| {
        controller.update(|c| c.report_error(message));
    });

    let on_refresh = Callback::new(move |()| {
        if let Some(ticket) = controller.try_update(CatalogController::refresh) {
            run_load(ticket);
        }
    });

    let on_delete = Callback::new(move |id: ProductId| {
        let allowed = controller.try_update(|c| c.begin_delete(id).is_ok()).unwrap_or(false);
        if !allowed {
            return;
        }
        let api = client.with_value(|c| c.catalog(&session.get_untracked()));
        spawn_local(async move {
            let result = api.delete_product(id).await;
            // failures are kept in the controller and shown in the banner
            controller.update(|c| {
                let _ = c.finish_delete(id, result);
            });
        });
    });

    let on_add = Callback::new(move |()| editor.set(Some(ProductEditor::create())));
    let on_edit = Callback::new(move |product: Product| editor.set(Some(ProductEditor::edit(&product))));
    let on_close = Callback::new(move |()| editor.set(None));

    let on_save = Callback::new(move |()| {
        let request = editor
            .try_update(|e| e.as_mut().and_then(ProductEditor::begin_submit))
            .flatten();
        let Some(request) = request else {
            return;
        };
        let api = client.with_value(|c| c.catalog(&session.get_untracked()));
        spawn_local(async move {
            let result = execute_save(&api, &request).await;
            let Some(merged) = controller.try_update(|c| c.finish_save(&request, result)) else {
                return;
            };
            let close = editor
                .try_update(|e| e.as_mut().is_some_and(|e| e.finish_submit(&merged)))
                .unwrap_or(false);
            if close {
                editor.set(None);
            }
        });
    });

    let on_login = Callback::new(move |()| {
        let Some(credentials) = login_form.try_update(LoginForm::begin_submit).flatten() else {
            return;
        };
        let mode = login_form.with_untracked(|f| f.mode);
        let api = client.get_value();
        let mut ctx = session.get_untracked();
        spawn_local(async move {
            let result = api.submit_credentials(&mut ctx, mode, &credentials).await;
            let signed_in = result.is_ok();
            login_form.update(|f| f.finish_submit(&result));
            if signed_in {
                session.set(ctx);
                if let Some(ticket) = controller.try_update(CatalogController::refresh) {
                    run_load(ticket);
                }
            }
        });
    });

    let on_logout = Callback::new(move |()| {
        let api = client.get_value();
        let mut ctx = session.get_untracked();
        spawn_local(async move {
            match api.logout(&mut ctx).await {
                Ok(()) => session.set(ctx),
                Err(err) => controller.update(|c| c.report_error(err.to_string())),
            }
        });
    });

    let products = Signal::derive(move || controller.with(|c| c.products().to_vec()));
    let loading = Signal::derive(move || controller.with(|c| c.is_loading()));
    let has_more = Signal::derive(move || controller.with(|c| c.has_more()));
    let error = Signal::derive(move || controller.with(|c| c.error().map(str::to_string)));
    let on_dismiss = Callback::new(move |()| controller.update(|c| c.dismiss_error()));

    view! {
        <div class="min-h-screen bg-gray-50 text-gray-900">
            <header class="bg-white shadow-sm border-b border-gray-200">
                <div class="max-w-6xl mx-auto px-4 py-3 flex flex-wrap items-center justify-between gap-4">
                    <h1 class="text-xl font-bold">"Products"</h1>
                    <SessionBar
                        session=session
                        form=login_form
                        on_submit=on_login
                        on_logout=on_logout
                    />
                </div>
            </header>

            <main class="max-w-6xl mx-auto px-4 py-6 space-y-4">
                <FilterBar on_apply=on_filter on_invalid=on_invalid_filter />

                <div class="flex items-center justify-between">
                    <p class="text-sm text-gray-500">
                        {move || format!("{} products loaded", products.with(Vec::len))}
                    </p>
                    <div class="flex gap-2">
                        <SecondaryButton on_click=on_refresh disabled=loading>"Refresh"</SecondaryButton>
                        <Button on_click=on_add>"Add Product"</Button>
                    </div>
                </div>

                <ErrorBanner message=error on_dismiss=on_dismiss />

                <ProductTable
                    products=products
                    loading=loading
                    has_more=has_more
                    list_ref=list_ref
                    on_scroll=on_scroll
                    on_edit=on_edit
                    on_delete=on_delete
                />
            </main>

            <Show when=move || editor.with(Option::is_some)>
                <ProductFormModal editor=editor on_submit=on_save on_close=on_close />
            </Show>
        </div>
    }
    .into_any()
}
