// web_app/components/product.rs - Product list and edit modal
//
// - ProductRow: one line of the catalog table with edit/delete actions
// - ProductTable: the scrollable table that drives infinite loading
// - ProductFormModal: create/edit form bound to a `ProductEditor`

use leptos::html::Div;
use leptos::prelude::*;

use super::common::{format_price, Button, FormField, Loading, ModalWrapper, SecondaryButton};
use crate::web_app::controller::ScrollMetrics;
use crate::web_app::forms::{ProductEditor, ProductField};
use crate::web_app::model::{Product, ProductId};

/// One product line
#[component]
pub fn ProductRow(
    product: Product,
    on_edit: Callback<Product>,
    on_delete: Callback<ProductId>,
) -> impl IntoView {
    let id = product.id;
    let stock_class = if product.stock > 0 {
        "text-gray-900"
    } else {
        "text-red-600 font-semibold"
    };
    let editing = product.clone();

    view! {
        <tr class="border-b border-gray-100 hover:bg-gray-50">
            <td class="px-4 py-3">
                <img
                    src=product.image_url.clone()
                    alt=product.name.clone()
                    class="h-12 w-12 rounded object-cover bg-gray-100"
                    loading="lazy"
                />
            </td>
            <td class="px-4 py-3 font-medium text-gray-900">{product.name.clone()}</td>
            <td class="px-4 py-3 text-right tabular-nums">{format_price(&product.price)}</td>
            <td class=format!("px-4 py-3 text-right tabular-nums {}", stock_class)>{product.stock}</td>
            <td class="px-4 py-3 text-right whitespace-nowrap">
                <button
                    class="text-blue-600 hover:text-blue-800 font-medium mr-4"
                    on:click=move |_| on_edit.run(editing.clone())
                >
                    "Edit"
                </button>
                <button
                    class="text-red-600 hover:text-red-800 font-medium"
                    on:click=move |_| on_delete.run(id)
                >
                    "Delete"
                </button>
            </td>
        </tr>
    }
}

/// Scrollable product table
///
/// Reports viewport metrics on every scroll event; the page decides whether
/// that warrants a request. `list_ref` lets the page restore the scroll offset
/// after new rows are appended.
#[component]
pub fn ProductTable(
    #[prop(into)]
    products: Signal<Vec<Product>>,
    #[prop(into)]
    loading: Signal<bool>,
    #[prop(into)]
    has_more: Signal<bool>,
    list_ref: NodeRef<Div>,
    on_scroll: Callback<ScrollMetrics>,
    on_edit: Callback<Product>,
    on_delete: Callback<ProductId>,
) -> impl IntoView {
    let handle_scroll = move |_| {
        if let Some(el) = list_ref.get_untracked() {
            on_scroll.run(ScrollMetrics::new(
                f64::from(el.scroll_top()),
                f64::from(el.client_height()),
                f64::from(el.scroll_height()),
            ));
        }
    };

    view! {
        <div
            node_ref=list_ref
            class="h-[70vh] overflow-y-auto bg-white rounded-xl border border-gray-200 shadow-sm"
            on:scroll=handle_scroll
        >
            <table class="w-full text-sm">
                <thead class="sticky top-0 bg-gray-50 text-gray-600 text-left">
                    <tr>
                        <th class="px-4 py-3 w-16"></th>
                        <th class="px-4 py-3">"Name"</th>
                        <th class="px-4 py-3 text-right">"Price"</th>
                        <th class="px-4 py-3 text-right">"Stock"</th>
                        <th class="px-4 py-3"></th>
                    </tr>
                </thead>
                <tbody>
                    // keyed on every displayed field so in-place updates re-render the row
                    <For
                        each=move || products.get()
                        key=|p| (p.id, p.name.clone(), p.price, p.stock, p.image_url.clone())
                        children=move |product| view! {
                            <ProductRow product=product on_edit=on_edit on_delete=on_delete />
                        }
                    />
                </tbody>
            </table>

            <Show when=move || loading.get()>
                <Loading message="Loading products..." />
            </Show>
            <Show when=move || !loading.get() && !has_more.get()>
                <p class="text-center text-gray-400 text-sm py-6">
                    {move || if products.with(|p| p.is_empty()) { "No products found" } else { "End of catalog" }}
                </p>
            </Show>
        </div>
    }
}

/// Create/edit modal
///
/// Edits a private copy of the product; `on_submit` fires on the Add/Update
/// button and the page decides when to close.
#[component]
pub fn ProductFormModal(
    editor: RwSignal<Option<ProductEditor>>,
    on_submit: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let title = Signal::derive(move || {
        editor.with(|e| e.as_ref().map(|e| e.title()).unwrap_or_default().to_string())
    });
    let submitting = Signal::derive(move || {
        editor.with(|e| e.as_ref().is_some_and(|e| e.status().is_submitting()))
    });
    let form_error = Signal::derive(move || {
        editor.with(|e| e.as_ref().and_then(|e| e.status().error().map(str::to_string)))
    });
    let submit_label = move || editor.with(|e| e.as_ref().map(|e| e.submit_label()).unwrap_or("Save"));

    let fields = ProductField::ALL
        .into_iter()
        .map(|field| {
            let value = Signal::derive(move || {
                editor.with(|e| e.as_ref().map(|e| e.form.get(field).to_string()).unwrap_or_default())
            });
            let on_input = Callback::new(move |text: String| {
                editor.update(|e| {
                    if let Some(e) = e.as_mut() {
                        e.form.set(field, text);
                    }
                });
            });
            view! {
                <FormField
                    label=field.label()
                    value=value
                    on_input=on_input
                    input_type=field.input_type()
                />
            }
        })
        .collect_view();

    view! {
        <ModalWrapper title=title on_close=on_close>
            <form
                class="space-y-4"
                on:submit=move |ev| {
                    ev.prevent_default();
                    on_submit.run(());
                }
            >
                {fields}
                {move || form_error.get().map(|message| view! {
                    <p class="text-red-600 text-sm">{message}</p>
                })}
                <div class="flex justify-end gap-3 pt-2">
                    <SecondaryButton on_click=on_close>"Cancel"</SecondaryButton>
                    <Button button_type="submit" disabled=submitting>
                        {submit_label}
                    </Button>
                </div>
            </form>
        </ModalWrapper>
    }
}
