// web_app/components/filter.rs - Catalog filter bar
//
// Two ways to narrow the list:
// - quick search: pick a field (name, price or stock) and type a value
// - ranges: name plus optional min/max price and stock
//
// Input is parsed here; only valid criteria reach `on_apply`.

use leptos::prelude::*;

use super::common::{Button, FormField, SecondaryButton};
use crate::web_app::forms::FilterForm;
use crate::web_app::model::{FilterCriteria, FilterField};

#[component]
pub fn FilterBar(
    /// Fired with parsed criteria when the user applies a filter
    on_apply: Callback<FilterCriteria>,
    /// Fired with a message when the input cannot be parsed
    on_invalid: Callback<String>,
) -> impl IntoView {
    let field = RwSignal::new(FilterField::default());
    let query = RwSignal::new(String::new());
    let show_ranges = RwSignal::new(false);
    let ranges = RwSignal::new(FilterForm::default());

    let apply_quick = move || match FilterCriteria::by_field(field.get_untracked(), &query.get_untracked()) {
        Ok(criteria) => on_apply.run(criteria),
        Err(err) => on_invalid.run(err.to_string()),
    };

    let apply_ranges = Callback::new(move |()| match ranges.with_untracked(FilterForm::parse) {
        Ok(criteria) => on_apply.run(criteria),
        Err(err) => on_invalid.run(err.to_string()),
    });

    let clear = Callback::new(move |()| {
        query.set(String::new());
        ranges.update(FilterForm::clear);
        on_apply.run(FilterCriteria::default());
    });

    let range_input = move |label: &'static str, get: fn(&FilterForm) -> &String, set: fn(&mut FilterForm, String)| {
        let value = Signal::derive(move || ranges.with(|r| get(r).clone()));
        let on_input = Callback::new(move |text: String| ranges.update(|r| set(r, text)));
        view! { <FormField label=label value=value on_input=on_input input_type="number" /> }
    };

    view! {
        <div class="bg-white rounded-xl border border-gray-200 shadow-sm p-4 space-y-4">
            <form
                class="flex flex-wrap items-end gap-3"
                on:submit=move |ev| {
                    ev.prevent_default();
                    apply_quick();
                }
            >
                <label class="block">
                    <span class="block text-sm font-medium text-gray-700 mb-1">"Filter by"</span>
                    <select
                        class="px-3 py-2 border border-gray-300 rounded-lg bg-white"
                        on:change=move |ev| {
                            if let Some(selected) = FilterField::parse(&event_target_value(&ev)) {
                                field.set(selected);
                            }
                        }
                    >
                        {FilterField::ALL.into_iter().map(|option| view! {
                            <option
                                value=option.as_str()
                                selected=move || field.get() == option
                            >
                                {option.to_string()}
                            </option>
                        }).collect_view()}
                    </select>
                </label>
                <div class="flex-1 min-w-48">
                    <FormField
                        label="Value"
                        value=Signal::derive(move || query.get())
                        on_input=Callback::new(move |text: String| query.set(text))
                        placeholder="Leave empty to show everything"
                    />
                </div>
                <Button button_type="submit">"Apply"</Button>
                <SecondaryButton on_click=clear>"Clear"</SecondaryButton>
                <button
                    type="button"
                    class="text-sm text-blue-600 hover:underline"
                    on:click=move |_| show_ranges.update(|open| *open = !*open)
                >
                    {move || if show_ranges.get() { "Hide ranges" } else { "Price & stock ranges" }}
                </button>
            </form>

            <Show when=move || show_ranges.get()>
                <div class="grid grid-cols-2 md:grid-cols-5 gap-3 items-end border-t border-gray-100 pt-4">
                    <FormField
                        label="Name contains"
                        value=Signal::derive(move || ranges.with(|r| r.name.clone()))
                        on_input=Callback::new(move |text: String| ranges.update(|r| r.name = text))
                    />
                    {range_input("Min price", |r| &r.price_min, |r, v| r.price_min = v)}
                    {range_input("Max price", |r| &r.price_max, |r, v| r.price_max = v)}
                    {range_input("Min stock", |r| &r.stock_min, |r, v| r.stock_min = v)}
                    {range_input("Max stock", |r| &r.stock_max, |r, v| r.stock_max = v)}
                    <div class="col-span-full flex justify-end">
                        <Button on_click=apply_ranges>"Apply ranges"</Button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
