// web_app/components/common.rs - Reusable UI components
//
// Small building blocks shared by the catalog page, the modals and the login
// widget. They hold no catalog state; everything comes in through props.

use leptos::prelude::*;
use leptos::web_sys::KeyboardEvent;

/// Loading spinner with a short message
#[component]
pub fn Loading(
    #[prop(default = "Loading...")]
    message: &'static str,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center gap-3 p-6">
            <div class="animate-spin rounded-full h-6 w-6 border-4 border-gray-200 border-t-blue-600"></div>
            <span class="text-gray-500 font-medium">{message}</span>
        </div>
    }
}

/// Dismissible error banner
///
/// Renders nothing while `message` is `None`.
#[component]
pub fn ErrorBanner(
    /// Message to show
    #[prop(into)]
    message: Signal<Option<String>>,
    /// Called when the user closes the banner
    #[prop(optional)]
    on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div class="bg-red-50 border border-red-200 rounded-lg px-4 py-3 flex items-start justify-between gap-4" role="alert">
                    <p class="text-red-700 text-sm">{text}</p>
                    {on_dismiss.map(|dismiss| view! {
                        <button
                            class="text-red-400 hover:text-red-600 text-sm font-bold"
                            title="Dismiss"
                            on:click=move |_| dismiss.run(())
                        >
                            "✕"
                        </button>
                    })}
                </div>
            }
        })
    }
}

/// Primary button
#[component]
pub fn Button(
    children: Children,
    #[prop(optional)]
    on_click: Option<Callback<()>>,
    #[prop(into, default = Signal::from(false))]
    disabled: Signal<bool>,
    /// submit, button or reset
    #[prop(default = "button")]
    button_type: &'static str,
    #[prop(default = "")]
    class: &'static str,
) -> impl IntoView {
    let base_class = "px-4 py-2 bg-blue-600 text-white rounded-lg hover:bg-blue-700 \
                      transition-colors disabled:bg-gray-400 disabled:cursor-not-allowed \
                      font-medium shadow-sm";

    view! {
        <button
            type=button_type
            disabled=move || disabled.get()
            class=format!("{} {}", base_class, class)
            on:click=move |_| {
                if let Some(handler) = on_click {
                    handler.run(());
                }
            }
        >
            {children()}
        </button>
    }
}

/// Secondary (outlined) button
#[component]
pub fn SecondaryButton(
    children: Children,
    #[prop(optional)]
    on_click: Option<Callback<()>>,
    #[prop(into, default = Signal::from(false))]
    disabled: Signal<bool>,
    #[prop(default = "")]
    class: &'static str,
) -> impl IntoView {
    let base_class = "px-4 py-2 bg-white text-gray-700 rounded-lg hover:bg-gray-50 \
                      transition-colors border border-gray-300 disabled:opacity-50 \
                      font-medium shadow-sm";

    view! {
        <button
            type="button"
            disabled=move || disabled.get()
            class=format!("{} {}", base_class, class)
            on:click=move |_| {
                if let Some(handler) = on_click {
                    handler.run(());
                }
            }
        >
            {children()}
        </button>
    }
}

/// Modal backdrop and frame
///
/// Escape and backdrop clicks close the modal; the parent decides whether it is shown.
#[component]
pub fn ModalWrapper(
    children: Children,
    on_close: Callback<()>,
    #[prop(into)]
    title: Signal<String>,
) -> impl IntoView {
    let handle_keydown = move |ev: KeyboardEvent| {
        if ev.key() == "Escape" {
            on_close.run(());
        }
    };

    view! {
        <div
            class="fixed inset-0 z-50 flex items-center justify-center p-4"
            on:keydown=handle_keydown
        >
            <div
                class="absolute inset-0 bg-gray-900/60 backdrop-blur-sm"
                on:click=move |_| on_close.run(())
            ></div>

            <div
                class="relative bg-white rounded-2xl shadow-2xl w-full max-w-lg max-h-[90vh] flex flex-col overflow-hidden"
                on:click=|ev| ev.stop_propagation()
            >
                <div class="flex justify-between items-center px-6 py-4 border-b border-gray-100">
                    <h2 class="text-xl font-bold text-gray-800">{move || title.get()}</h2>
                    <button
                        class="text-gray-400 hover:text-gray-600 rounded-full p-2"
                        on:click=move |_| on_close.run(())
                        title="Close"
                    >
                        "✕"
                    </button>
                </div>
                <div class="p-6 overflow-y-auto">
                    {children()}
                </div>
            </div>
        </div>
    }
}

/// Labelled text input
///
/// Controlled: shows `value` and reports every keystroke through `on_input`.
#[component]
pub fn FormField(
    label: &'static str,
    #[prop(into)]
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(default = "text")]
    input_type: &'static str,
    #[prop(default = "")]
    placeholder: &'static str,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm font-medium text-gray-700 mb-1">{label}</span>
            <input
                type=input_type
                placeholder=placeholder
                step=if input_type == "number" { Some("any") } else { None }
                class="w-full px-3 py-2 border border-gray-300 rounded-lg \
                       focus:ring-2 focus:ring-blue-500 focus:border-transparent outline-none"
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </label>
    }
}

/// Price with two decimals and a currency sign
pub fn format_price(price: &rust_decimal::Decimal) -> String {
    format!("${:.2}", price)
}
