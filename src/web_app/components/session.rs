// web_app/components/session.rs - Sign-in widget
//
// Shows the signed-in user with a logout button, or a compact
// login/register form when nobody is signed in.

use leptos::prelude::*;

use super::common::{Button, FormField, SecondaryButton};
use crate::web_app::api::SessionContext;
use crate::web_app::forms::{AuthMode, LoginForm};

#[component]
pub fn SessionBar(
    session: RwSignal<SessionContext>,
    form: RwSignal<LoginForm>,
    on_submit: Callback<()>,
    on_logout: Callback<()>,
) -> impl IntoView {
    let submitting = Signal::derive(move || form.with(|f| f.status().is_submitting()));
    let form_error = move || form.with(|f| f.status().error().map(str::to_string));
    let toggle_mode = move |_| {
        form.update(|f| {
            f.mode = match f.mode {
                AuthMode::Login => AuthMode::Register,
                AuthMode::Register => AuthMode::Login,
            }
        })
    };

    view! {
        <Show
            when=move || session.with(|s| s.authenticated)
            fallback=move || view! {
                <form
                    class="flex flex-wrap items-end gap-2"
                    on:submit=move |ev| {
                        ev.prevent_default();
                        on_submit.run(());
                    }
                >
                    <FormField
                        label="Username"
                        value=Signal::derive(move || form.with(|f| f.username.clone()))
                        on_input=Callback::new(move |text: String| form.update(|f| f.username = text))
                    />
                    <FormField
                        label="Password"
                        input_type="password"
                        value=Signal::derive(move || form.with(|f| f.password.clone()))
                        on_input=Callback::new(move |text: String| form.update(|f| f.password = text))
                    />
                    <Button button_type="submit" disabled=submitting>
                        {move || form.with(|f| f.mode.to_string())}
                    </Button>
                    <button type="button" class="text-sm text-blue-600 hover:underline" on:click=toggle_mode>
                        {move || match form.with(|f| f.mode) {
                            AuthMode::Login => "Need an account?",
                            AuthMode::Register => "Have an account?",
                        }}
                    </button>
                    {move || form_error().map(|message| view! {
                        <p class="w-full text-red-600 text-sm">{message}</p>
                    })}
                </form>
            }
        >
            <div class="flex items-center gap-3">
                <span class="text-sm text-gray-600">
                    "Signed in as "
                    <strong class="text-gray-900">
                        {move || session.with(|s| s.username.clone().unwrap_or_default())}
                    </strong>
                </span>
                <SecondaryButton on_click=on_logout>"Logout"</SecondaryButton>
            </div>
        </Show>
    }
}
