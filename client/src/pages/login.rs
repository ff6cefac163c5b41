//! Login page with an email + password form.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionState;

/// Trim both fields and require them non-empty.
fn validate_login_input(
    identifier: &str,
    secret: &str,
) -> Result<(String, String), &'static str> {
    let identifier = identifier.trim();
    let secret = secret.trim();
    if identifier.is_empty() || secret.is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((identifier.to_owned(), secret.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session_signal = expect_context::<RwSignal<SessionState>>();
    let identifier = RwSignal::new(String::new());
    let secret = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let navigate = use_navigate();

    // Already signed in: skip the form.
    Effect::new(move || {
        if session_signal.get().is_authenticated() {
            navigate("/", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (identifier_value, secret_value) =
            match validate_login_input(&identifier.get(), &secret.get()) {
                Ok(values) => values,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
        busy.set(true);
        info.set(String::new());

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match crate::net::api::login(&identifier_value, &secret_value).await {
                Ok(payload) => {
                    let state = crate::state::session::persist_login(
                        &crate::util::storage::BrowserStore,
                        &payload.token,
                        &payload.user,
                    );
                    session_signal.set(state);
                }
                Err(failure) => {
                    info.set(
                        crate::state::session::login_failure_message(failure.status).to_owned(),
                    );
                    busy.set(false);
                }
            }
        });

        #[cfg(not(feature = "csr"))]
        {
            let _ = (identifier_value, secret_value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"BITAmin"</h1>
                <p class="login-card__subtitle">"Member sign in"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || identifier.get()
                        on:input=move |ev| identifier.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="password"
                        prop:value=move || secret.get()
                        on:input=move |ev| secret.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
