//! My-page: the signed-in member's profile and logout.

#[cfg(test)]
#[path = "mypage_test.rs"]
mod mypage_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::types::{ApprovalStatus, Role, UserProfile};
use crate::state::session::{self, SessionState};
use crate::util::storage::BrowserStore;

/// Redirect once the boot check has settled and nobody is signed in.
fn should_redirect_to_login(state: &SessionState) -> bool {
    !state.loading && !state.is_authenticated()
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administrator",
        Role::Member => "Member",
    }
}

fn status_label(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Approved => "Approved",
        ApprovalStatus::Pending => "Awaiting approval",
        ApprovalStatus::Rejected => "Rejected",
    }
}

/// Profile page for the signed-in member. Redirects to `/login` when the
/// session is absent.
#[component]
pub fn MyPage() -> impl IntoView {
    let session_signal = expect_context::<RwSignal<SessionState>>();
    let navigate = use_navigate();

    Effect::new(move || {
        if should_redirect_to_login(&session_signal.get()) {
            navigate("/login", NavigateOptions::default());
        }
    });

    let on_logout = move |_| {
        // Capture the token for the notify call, then reset local state
        // unconditionally. The server call is best-effort.
        let token = session_signal.get().token;
        session::clear(&BrowserStore);
        session_signal.set(SessionState::default());

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            crate::net::api::logout(token.as_deref()).await;
        });

        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
        }
    };

    view! {
        <div class="mypage">
            <header class="mypage__header">
                <h1>"My Page"</h1>
                <button class="mypage__logout" on:click=on_logout>
                    "Log out"
                </button>
            </header>
            {move || session_signal.get().user.map(|user| view! { <ProfileCard user=user/> })}
        </div>
    }
}

/// The profile fields as a definition list.
#[component]
fn ProfileCard(user: UserProfile) -> impl IntoView {
    let cohort = user
        .cohort
        .map_or_else(|| "-".to_owned(), |cohort| format!("Cohort {cohort}"));
    let email = user.email.clone().unwrap_or_else(|| "-".to_owned());

    view! {
        <dl class="mypage__profile">
            <dt>"Name"</dt>
            <dd>{user.name.clone()}</dd>
            <dt>"Email"</dt>
            <dd>{email}</dd>
            <dt>"Cohort"</dt>
            <dd>{cohort}</dd>
            <dt>"Role"</dt>
            <dd>{role_label(user.role)}</dd>
            <dt>"Status"</dt>
            <dd>{status_label(user.status)}</dd>
        </dl>
    }
}
