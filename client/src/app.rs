//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::{login::LoginPage, members::MembersPage, mypage::MyPage};
use crate::state::session::{self, SessionState};
use crate::util::storage::BrowserStore;

/// Root application component.
///
/// Restores the session from storage before the first render, provides it
/// app-wide, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session_signal = RwSignal::new(session::restore(&BrowserStore));
    provide_context(session_signal);

    // Boot check: a restored token the gateway rejects with 401 is stale;
    // drop it. Other failures keep the restored session so a flaky network
    // does not log people out.
    #[cfg(feature = "csr")]
    {
        if let Some(token) = session_signal.get_untracked().token {
            session_signal.update(|state| state.loading = true);
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_me(&token).await {
                    Ok(user) => {
                        let state = session::persist_login(&BrowserStore, &token, &user);
                        session_signal.set(state);
                    }
                    Err(failure) if failure.status == Some(401) => {
                        session::clear(&BrowserStore);
                        session_signal.set(SessionState::default());
                    }
                    Err(_) => session_signal.update(|state| state.loading = false),
                }
            });
        }
    }

    view! {
        <Stylesheet id="main" href="/main.css"/>
        <Title text="BITAmin"/>

        <Router>
            <SiteNav/>
            <main class="site-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=MembersPage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("mypage") view=MyPage/>
                </Routes>
            </main>
        </Router>
    }
}

/// Top navigation reflecting login state.
#[component]
fn SiteNav() -> impl IntoView {
    let session_signal = expect_context::<RwSignal<SessionState>>();

    view! {
        <nav class="site-nav">
            <a class="site-nav__brand" href="/">
                "BITAmin"
            </a>
            <div class="site-nav__links">
                <a href="/">"Members"</a>
                {move || {
                    if session_signal.get().is_authenticated() {
                        view! { <a href="/mypage">"My Page"</a> }.into_any()
                    } else {
                        view! { <a href="/login">"Log in"</a> }.into_any()
                    }
                }}
            </div>
        </nav>
    }
}
