//! Member directory page.

#[cfg(test)]
#[path = "members_test.rs"]
mod members_test;

use leptos::prelude::*;

use crate::net::types::{ApprovalStatus, Member};
use crate::state::session;
use crate::util::storage::{BrowserStore, SessionStore};

/// Only approved members appear in the public directory, whatever the
/// backend returned.
fn visible_members(members: Vec<Member>) -> Vec<Member> {
    members
        .into_iter()
        .filter(|member| member.status == ApprovalStatus::Approved)
        .collect()
}

/// Cache every avatar URL in a directory reply so later renders still have
/// one when the backend drops the field.
fn remember_avatars(store: &impl SessionStore, members: &[Member]) {
    for member in members {
        if let Some(url) = member.avatar_url() {
            session::cache_profile_image(store, &member.id, url);
        }
    }
}

/// Avatar for one member: the reply's URL, falling back to the cached one.
fn avatar_for(store: &impl SessionStore, member: &Member) -> Option<String> {
    member
        .avatar_url()
        .map(str::to_owned)
        .or_else(|| session::cached_profile_image(store, &member.id))
}

/// Member directory — fetches approved members on mount.
#[component]
pub fn MembersPage() -> impl IntoView {
    let members = LocalResource::new(|| async {
        crate::net::api::fetch_members(Some("APPROVED"))
            .await
            .map(|list| {
                let list = visible_members(list);
                remember_avatars(&BrowserStore, &list);
                list
            })
    });

    view! {
        <div class="members-page">
            <header class="members-page__header">
                <h1>"Members"</h1>
            </header>
            <Suspense fallback=move || view! { <p>"Loading members..."</p> }>
                {move || {
                    members
                        .get()
                        .map(|result| match result {
                            Ok(list) if list.is_empty() => {
                                view! { <p class="members-page__empty">"No members yet."</p> }
                                    .into_any()
                            }
                            Ok(list) => {
                                view! {
                                    <ul class="members-page__grid">
                                        {list
                                            .into_iter()
                                            .map(|member| view! { <MemberCard member=member/> })
                                            .collect::<Vec<_>>()}
                                    </ul>
                                }
                                    .into_any()
                            }
                            Err(_) => {
                                view! {
                                    <p class="members-page__error">
                                        "Could not load members. Try again later."
                                    </p>
                                }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

/// One member in the directory grid.
#[component]
fn MemberCard(member: Member) -> impl IntoView {
    let avatar = avatar_for(&BrowserStore, &member);
    let cohort_label = member.cohort.map(|cohort| format!("Cohort {cohort}"));
    let links = member
        .links
        .iter()
        .map(|link| {
            let label = link.label.clone().unwrap_or_else(|| "link".to_owned());
            let url = link.url.clone();
            view! {
                <li>
                    <a href=url target="_blank" rel="noreferrer">
                        {label}
                    </a>
                </li>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <li class="member-card">
            {avatar
                .map(|url| {
                    view! { <img class="member-card__avatar" src=url alt=member.name.clone()/> }
                })}
            <div class="member-card__body">
                <h2 class="member-card__name">{member.name.clone()}</h2>
                {cohort_label.map(|label| view! { <p class="member-card__cohort">{label}</p> })}
                {member
                    .school
                    .clone()
                    .map(|school| view! { <p class="member-card__school">{school}</p> })}
                <ul class="member-card__links">{links}</ul>
            </div>
        </li>
    }
}
