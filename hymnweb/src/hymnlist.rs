// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::{
    data::load_languages,
    model::{Catalog, EditLog, Preferences},
};
use hymnal::{HymnRecord, Language};
use leptos::prelude::*;
use leptos_router::components::A;

/// List of hymns in the primary language, or search results from all languages.
#[component]
pub fn HymnList(
    catalog: RwSignal<Catalog>,
    preferences: Signal<Preferences>,
    edits: Signal<EditLog>,
) -> impl IntoView {
    let (query, write_query) = signal(String::new());
    let searching = Memo::new(move |_| !query.read().trim().is_empty());

    // Search covers every language, so fetch the rest once there is a query.
    Effect::new(move |_| {
        if searching.get() {
            load_languages(
                preferences.read_untracked().search_languages(),
                catalog,
                edits,
                false,
            );
        }
    });

    view! {
        <div class="hymn-list">
            <input type="search" placeholder="Search by title, number or words"
                prop:value=query
                on:input:target=move |event| write_query.set(event.target().value()) />
            <ul>
                {move || {
                    let catalog = catalog.read();
                    let primary = preferences.read().primary_language.clone();
                    let query = query.get();
                    if !catalog.is_loaded(&primary) {
                        return vec![view! { <li class="status">"Loading…"</li> }.into_any()];
                    }
                    if query.trim().is_empty() {
                        catalog.hymns(&primary).iter().map(|hymn| {
                            view! { <HymnLink language=primary.clone() primary=primary.clone() record=hymn.record.clone()/> }.into_any()
                        }).collect::<Vec<_>>()
                    } else {
                        let hits = catalog.search(&query, &primary);
                        if hits.is_empty() {
                            return vec![view! { <li class="status">"No hymns found"</li> }.into_any()];
                        }
                        hits.into_iter().map(|hit| {
                            view! { <HymnLink language=hit.language primary=primary.clone() record=hit.record/> }.into_any()
                        }).collect::<Vec<_>>()
                    }
                }}
            </ul>
        </div>
    }
}

/// A link to a hymn, with a badge if it isn't in the primary language.
#[component]
fn HymnLink(language: Language, primary: Language, record: HymnRecord) -> impl IntoView {
    let href = if language == primary {
        format!("/hymn/{}", record.id)
    } else {
        format!("/hymn/{}?language={language}", record.id)
    };
    let badge = (language != primary).then(|| {
        view! { <span class="badge">{language.to_string()}</span> }
    });

    view! {
        <li>
            <A href=href>
                <span class="number">{record.number}</span>
                " "
                <span class="title">{record.title}</span>
            </A>
            {badge}
        </li>
    }
}
