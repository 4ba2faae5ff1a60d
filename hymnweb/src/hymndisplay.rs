// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::{
    edithymn::EditHymn,
    model::{Catalog, EditLog, Preferences, VerseCursor},
};
use hymnal::{Language, Segment};
use leptos::{ev::keydown, prelude::*};
use leptos_meta::Title;
use leptos_router::{
    components::A,
    hooks::{use_params_map, use_query_map},
};
use leptos_use::use_event_listener;
use web_sys::KeyboardEvent;

/// Shows one verse of a hymn at a time, optionally with the same verse in a second language.
#[component]
pub fn HymnDisplay(
    catalog: RwSignal<Catalog>,
    preferences: Signal<Preferences>,
    edits: Signal<EditLog>,
    write_edits: WriteSignal<EditLog>,
) -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();
    let id = move || params.read().get("id").unwrap_or_default();
    let language = move || {
        query
            .read()
            .get("language")
            .and_then(|language| language.parse::<Language>().ok())
            .unwrap_or_else(|| preferences.read().primary_language.clone())
    };

    let (cursor, write_cursor) = signal(VerseCursor::default());
    let (editing, write_editing) = signal(false);
    let verse_count = Memo::new(move |_| {
        catalog
            .read()
            .hymn(&language(), &id())
            .map_or(0, |hymn| hymn.verses.len())
    });
    let current = move || cursor.get().with_count(verse_count.get());
    let go_previous = move || write_cursor.set(current().previous());
    let go_next = move || write_cursor.set(current().next());

    // Start from the first verse whenever a different hymn is shown.
    Effect::new(move |_| {
        id();
        language();
        write_cursor.set(VerseCursor::default());
        write_editing.set(false);
    });

    _ = use_event_listener(document(), keydown, move |event: KeyboardEvent| {
        if editing.get_untracked() {
            return;
        }
        match event.key().as_str() {
            "ArrowLeft" => go_previous(),
            "ArrowRight" => go_next(),
            _ => {}
        }
    });

    move || {
        let language = language();
        let id = id();
        let catalog_read = catalog.read();
        if !catalog_read.is_loaded(&language) {
            return view! { <p class="status">"Loading…"</p> }.into_any();
        }
        let Some(hymn) = catalog_read.hymn(&language, &id).cloned() else {
            return view! {
                <p class="status">"Hymn not found"</p>
                <A href="/">"Back to hymns"</A>
            }
            .into_any();
        };
        let secondary = preferences
            .read()
            .dual_language()
            .and_then(|secondary| catalog_read.hymn_by_number(secondary, hymn.record.number))
            .cloned();
        drop(catalog_read);

        if editing.get() {
            return view! {
                <EditHymn language record=hymn.record catalog edits write_edits write_editing/>
            }
            .into_any();
        }

        let cursor = current();
        let secondary_verse = secondary.as_ref().and_then(|secondary| cursor.verse(secondary));
        view! {
            <Title text=hymn.record.title.clone()/>
            <header class="hymn-header">
                <A href="/">"Back to hymns"</A>
                <div>
                    <h1>{hymn.record.title.clone()}</h1>
                    <p class="muted">"Hymn " {hymn.record.number}</p>
                </div>
                <input type="button" value="Edit" on:click=move |_| write_editing.set(true)/>
            </header>
            <main class="hymn-verses">
                {cursor.verse(&hymn).map(|verse| view! { <Verse verse=verse.clone()/> })}
                {secondary_verse.map(|verse| view! { <div class="secondary"><Verse verse=verse.clone()/></div> })}
                <p class="muted">{cursor.label()}</p>
            </main>
            <footer class="button-row">
                <input type="button" value="Previous" disabled=!cursor.has_previous() on:click=move |_| go_previous()/>
                <input type="button" value="Next" disabled=!cursor.has_next() on:click=move |_| go_next()/>
            </footer>
        }
        .into_any()
    }
}

#[component]
fn Verse(verse: Segment) -> impl IntoView {
    view! {
        <p class="verse" class:chorus=verse.is_repeat()>
            { verse.content.lines().map(|line| view! { {line.to_owned()}<br/> }).collect::<Vec<_>>() }
        </p>
    }
}
