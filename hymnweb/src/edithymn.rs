// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::model::{Catalog, EditLog};
use hymnal::{HymnEdit, HymnRecord, Language, parse_verses};
use leptos::prelude::*;
use web_sys::SubmitEvent;

/// Form for changing the title and lyrics of a hymn.
#[component]
pub fn EditHymn(
    language: Language,
    record: HymnRecord,
    catalog: RwSignal<Catalog>,
    edits: Signal<EditLog>,
    write_edits: WriteSignal<EditLog>,
    write_editing: WriteSignal<bool>,
) -> impl IntoView {
    let (title, write_title) = signal(record.title.clone());
    let (markdown, write_markdown) = signal(record.markdown.clone());
    let (error, write_error) = signal(None);
    let verse_count = move || parse_verses(&markdown.read()).len();

    let id = record.id;
    let history = edits
        .read_untracked()
        .changes_for(&language, &id)
        .into_iter()
        .map(|change| {
            view! {
                <li>{change.changed_at.format("%Y-%m-%d %H:%M").to_string()} ": " {change.field.to_string()}</li>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <h2>"Edit hymn"</h2>
        <form class="tall" on:submit=move |event| {
            let edit = HymnEdit {
                title: title.get(),
                markdown: markdown.get(),
            };
            save_hymn(event, &language, &id, edit, catalog, write_edits, write_error, write_editing)
        }>
            <label for="title">"Title"</label>
            <input type="text" id="title" prop:value=title on:input:target=move |event| write_title.set(event.target().value())/>
            <label for="lyrics">"Lyrics"</label>
            <textarea id="lyrics" class="tall" prop:value=markdown on:input:target=move |event| write_markdown.set(event.target().value())></textarea>
            <p class="muted">{move || format!("{} verses", verse_count())}</p>
            <p id="error">{error}</p>
            <div class="button-row">
                <input type="submit" value="Save"/>
                <input type="button" value="Cancel" on:click=move |_| write_editing.set(false)/>
            </div>
        </form>
        <h3>"Changes made on this device"</h3>
        <ul class="history">{history}</ul>
    }
}

#[allow(clippy::too_many_arguments)]
fn save_hymn(
    event: SubmitEvent,
    language: &Language,
    id: &str,
    edit: HymnEdit,
    catalog: RwSignal<Catalog>,
    write_edits: WriteSignal<EditLog>,
    write_error: WriteSignal<Option<String>>,
    write_editing: WriteSignal<bool>,
) {
    event.prevent_default();

    match catalog.try_update(|catalog| catalog.save(language, id, edit)) {
        Some(Ok((record, changes))) => {
            gloo_console::log!(format!(
                "Saved hymn {} with {} changed fields",
                record.id,
                changes.len()
            ));
            write_error.set(None);
            write_edits.update(|edits| edits.record(language, record, changes));
            write_editing.set(false);
        }
        Some(Err(e)) => write_error.set(Some(e.to_string())),
        None => {}
    }
}
