// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::model::Preferences;
use hymnal::Language;
use leptos::prelude::*;
use leptos_router::components::A;

/// Bar across the top of every page, for choosing languages and display mode.
#[component]
pub fn NavBar(
    preferences: Signal<Preferences>,
    write_preferences: WriteSignal<Preferences>,
) -> impl IntoView {
    let languages = Language::available();
    let secondary_languages = languages.clone();

    view! {
        <nav>
            <A href="/">"Hymnal"</A>
            <label>
                "Language "
                <select on:change:target=move |event| if let Ok(language) = event.target().value().parse() {
                    write_preferences.update(|preferences| preferences.primary_language = language);
                }
                prop:value=move || preferences.read().primary_language.to_string()>
                { languages.into_iter().map(|language| {
                    view! {
                        <option value=language.to_string()>{language.to_string()}</option>
                    }
                }).collect::<Vec<_>>() }
                </select>
            </label>
            <label>
                <input type="checkbox" prop:checked=move || preferences.read().dual_mode
                    on:change:target=move |event| {
                        let checked = event.target().checked();
                        write_preferences.update(|preferences| preferences.dual_mode = checked);
                    } />
                "Dual"
            </label>
            <select disabled=move || !preferences.read().dual_mode
                on:change:target=move |event| {
                    let language = event.target().value().parse().ok();
                    write_preferences.update(|preferences| preferences.secondary_language = language);
                }
                prop:value=move || preferences.read().secondary_language.as_ref().map(Language::to_string).unwrap_or_default()>
                <option value="">"Secondary language"</option>
                {move || {
                    let primary = preferences.read().primary_language.clone();
                    secondary_languages.iter().filter(|language| **language != primary).map(|language| {
                        view! {
                            <option value=language.to_string()>{language.to_string()}</option>
                        }
                    }).collect::<Vec<_>>()
                }}
            </select>
            <label>
                <input type="checkbox" prop:checked=move || preferences.read().dark_mode
                    on:change:target=move |event| {
                        let checked = event.target().checked();
                        write_preferences.update(|preferences| preferences.dark_mode = checked);
                    } />
                "Dark mode"
            </label>
        </nav>
    }
}
