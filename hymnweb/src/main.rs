// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

mod data;
mod edithymn;
mod hymndisplay;
mod hymnlist;
mod model;
mod navigation;

use crate::{
    data::load_languages,
    hymndisplay::HymnDisplay,
    hymnlist::HymnList,
    model::{Catalog, EditLog, Preferences},
    navigation::NavBar,
};
use leptos::{prelude::*, server::codee::string::JsonSerdeCodec};
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};
use leptos_use::storage::use_local_storage;

fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    provide_meta_context();

    let (preferences, write_preferences, _) =
        use_local_storage::<Preferences, JsonSerdeCodec>("hymnverse-preferences");
    let (edits, write_edits, _) = use_local_storage::<EditLog, JsonSerdeCodec>("hymnverse-edits");
    let catalog = RwSignal::new(Catalog::default());

    // Fetch whichever languages the preferences call for.
    Effect::new(move |_| {
        load_languages(
            preferences.read().needed_languages(),
            catalog,
            edits,
            true,
        );
    });

    view! {
        <Title text="Hymnal"/>
        <div id="app" class:dark=move || preferences.read().dark_mode>
            <Router>
                <NavBar preferences write_preferences/>
                <p id="error">{ move || catalog.read().error().map(str::to_string) }</p>
                <Routes fallback=|| "Not found">
                    <Route path=path!("/") view=move || view! { <HymnList catalog preferences edits/> }/>
                    <Route path=path!("/hymn/:id") view=move || view! { <HymnDisplay catalog preferences edits write_edits/> }/>
                </Routes>
            </Router>
        </div>
    }
}
