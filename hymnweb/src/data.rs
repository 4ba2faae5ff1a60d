// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Fetching hymn data files from the server.

use crate::model::{Catalog, EditLog};
use gloo_net::http::Request;
use hymnal::{HymnRecord, Language};
use leptos::{prelude::*, task::spawn_local};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch hymns for {language}: {source}")]
    Request {
        language: Language,
        #[source]
        source: gloo_net::Error,
    },
    #[error("Failed to fetch hymns for {language}: HTTP {status}")]
    Status { language: Language, status: u16 },
}

/// Fetches `/data/{language}.json`.
pub async fn fetch_hymns(language: &Language) -> Result<Vec<HymnRecord>, FetchError> {
    let request_error = |source| FetchError::Request {
        language: language.clone(),
        source,
    };
    let response = Request::get(&format!("/data/{language}.json"))
        .send()
        .await
        .map_err(request_error)?;
    if !response.ok() {
        return Err(FetchError::Status {
            language: language.clone(),
            status: response.status(),
        });
    }
    response.json().await.map_err(request_error)
}

/// Starts fetching the given languages in the background, unless they are already loaded or
/// being loaded.
///
/// Failures are always logged, but only shown to the user if `show_errors` is set.
pub fn load_languages(
    languages: Vec<Language>,
    catalog: RwSignal<Catalog>,
    edits: Signal<EditLog>,
    show_errors: bool,
) {
    for language in languages {
        if !catalog.try_update(|catalog| catalog.start_loading(&language)).unwrap_or_default() {
            continue;
        }
        gloo_console::log!(format!("Fetching hymns for {language}"));
        spawn_local(async move {
            match fetch_hymns(&language).await {
                Ok(records) => {
                    let edits = edits.get_untracked();
                    catalog.update(|catalog| catalog.add_language(&language, records, &edits));
                }
                Err(e) => {
                    gloo_console::error!(e.to_string());
                    catalog.update(|catalog| {
                        catalog.loading_failed(&language, show_errors.then(|| e.to_string()))
                    });
                }
            }
        });
    }
}
