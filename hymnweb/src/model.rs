// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use hymnal::{
    Change, Hymn, HymnCache, HymnEdit, HymnRecord, HymnStore, Language, MemoryStore, SearchHit,
    Segment, StoreError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Display settings, persisted in local storage.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, rename = "isDarkMode")]
    pub dark_mode: bool,
    #[serde(default, rename = "isDualMode")]
    pub dual_mode: bool,
    #[serde(default)]
    pub primary_language: Language,
    #[serde(default)]
    pub secondary_language: Option<Language>,
}

impl Preferences {
    /// Returns the secondary language if dual mode is on and it differs from the primary.
    pub fn dual_language(&self) -> Option<&Language> {
        self.secondary_language
            .as_ref()
            .filter(|language| self.dual_mode && **language != self.primary_language)
    }

    /// Returns the languages whose hymns need to be loaded to show the current view.
    pub fn needed_languages(&self) -> Vec<Language> {
        let mut languages = vec![self.primary_language.clone()];
        languages.extend(self.dual_language().cloned());
        languages
    }

    /// Returns the languages searched from the hymn list, with the primary language first.
    pub fn search_languages(&self) -> Vec<Language> {
        let mut languages = vec![self.primary_language.clone()];
        languages.extend(
            Language::available()
                .into_iter()
                .filter(|language| *language != self.primary_language),
        );
        languages
    }
}

/// Edits made in this browser, persisted in local storage and applied over the fetched data.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EditLog {
    #[serde(default)]
    pub records: Vec<(Language, HymnRecord)>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

impl EditLog {
    /// Remembers the saved version of a hymn along with the changes which produced it.
    pub fn record(&mut self, language: &Language, record: HymnRecord, changes: Vec<Change>) {
        match self
            .records
            .iter_mut()
            .find(|(existing_language, existing)| {
                existing_language == language && existing.id == record.id
            }) {
            Some((_, existing)) => *existing = record,
            None => self.records.push((language.clone(), record)),
        }
        self.changes.extend(changes);
    }

    /// Returns the edited records for the given language.
    pub fn records_for<'a>(
        &'a self,
        language: &'a Language,
    ) -> impl Iterator<Item = &'a HymnRecord> + 'a {
        self.records
            .iter()
            .filter(move |(record_language, _)| record_language == language)
            .map(|(_, record)| record)
    }

    pub fn changes_for(&self, language: &Language, hymn_id: &str) -> Vec<&Change> {
        self.changes
            .iter()
            .filter(|change| &change.language == language && change.hymn_id == hymn_id)
            .collect()
    }
}

/// All hymns fetched so far, both as records and parsed for display.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    store: MemoryStore,
    cache: HymnCache,
    pending: BTreeSet<Language>,
    error: Option<String>,
}

impl Catalog {
    /// Marks the language as being fetched. Returns false if it is already loaded or pending.
    pub fn start_loading(&mut self, language: &Language) -> bool {
        if self.store.has_language(language) || self.pending.contains(language) {
            false
        } else {
            self.pending.insert(language.clone());
            true
        }
    }

    /// Forgets that a language was being fetched, so that it can be tried again.
    ///
    /// If `error` is given it is kept to show to the user until the next language loads.
    pub fn loading_failed(&mut self, language: &Language, error: Option<String>) {
        self.pending.remove(language);
        if error.is_some() {
            self.error = error;
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Adds the fetched hymns for a language, with any local edits applied.
    pub fn add_language(&mut self, language: &Language, records: Vec<HymnRecord>, edits: &EditLog) {
        self.pending.remove(language);
        self.error = None;
        self.store.load_language(language, records);
        for record in edits.records_for(language) {
            self.store.put(language, record.clone());
        }
        self.cache.invalidate(language);
        if let Err(e) = self.cache.get_or_load_from(&self.store, language) {
            log_store_error(&e);
        }
    }

    pub fn is_loaded(&self, language: &Language) -> bool {
        self.store.has_language(language)
    }

    pub fn hymns(&self, language: &Language) -> &[Hymn] {
        self.cache.get(language).unwrap_or_default()
    }

    /// Looks up a hymn by ID, falling back to the number at the end of the ID.
    pub fn hymn(&self, language: &Language, id: &str) -> Option<&Hymn> {
        self.cache.hymn(language, id)
    }

    pub fn hymn_by_number(&self, language: &Language, number: u32) -> Option<&Hymn> {
        self.hymns(language)
            .iter()
            .find(|hymn| hymn.record.number == number)
    }

    /// Searches all loaded languages, with the primary language first.
    pub fn search(&self, query: &str, primary: &Language) -> Vec<SearchHit> {
        self.store
            .search_all(query, primary)
            .unwrap_or_else(|e| {
                log_store_error(&e);
                Vec::new()
            })
    }

    /// Applies an edit to a hymn and re-parses it, returning the saved record and the changes
    /// logged for it.
    pub fn save(
        &mut self,
        language: &Language,
        id: &str,
        edit: HymnEdit,
    ) -> Result<(HymnRecord, Vec<Change>), StoreError> {
        let logged_before = self.store.change_log().len();
        let saved = self.store.edit(language, id, edit)?;
        let changes = self.store.change_log()[logged_before..].to_vec();
        self.cache.update(language, saved.clone());
        Ok((saved, changes))
    }
}

fn log_store_error(error: &StoreError) {
    gloo_console::error!(error.to_string());
}

/// Position within the verses of the hymn being displayed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VerseCursor {
    pub index: usize,
    pub count: usize,
}

impl VerseCursor {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.count
    }

    pub fn previous(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
            ..self
        }
    }

    pub fn next(self) -> Self {
        if self.has_next() {
            Self {
                index: self.index + 1,
                ..self
            }
        } else {
            self
        }
    }

    /// Adjusts the cursor for a new number of verses, e.g. after the lyrics are edited.
    pub fn with_count(self, count: usize) -> Self {
        Self {
            index: self.index.min(count.saturating_sub(1)),
            count,
        }
    }

    /// Returns the verse at the cursor, if there is one.
    pub fn verse<'a>(&self, hymn: &'a Hymn) -> Option<&'a Segment> {
        hymn.verses.get(self.index)
    }

    /// Returns a label such as "Verse 2 of 5", or `None` if there are no verses.
    pub fn label(&self) -> Option<String> {
        (self.count > 0).then(|| format!("Verse {} of {}", self.index + 1, self.count))
    }
}
