// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::{
    store::{HymnStore, StoreError},
    types::{Hymn, HymnRecord, Language, number_from_id},
    verses::VerseParser,
};
use log::debug;
use std::collections::BTreeMap;

/// Parsed hymns for each language which has been loaded so far.
///
/// Owned by whatever is displaying hymns, so separate instances never share state.
#[derive(Clone, Debug, Default)]
pub struct HymnCache {
    parser: VerseParser,
    hymnals: BTreeMap<Language, Vec<Hymn>>,
}

impl HymnCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache which parses lyrics with the given parser.
    pub fn with_parser(parser: VerseParser) -> Self {
        Self {
            parser,
            hymnals: BTreeMap::new(),
        }
    }

    /// Returns the hymns for the given language, calling `load` to fetch them only if they aren't
    /// already cached.
    pub fn get_or_load<E>(
        &mut self,
        language: &Language,
        load: impl FnOnce(&Language) -> Result<Vec<HymnRecord>, E>,
    ) -> Result<&[Hymn], E> {
        if !self.hymnals.contains_key(language) {
            debug!("Loading hymns for {language} into cache");
            let hymns = load(language)?
                .into_iter()
                .map(|record| self.parser.parse_hymn(record))
                .collect();
            self.hymnals.insert(language.clone(), hymns);
        }
        Ok(self.hymnals[language].as_slice())
    }

    /// Like [`HymnCache::get_or_load`], loading from the given store.
    pub fn get_or_load_from(
        &mut self,
        store: &impl HymnStore,
        language: &Language,
    ) -> Result<&[Hymn], StoreError> {
        self.get_or_load(language, |language| store.all(language))
    }

    pub fn get(&self, language: &Language) -> Option<&[Hymn]> {
        self.hymnals.get(language).map(Vec::as_slice)
    }

    /// Returns a cached hymn by ID, falling back to the number at the end of the ID.
    pub fn hymn(&self, language: &Language, id: &str) -> Option<&Hymn> {
        let hymns = self.hymnals.get(language)?;
        hymns
            .iter()
            .find(|hymn| hymn.record.id == id)
            .or_else(|| {
                let number = number_from_id(id)?;
                hymns.iter().find(|hymn| hymn.record.number == number)
            })
    }

    /// Re-parses a saved record and puts it in the cache, if its language is cached.
    pub fn update(&mut self, language: &Language, mut record: HymnRecord) -> Option<&Hymn> {
        let hymns = self.hymnals.get_mut(language)?;
        record.fill_id(language);
        let hymn = self.parser.parse_hymn(record);
        let id = hymn.record.id.clone();
        match hymns.iter_mut().find(|existing| existing.record.id == id) {
            Some(existing) => *existing = hymn,
            None => {
                hymns.push(hymn);
                hymns.sort_by_key(|hymn| hymn.record.number);
            }
        }
        hymns.iter().find(|hymn| hymn.record.id == id)
    }

    pub fn invalidate(&mut self, language: &Language) {
        self.hymnals.remove(language);
    }

    pub fn clear(&mut self) {
        self.hymnals.clear();
    }
}
