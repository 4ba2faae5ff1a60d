// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Storage of per-language hymn catalogs, with a log of edits.

use crate::types::{
    Change, ChangedField, EditError, HymnEdit, HymnRecord, Language, number_from_id,
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StoreError {
    #[error("No hymns loaded for language {0}")]
    UnknownLanguage(Language),
    #[error("Hymn {id} not found in {language} hymnal")]
    NotFound { language: Language, id: String },
    #[error("{0}")]
    InvalidEdit(#[from] EditError),
}

/// A search result, tagged with the language it was found in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SearchHit {
    pub language: Language,
    #[serde(flatten)]
    pub record: HymnRecord,
}

/// Access to hymn records, keyed by language.
pub trait HymnStore {
    /// Returns the languages which have hymns loaded, in order.
    fn languages(&self) -> Vec<Language>;

    /// Returns all hymns for the given language, sorted by number.
    fn all(&self, language: &Language) -> Result<Vec<HymnRecord>, StoreError>;

    fn by_id(&self, language: &Language, id: &str) -> Result<Option<HymnRecord>, StoreError>;

    fn by_number(
        &self,
        language: &Language,
        number: u32,
    ) -> Result<Option<HymnRecord>, StoreError>;

    /// Returns the hymns matching the given query according to [`matches_query`], sorted by
    /// number.
    fn search(&self, language: &Language, query: &str) -> Result<Vec<HymnRecord>, StoreError>;

    /// Inserts or updates the given record, logging a [`Change`] for each field which differs
    /// from the stored version. Returns the record as stored.
    fn save(
        &mut self,
        language: &Language,
        record: HymnRecord,
    ) -> Result<HymnRecord, StoreError>;

    /// Returns the logged changes to the given hymn, oldest first.
    fn changes(&self, language: &Language, hymn_id: &str) -> Vec<Change>;

    /// Looks up a hymn by ID, falling back to the number at the end of an ID like `english-12`.
    fn find(&self, language: &Language, id: &str) -> Result<Option<HymnRecord>, StoreError> {
        if let Some(record) = self.by_id(language, id)? {
            return Ok(Some(record));
        }
        match number_from_id(id).or_else(|| id.parse().ok()) {
            Some(number) => self.by_number(language, number),
            None => Ok(None),
        }
    }

    /// Applies the given edit to an existing hymn and saves it.
    fn edit(
        &mut self,
        language: &Language,
        id: &str,
        edit: HymnEdit,
    ) -> Result<HymnRecord, StoreError> {
        let record = self
            .find(language, id)?
            .ok_or_else(|| StoreError::NotFound {
                language: language.clone(),
                id: id.to_string(),
            })?;
        let record = edit.apply_to(&record)?;
        self.save(language, record)
    }

    /// Searches every language, with results for the primary language first and then the others
    /// in the order returned by [`HymnStore::languages`].
    fn search_all(&self, query: &str, primary: &Language) -> Result<Vec<SearchHit>, StoreError> {
        let mut hits = Vec::new();
        let languages = self.languages();
        let ordered = languages
            .iter()
            .filter(|language| *language == primary)
            .chain(languages.iter().filter(|language| *language != primary));
        for language in ordered {
            hits.extend(
                self.search(language, query)?
                    .into_iter()
                    .map(|record| SearchHit {
                        language: language.clone(),
                        record,
                    }),
            );
        }
        Ok(hits)
    }
}

/// Returns whether the given hymn should be included in results for the given search query.
///
/// A blank query matches nothing. Otherwise the title and lyrics are matched case-insensitively,
/// and the number as a decimal string.
pub fn matches_query(record: &HymnRecord, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return false;
    }
    let query = query.to_lowercase();
    record.title.to_lowercase().contains(&query)
        || record.markdown.to_lowercase().contains(&query)
        || record.number.to_string().contains(&query)
}

/// A [`HymnStore`] which keeps everything in memory.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MemoryStore {
    #[serde(default)]
    hymnals: BTreeMap<Language, Vec<HymnRecord>>,
    #[serde(default)]
    changes: Vec<Change>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all hymns for the given language, filling in missing IDs.
    pub fn load_language(&mut self, language: &Language, mut records: Vec<HymnRecord>) {
        for record in &mut records {
            record.fill_id(language);
        }
        records.sort_by_key(|record| record.number);
        info!("Loaded {} hymns for {language}", records.len());
        self.hymnals.insert(language.clone(), records);
    }

    pub fn has_language(&self, language: &Language) -> bool {
        self.hymnals.contains_key(language)
    }

    /// Returns the hymns for the given language without copying them.
    pub fn records(&self, language: &Language) -> Option<&[HymnRecord]> {
        self.hymnals.get(language).map(Vec::as_slice)
    }

    /// Returns every logged change, oldest first.
    pub fn change_log(&self) -> &[Change] {
        &self.changes
    }

    /// Appends previously logged changes, e.g. when restoring from a file.
    pub fn extend_changes(&mut self, changes: impl IntoIterator<Item = Change>) {
        self.changes.extend(changes);
    }

    /// Inserts or replaces a record without logging any change.
    pub fn put(&mut self, language: &Language, mut record: HymnRecord) {
        record.fill_id(language);
        let records = self.hymnals.entry(language.clone()).or_default();
        if let Some(existing) = records.iter_mut().find(|existing| existing.id == record.id) {
            *existing = record;
        } else {
            records.push(record);
        }
        records.sort_by_key(|record| record.number);
    }

    /// Like [`HymnStore::save`], with the time to record for any changes.
    pub fn save_at(
        &mut self,
        language: &Language,
        mut record: HymnRecord,
        changed_at: DateTime<Utc>,
    ) -> HymnRecord {
        record.fill_id(language);
        let existing = self
            .hymnals
            .get(language)
            .and_then(|records| records.iter().find(|existing| existing.id == record.id));
        if let Some(existing) = existing {
            let mut changes = Vec::new();
            if existing.title != record.title {
                changes.push((ChangedField::Title, &existing.title, &record.title));
            }
            if existing.markdown != record.markdown {
                changes.push((ChangedField::Markdown, &existing.markdown, &record.markdown));
            }
            debug!(
                "Saving hymn {} in {language} with {} changed fields",
                record.id,
                changes.len()
            );
            let changes = changes
                .into_iter()
                .map(|(field, old_value, new_value)| Change {
                    hymn_id: record.id.clone(),
                    language: language.clone(),
                    field,
                    old_value: old_value.clone(),
                    new_value: new_value.clone(),
                    changed_at,
                })
                .collect::<Vec<_>>();
            self.changes.extend(changes);
        } else {
            debug!("Adding new hymn {} in {language}", record.id);
        }
        self.put(language, record.clone());
        record
    }

    fn hymnal(&self, language: &Language) -> Result<&[HymnRecord], StoreError> {
        self.records(language)
            .ok_or_else(|| StoreError::UnknownLanguage(language.clone()))
    }
}

impl HymnStore for MemoryStore {
    fn languages(&self) -> Vec<Language> {
        self.hymnals.keys().cloned().collect()
    }

    fn all(&self, language: &Language) -> Result<Vec<HymnRecord>, StoreError> {
        Ok(self.hymnal(language)?.to_vec())
    }

    fn by_id(&self, language: &Language, id: &str) -> Result<Option<HymnRecord>, StoreError> {
        Ok(self
            .hymnal(language)?
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    fn by_number(
        &self,
        language: &Language,
        number: u32,
    ) -> Result<Option<HymnRecord>, StoreError> {
        Ok(self
            .hymnal(language)?
            .iter()
            .find(|record| record.number == number)
            .cloned())
    }

    fn search(&self, language: &Language, query: &str) -> Result<Vec<HymnRecord>, StoreError> {
        Ok(self
            .hymnal(language)?
            .iter()
            .filter(|record| matches_query(record, query))
            .cloned()
            .collect())
    }

    fn save(
        &mut self,
        language: &Language,
        record: HymnRecord,
    ) -> Result<HymnRecord, StoreError> {
        Ok(self.save_at(language, record, Utc::now()))
    }

    fn changes(&self, language: &Language, hymn_id: &str) -> Vec<Change> {
        self.changes
            .iter()
            .filter(|change| &change.language == language && change.hymn_id == hymn_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> Language {
        "english".parse().unwrap()
    }

    fn swahili() -> Language {
        "swahili".parse().unwrap()
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.load_language(
            &english(),
            vec![
                HymnRecord {
                    id: String::new(),
                    number: 12,
                    title: "Amazing Grace".to_string(),
                    markdown: "Amazing grace, how sweet the sound".to_string(),
                },
                HymnRecord::new(&english(), 3, "Holy, Holy, Holy", "Lord God Almighty"),
                HymnRecord::new(&english(), 100, "Praise Him", "All people that on earth"),
            ],
        );
        store.load_language(
            &swahili(),
            vec![HymnRecord::new(
                &swahili(),
                12,
                "Neema ya Ajabu",
                "Neema ya ajabu, amazing",
            )],
        );
        store
    }

    #[test]
    fn all_sorted_by_number() {
        let numbers = store()
            .all(&english())
            .unwrap()
            .into_iter()
            .map(|record| record.number)
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![3, 12, 100]);
    }

    #[test]
    fn unknown_language() {
        let language = "klingon".parse().unwrap();
        assert_eq!(
            store().all(&language),
            Err(StoreError::UnknownLanguage(language))
        );
    }

    #[test]
    fn lookups() {
        let store = store();
        assert_eq!(
            store.by_id(&english(), "english-12").unwrap().unwrap().title,
            "Amazing Grace"
        );
        assert_eq!(store.by_id(&english(), "english-13").unwrap(), None);
        assert_eq!(
            store.by_number(&english(), 3).unwrap().unwrap().id,
            "english-3"
        );
        assert_eq!(
            store.find(&english(), "hymn-100").unwrap().unwrap().title,
            "Praise Him"
        );
        assert_eq!(store.find(&english(), "100").unwrap().unwrap().number, 100);
        assert_eq!(store.find(&english(), "nonsense").unwrap(), None);
    }

    #[test]
    fn search() {
        let store = store();
        let titles = |query| {
            store
                .search(&english(), query)
                .unwrap()
                .into_iter()
                .map(|record| record.title)
                .collect::<Vec<_>>()
        };
        assert_eq!(titles("GRACE"), vec!["Amazing Grace"]);
        assert_eq!(titles("almighty"), vec!["Holy, Holy, Holy"]);
        assert_eq!(titles("10"), vec!["Praise Him"]);
        assert_eq!(titles("   "), Vec::<String>::new());
    }

    #[test]
    fn search_all_puts_primary_first() {
        let hits = store().search_all("amazing", &swahili()).unwrap();
        assert_eq!(
            hits.iter()
                .map(|hit| (hit.language.as_str(), hit.record.number))
                .collect::<Vec<_>>(),
            vec![("swahili", 12), ("english", 12)]
        );
    }

    #[test]
    fn save_logs_changed_fields() {
        let mut store = store();
        let mut record = store.by_id(&english(), "english-3").unwrap().unwrap();
        record.markdown = "Early in the morning".to_string();
        let saved = store.save_at(&english(), record, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(saved.markdown, "Early in the morning");
        assert_eq!(
            store.changes(&english(), "english-3"),
            vec![Change {
                hymn_id: "english-3".to_string(),
                language: english(),
                field: ChangedField::Markdown,
                old_value: "Lord God Almighty".to_string(),
                new_value: "Early in the morning".to_string(),
                changed_at: DateTime::<Utc>::UNIX_EPOCH,
            }]
        );
        assert_eq!(
            store.by_number(&english(), 3).unwrap().unwrap().markdown,
            "Early in the morning"
        );

        // Saving again without differences logs nothing more.
        store.save(&english(), saved).unwrap();
        assert_eq!(store.change_log().len(), 1);
    }

    #[test]
    fn save_inserts_new_hymn() {
        let mut store = store();
        let saved = store
            .save(
                &english(),
                HymnRecord {
                    id: String::new(),
                    number: 7,
                    title: "New".to_string(),
                    markdown: "Text".to_string(),
                },
            )
            .unwrap();
        assert_eq!(saved.id, "english-7");
        assert!(store.change_log().is_empty());
        let numbers = store
            .records(&english())
            .unwrap()
            .iter()
            .map(|record| record.number)
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![3, 7, 12, 100]);
    }

    #[test]
    fn edit() {
        let mut store = store();
        let saved = store
            .edit(
                &english(),
                "english-12",
                HymnEdit {
                    title: "Amazing Grace!".to_string(),
                    markdown: "Amazing grace, how sweet the sound".to_string(),
                },
            )
            .unwrap();
        assert_eq!(saved.title, "Amazing Grace!");
        let changes = store.changes(&english(), "english-12");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, ChangedField::Title);
        assert_eq!(changes[0].old_value, "Amazing Grace");

        assert_eq!(
            store.edit(&english(), "english-12", HymnEdit::default()),
            Err(StoreError::InvalidEdit(EditError::EmptyTitle))
        );
        assert_eq!(
            store.edit(
                &english(),
                "english-99",
                HymnEdit {
                    title: "Title".to_string(),
                    markdown: "Text".to_string(),
                }
            ),
            Err(StoreError::NotFound {
                language: english(),
                id: "english-99".to_string(),
            })
        );
    }

    #[test]
    fn json_round_trip_keeps_change_log() {
        let mut store = store();
        store
            .edit(
                &swahili(),
                "swahili-12",
                HymnEdit {
                    title: "Neema".to_string(),
                    markdown: "Neema ya ajabu".to_string(),
                },
            )
            .unwrap();
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(serde_json::from_str::<MemoryStore>(&json).unwrap(), store);
    }
}
