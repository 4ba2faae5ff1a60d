// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// The languages the hymnal ships data files for.
pub const AVAILABLE_LANGUAGES: [&str; 14] = [
    "chichewa", "dholuo", "english", "ndebele", "pt", "sdah", "shona", "sotho", "swahili", "tonga",
    "tswana", "venda", "xhosa", "xitsonga",
];

/// The key of a per-language hymnal, always lowercase.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns all languages in [`AVAILABLE_LANGUAGES`].
    pub fn available() -> Vec<Language> {
        AVAILABLE_LANGUAGES
            .iter()
            .map(|language| Language(language.to_string()))
            .collect()
    }
}

impl Default for Language {
    fn default() -> Self {
        Self("english".to_string())
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(ParseLanguageError::Empty)
        } else if s.contains(|c: char| c.is_whitespace() || c == '/') {
            Err(ParseLanguageError::Invalid(s.to_string()))
        } else {
            Ok(Self(s.to_lowercase()))
        }
    }
}

impl TryFrom<String> for Language {
    type Error = ParseLanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseLanguageError {
    #[error("Language must not be empty")]
    Empty,
    #[error("Invalid language {0:?}")]
    Invalid(String),
}

/// A hymn as it is persisted: the raw lyrics are never stored in parsed form.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct HymnRecord {
    /// Unique within a language. Data files may leave this out, in which case it is filled in by
    /// [`HymnRecord::fill_id`].
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub number: u32,
    pub title: String,
    /// The raw lyrics.
    #[serde(default)]
    pub markdown: String,
}

impl HymnRecord {
    pub fn new(language: &Language, number: u32, title: &str, markdown: &str) -> Self {
        Self {
            id: default_id(language, number),
            number,
            title: title.to_string(),
            markdown: markdown.to_string(),
        }
    }

    /// Sets the ID to the default for the given language if it is missing.
    pub fn fill_id(&mut self, language: &Language) {
        if self.id.is_empty() {
            self.id = default_id(language, self.number);
        }
    }
}

/// Returns the ID used for a hymn which doesn't have one of its own, e.g. `english-12`.
pub fn default_id(language: &Language, number: u32) -> String {
    format!("{language}-{number}")
}

/// Extracts the hymn number from an ID of the form returned by [`default_id`].
pub fn number_from_id(id: &str) -> Option<u32> {
    let (_, number) = id.rsplit_once('-')?;
    number.parse().ok()
}

/// One displayed unit of a hymn.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Segment {
    /// Set for verses and for the first capture of a chorus, unset for repeats of the chorus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub content: String,
}

impl Segment {
    pub fn numbered(number: u32, content: impl Into<String>) -> Self {
        Self {
            number: Some(number),
            content: content.into(),
        }
    }

    pub fn repeat(content: impl Into<String>) -> Self {
        Self {
            number: None,
            content: content.into(),
        }
    }

    /// Returns whether this segment is a repetition of an earlier chorus.
    pub fn is_repeat(&self) -> bool {
        self.number.is_none()
    }
}

/// A hymn ready for display, with its lyrics parsed into segments.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Hymn {
    #[serde(flatten)]
    pub record: HymnRecord,
    pub verses: Vec<Segment>,
}

/// The field of a hymn which a [`Change`] refers to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangedField {
    Title,
    Markdown,
}

impl Display for ChangedField {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Markdown => f.write_str("markdown"),
        }
    }
}

/// An entry in the audit log of edits to hymns.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub hymn_id: String,
    pub language: Language,
    #[serde(rename = "fieldChanged")]
    pub field: ChangedField,
    pub old_value: String,
    pub new_value: String,
    pub changed_at: DateTime<Utc>,
}

/// The fields of a hymn which may be edited.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct HymnEdit {
    pub title: String,
    pub markdown: String,
}

impl HymnEdit {
    pub fn from_record(record: &HymnRecord) -> Self {
        Self {
            title: record.title.clone(),
            markdown: record.markdown.clone(),
        }
    }

    /// Checks that neither the title nor the lyrics are blank.
    pub fn validate(&self) -> Result<(), EditError> {
        if self.title.trim().is_empty() {
            Err(EditError::EmptyTitle)
        } else if self.markdown.trim().is_empty() {
            Err(EditError::EmptyContent)
        } else {
            Ok(())
        }
    }

    /// Validates the edit and returns a copy of the given record with it applied.
    pub fn apply_to(self, record: &HymnRecord) -> Result<HymnRecord, EditError> {
        self.validate()?;
        Ok(HymnRecord {
            title: self.title,
            markdown: self.markdown,
            ..record.clone()
        })
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EditError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Hymn content cannot be empty")]
    EmptyContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_is_lowercased() {
        assert_eq!(
            " Swahili ".parse::<Language>().unwrap(),
            Language("swahili".to_string())
        );
        assert_eq!("".parse::<Language>(), Err(ParseLanguageError::Empty));
        assert_eq!(
            "a/b".parse::<Language>(),
            Err(ParseLanguageError::Invalid("a/b".to_string()))
        );
    }

    #[test]
    fn record_without_id() {
        let mut record: HymnRecord =
            serde_json::from_str(r#"{"number": 12, "title": "Title", "markdown": "Text"}"#)
                .unwrap();
        assert_eq!(record.id, "");
        record.fill_id(&"Shona".parse().unwrap());
        assert_eq!(record.id, "shona-12");
        assert_eq!(number_from_id(&record.id), Some(12));
    }

    #[test]
    fn number_from_odd_ids() {
        assert_eq!(number_from_id("12"), None);
        assert_eq!(number_from_id("english-"), None);
        assert_eq!(number_from_id("pt-br-3"), Some(3));
    }

    #[test]
    fn segment_json_omits_missing_number() {
        assert_eq!(
            serde_json::to_string(&Segment::repeat("Chorus")).unwrap(),
            r#"{"content":"Chorus"}"#
        );
        assert_eq!(
            serde_json::to_string(&Segment::numbered(2, "Verse")).unwrap(),
            r#"{"number":2,"content":"Verse"}"#
        );
    }

    #[test]
    fn edit_validation() {
        let record = HymnRecord::new(&Language::default(), 1, "Old", "Old text");
        assert_eq!(
            HymnEdit {
                title: "  ".to_string(),
                markdown: "Text".to_string(),
            }
            .apply_to(&record),
            Err(EditError::EmptyTitle)
        );
        assert_eq!(
            HymnEdit {
                title: "Title".to_string(),
                markdown: "\n\n".to_string(),
            }
            .validate(),
            Err(EditError::EmptyContent)
        );
        let updated = HymnEdit {
            title: "New".to_string(),
            markdown: "New text".to_string(),
        }
        .apply_to(&record)
        .unwrap();
        assert_eq!(updated.id, "english-1");
        assert_eq!(updated.title, "New");
        assert_eq!(updated.markdown, "New text");
    }

    #[test]
    fn change_field_names() {
        let change = Change {
            hymn_id: "english-1".to_string(),
            language: Language::default(),
            field: ChangedField::Markdown,
            old_value: "a".to_string(),
            new_value: "b".to_string(),
            changed_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["hymnId"], "english-1");
        assert_eq!(json["fieldChanged"], "markdown");
        assert_eq!(json["language"], "english");
    }
}
