// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Classification of individual lines of raw hymn lyrics.

use regex::Regex;
use std::sync::LazyLock;

static UPPERCASE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*_]*[A-Z]{5,}[*_]*:[*_]*\s*(.*)$").unwrap());
static VERSE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^verse(\s*\d+|\s+[a-z]+)?\s*[:.]?$").unwrap());
static CHORUS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^chorus(\s*\d+|\s+[a-z]+)?\s*[:.]?$").unwrap());
static LIST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

/// What a single line of lyrics is, as far as segmentation is concerned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineKind<'a> {
    Blank,
    /// A line introducing a chorus. `rest` is whatever followed the label on the same line.
    ChorusMarker { rest: &'a str },
    /// A structural line which is dropped from the output.
    Filtered(FilterReason),
    Content(&'a str),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterReason {
    /// A markdown heading such as `### 12. Title`.
    Heading,
    /// An explicit label such as `Verse 2` or `Verse One`.
    VerseLabel,
    /// A line starting with bold markup, used for annotations.
    Emphasis,
    /// A plain `Chorus` label, possibly numbered, which isn't recognised as a chorus marker.
    ChorusLabel,
    /// A line starting with a list number such as `1.`.
    ListNumber,
}

/// Decides what kind each line of a hymn is.
///
/// Lines are passed in already trimmed.
pub trait LineClassifier {
    fn classify<'a>(&self, line: &'a str) -> LineKind<'a>;
}

impl<C: LineClassifier + ?Sized> LineClassifier for &C {
    fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        (**self).classify(line)
    }
}

/// Policy for recognising the line which starts a chorus.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ChorusMarker {
    /// An all-caps label of at least five letters followed by a colon, optionally wrapped in
    /// emphasis markup, e.g. `**CHORUS:**`, `**CHORUS**:` or `REFRAIN:`.
    #[default]
    UppercaseLabel,
    /// A line starting with exactly the given text, e.g. `**CHORUS:**`.
    Exact(String),
}

impl ChorusMarker {
    /// Returns the rest of the line after the marker, if the line is a chorus marker.
    pub fn strip<'a>(&self, line: &'a str) -> Option<&'a str> {
        match self {
            Self::UppercaseLabel => {
                let captures = UPPERCASE_LABEL.captures(line)?;
                Some(captures.get(1).map_or("", |rest| rest.as_str()))
            }
            Self::Exact(prefix) => line.strip_prefix(prefix.as_str()).map(str::trim_start),
        }
    }
}

/// Classifier for the loosely markdown-formatted lyrics found in hymnal data files.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MarkdownClassifier {
    pub chorus_marker: ChorusMarker,
}

impl MarkdownClassifier {
    pub fn new(chorus_marker: ChorusMarker) -> Self {
        Self { chorus_marker }
    }
}

impl LineClassifier for MarkdownClassifier {
    fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if line.is_empty() {
            LineKind::Blank
        } else if let Some(rest) = self.chorus_marker.strip(line) {
            LineKind::ChorusMarker { rest }
        } else if line.starts_with('#') {
            LineKind::Filtered(FilterReason::Heading)
        } else if VERSE_LABEL.is_match(line) {
            LineKind::Filtered(FilterReason::VerseLabel)
        } else if line.starts_with("**") || line.starts_with("__") {
            LineKind::Filtered(FilterReason::Emphasis)
        } else if CHORUS_LABEL.is_match(line) {
            LineKind::Filtered(FilterReason::ChorusLabel)
        } else if LIST_NUMBER.is_match(line) {
            LineKind::Filtered(FilterReason::ListNumber)
        } else {
            LineKind::Content(line)
        }
    }
}
