// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Parsing of hymn lyrics into verses, and storage of per-language hymn catalogs.
//!
//! Hymns are stored with their lyrics as loosely formatted markdown text, and split into
//! [`Segment`]s each time they are displayed:
//!
//! ```
//! use hymnal::{Segment, parse_verses};
//!
//! let verses = parse_verses("Verse 1\nFirst line\n\n**CHORUS:**\nSing it\n\nSecond verse");
//! assert_eq!(
//!     verses,
//!     vec![
//!         Segment::numbered(1, "First line"),
//!         Segment::numbered(2, "Chorus: \nSing it"),
//!         Segment::numbered(3, "Second verse"),
//!         Segment::repeat("Chorus: \nSing it"),
//!     ]
//! );
//! ```

pub mod cache;
pub mod classify;
pub mod store;
pub mod types;
pub mod verses;

pub use crate::{
    cache::HymnCache,
    classify::{ChorusMarker, LineClassifier, MarkdownClassifier},
    store::{HymnStore, MemoryStore, SearchHit, StoreError},
    types::{Change, ChangedField, EditError, Hymn, HymnEdit, HymnRecord, Language, Segment},
    verses::{VerseParser, parse_optional, parse_verses},
};
