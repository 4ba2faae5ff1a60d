// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Loading and saving hymnal data files.

use eyre::{Report, WrapErr, bail};
use hymnal::{Change, HymnRecord, Language, MemoryStore};
use log::{debug, info};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

const CHANGES_FILE: &str = "changes.json";

/// A directory containing a `{language}.json` file for each language, and `changes.json`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataDir {
    path: PathBuf,
}

impl DataDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn language_path(&self, language: &Language) -> PathBuf {
        self.path.join(format!("{language}.json"))
    }

    fn changes_path(&self) -> PathBuf {
        self.path.join(CHANGES_FILE)
    }

    /// Returns the languages which have a data file, in order.
    pub fn languages(&self) -> Result<Vec<Language>, Report> {
        let mut languages = Vec::new();
        for entry in fs::read_dir(&self.path)
            .wrap_err_with(|| format!("Failed to read data directory {}", self.path.display()))?
        {
            let path = entry?.path();
            if path.extension().is_none_or(|extension| extension != "json")
                || path.file_name().is_some_and(|name| name == CHANGES_FILE)
            {
                continue;
            }
            if let Some(language) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse().ok())
            {
                languages.push(language);
            }
        }
        languages.sort();
        Ok(languages)
    }

    /// Loads the given languages and the change log into a new store.
    pub fn load(&self, languages: &[Language]) -> Result<MemoryStore, Report> {
        let mut store = MemoryStore::new();
        for language in languages {
            let records: Vec<HymnRecord> = read_json(&self.language_path(language))
                .wrap_err_with(|| format!("Failed to load hymns for {language}"))?;
            store.load_language(language, records);
        }
        store.extend_changes(self.load_changes()?);
        Ok(store)
    }

    /// Loads every language with a data file.
    pub fn load_all(&self) -> Result<MemoryStore, Report> {
        self.load(&self.languages()?)
    }

    fn load_changes(&self) -> Result<Vec<Change>, Report> {
        let path = self.changes_path();
        match read_json(&path) {
            Ok(changes) => Ok(changes),
            Err(e) if is_not_found(&e) => {
                debug!("No change log at {}", path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.wrap_err("Failed to load change log")),
        }
    }

    /// Writes the hymns for the given language and the change log back to the directory.
    pub fn save(&self, store: &MemoryStore, language: &Language) -> Result<(), Report> {
        let Some(records) = store.records(language) else {
            bail!("No hymns loaded for language {language}");
        };
        write_json(&self.language_path(language), records)?;
        write_json(&self.changes_path(), store.change_log())?;
        info!(
            "Saved {} hymns for {language} to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Report> {
    let file =
        File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .wrap_err_with(|| format!("Failed to parse {}", path.display()))
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Report> {
    let file =
        File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn is_not_found(report: &Report) -> bool {
    report
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|e| e.kind() == ErrorKind::NotFound)
}
