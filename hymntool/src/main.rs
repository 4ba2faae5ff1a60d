// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

mod data;

use crate::data::DataDir;
use clap::{Parser, Subcommand};
use eyre::{OptionExt, Report, WrapErr};
use hymnal::{
    Change, ChorusMarker, Hymn, HymnEdit, HymnStore, Language, MarkdownClassifier, SearchHit,
    Segment, VerseParser,
};
use std::{
    fs::read_to_string,
    io::{self, Read, Write, stdin, stdout},
    path::PathBuf,
};

/// The chorus marker which `--exact-chorus` matches.
const EXACT_CHORUS_MARKER: &str = "**CHORUS:**";

fn main() -> Result<(), Report> {
    pretty_env_logger::init();

    let args = Args::parse();
    let data_dir = DataDir::new(&args.data_dir);
    let mut out = stdout().lock();

    match args.command {
        Command::Parse {
            path,
            json,
            exact_chorus,
        } => {
            let raw = match path {
                Some(path) => read_to_string(&path)
                    .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut raw = String::new();
                    stdin().read_to_string(&mut raw)?;
                    raw
                }
            };
            let segments = if exact_chorus {
                VerseParser::new(MarkdownClassifier::new(ChorusMarker::Exact(
                    EXACT_CHORUS_MARKER.to_string(),
                )))
                .parse(&raw)
            } else {
                hymnal::parse_verses(&raw)
            };
            if json {
                print_json(&mut out, &segments)?;
            } else {
                print_segments(&mut out, &segments)?;
            }
        }
        Command::List { language } => {
            let store = data_dir.load(&[language.clone()])?;
            for record in store.all(&language)? {
                writeln!(out, "{}\t{}\t{}", record.number, record.id, record.title)?;
            }
        }
        Command::Show { language, id, json } => {
            let store = data_dir.load(&[language.clone()])?;
            let record = store
                .find(&language, &id)?
                .ok_or_eyre(format!("Hymn {id} not found in {language} hymnal"))?;
            let parser: VerseParser = VerseParser::default();
            let hymn = parser.parse_hymn(record);
            if json {
                print_json(&mut out, &hymn)?;
            } else {
                print_hymn(&mut out, &hymn)?;
            }
        }
        Command::Search { query, language } => {
            let store = data_dir.load_all()?;
            print_hits(&mut out, &store.search_all(&query, &language)?)?;
        }
        Command::Edit {
            language,
            id,
            title,
            lyrics,
        } => {
            let mut store = data_dir.load(&[language.clone()])?;
            let record = store
                .find(&language, &id)?
                .ok_or_eyre(format!("Hymn {id} not found in {language} hymnal"))?;
            let mut edit = HymnEdit::from_record(&record);
            if let Some(title) = title {
                edit.title = title;
            }
            if let Some(lyrics) = lyrics {
                edit.markdown = read_to_string(&lyrics)
                    .wrap_err_with(|| format!("Failed to read {}", lyrics.display()))?;
            }
            let logged_before = store.changes(&language, &record.id).len();
            let saved = store.edit(&language, &record.id, edit)?;
            data_dir.save(&store, &language)?;
            let changed = store.changes(&language, &saved.id).len() - logged_before;
            writeln!(out, "Saved {} ({changed} fields changed)", saved.id)?;
        }
        Command::History { language, id } => {
            let store = data_dir.load(&[language.clone()])?;
            let id = store
                .find(&language, &id)?
                .map_or(id, |record| record.id);
            print_changes(&mut out, &store.changes(&language, &id))?;
        }
    }

    Ok(())
}

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Tool for working with hymnal data files.")]
struct Args {
    /// Directory containing a JSON file of hymns for each language.
    #[arg(long, global = true, env = "HYMNAL_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Split the lyrics in the given file, or standard input, into verses.
    Parse {
        path: Option<PathBuf>,
        /// Print the verses as JSON.
        #[arg(long)]
        json: bool,
        /// Only recognise choruses marked with exactly `**CHORUS:**`.
        #[arg(long)]
        exact_chorus: bool,
    },
    /// List all hymns in the given language.
    List { language: Language },
    /// Print a hymn, looked up by ID or number.
    Show {
        language: Language,
        id: String,
        /// Print the hymn and its verses as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Search the hymns of all languages, listing those in the given language first.
    Search {
        query: String,
        #[arg(long, default_value = "english")]
        language: Language,
    },
    /// Change the title or lyrics of a hymn, logging the change.
    Edit {
        language: Language,
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// File containing the new lyrics.
        #[arg(long)]
        lyrics: Option<PathBuf>,
    },
    /// Print the logged changes to a hymn.
    History { language: Language, id: String },
}

fn print_json<T: serde::Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), Report> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_segments(out: &mut impl Write, segments: &[Segment]) -> io::Result<()> {
    for segment in segments {
        match segment.number {
            Some(number) => writeln!(out, "{number}:")?,
            None => writeln!(out, "(repeat)")?,
        }
        writeln!(out, "{}", segment.content)?;
        writeln!(out)?;
    }
    Ok(())
}

fn print_hymn(out: &mut impl Write, hymn: &Hymn) -> io::Result<()> {
    writeln!(out, "= {} =", hymn.record.title)?;
    writeln!(out, "Hymn {}", hymn.record.number)?;
    writeln!(out)?;
    print_segments(out, &hymn.verses)
}

fn print_hits(out: &mut impl Write, hits: &[SearchHit]) -> io::Result<()> {
    for hit in hits {
        writeln!(
            out,
            "{}\t{}\t{}",
            hit.language, hit.record.number, hit.record.title
        )?;
    }
    Ok(())
}

fn print_changes(out: &mut impl Write, changes: &[Change]) -> io::Result<()> {
    for change in changes {
        writeln!(
            out,
            "{}\t{}\t{:?} -> {:?}",
            change.changed_at.to_rfc3339(),
            change.field,
            change.old_value,
            change.new_value
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use hymnal::ChangedField;

    fn printed(print: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        print(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn segments() {
        let segments = hymnal::parse_verses("One\n\nCHORUS: Refrain\n\nTwo");
        assert_eq!(
            printed(|out| print_segments(out, &segments)),
            "1:\nOne\n\n2:\nChorus: Refrain\n\n3:\nTwo\n\n(repeat)\nChorus: Refrain\n\n"
        );
    }

    #[test]
    fn hymn_header() {
        let parser: VerseParser = VerseParser::default();
        let hymn = parser.parse_hymn(hymnal::HymnRecord::new(
            &Language::default(),
            7,
            "Title",
            "Words",
        ));
        assert_eq!(
            printed(|out| print_hymn(out, &hymn)),
            "= Title =\nHymn 7\n\n1:\nWords\n\n"
        );
    }

    #[test]
    fn changes() {
        let changes = [Change {
            hymn_id: "english-1".to_string(),
            language: Language::default(),
            field: ChangedField::Title,
            old_value: "Old".to_string(),
            new_value: "New".to_string(),
            changed_at: DateTime::<Utc>::UNIX_EPOCH,
        }];
        assert_eq!(
            printed(|out| print_changes(out, &changes)),
            "1970-01-01T00:00:00+00:00\ttitle\t\"Old\" -> \"New\"\n"
        );
    }

    #[test]
    fn parse_args() {
        let args = Args::try_parse_from([
            "hymntool",
            "--data-dir",
            "/tmp/hymns",
            "show",
            "Swahili",
            "12",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.data_dir, PathBuf::from("/tmp/hymns"));
        match args.command {
            Command::Show { language, id, json } => {
                assert_eq!(language.as_str(), "swahili");
                assert_eq!(id, "12");
                assert!(json);
            }
            command => panic!("Unexpected command {command:?}"),
        }
    }
}
