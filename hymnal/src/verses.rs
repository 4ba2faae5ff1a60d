// Copyright 2026 The hymnal Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Splitting raw hymn lyrics into numbered verses and repeated choruses.
//!
//! Blank lines separate blocks. Each block becomes one [`Segment`], numbered in order. A block
//! containing a chorus marker is remembered as the chorus, and from then on a copy of it (without
//! a number) follows every ordinary verse.

use crate::{
    classify::{LineClassifier, LineKind, MarkdownClassifier},
    types::{Hymn, HymnRecord, Segment},
};
use log::{debug, trace};
use std::mem::take;

/// Text which replaces the chorus marker at the start of a chorus.
pub const CHORUS_PREFIX: &str = "Chorus: ";

/// Parses raw lyrics with the default [`MarkdownClassifier`].
pub fn parse_verses(raw: &str) -> Vec<Segment> {
    let parser: VerseParser = VerseParser::default();
    parser.parse(raw)
}

/// Like [`parse_verses`], but treats missing lyrics as empty.
pub fn parse_optional(raw: Option<&str>) -> Vec<Segment> {
    raw.map(parse_verses).unwrap_or_default()
}

#[derive(Clone, Debug, Default)]
pub struct VerseParser<C = MarkdownClassifier> {
    classifier: C,
}

impl<C: LineClassifier> VerseParser<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Splits the given lyrics into segments in display order.
    ///
    /// Never fails: lines which don't fit the expected structure are either dropped or treated as
    /// lyrics.
    pub fn parse(&self, raw: &str) -> Vec<Segment> {
        let mut segmenter = Segmenter::default();
        for line in raw.lines() {
            segmenter.step(self.classifier.classify(line.trim()));
        }
        let segments = segmenter.finish();
        debug!("Parsed {} segments", segments.len());
        segments
    }

    /// Parses the lyrics of the given record for display.
    pub fn parse_hymn(&self, record: HymnRecord) -> Hymn {
        let verses = self.parse(&record.markdown);
        Hymn { record, verses }
    }
}

/// The block of lines currently being gathered.
#[derive(Debug, Default)]
enum Block {
    #[default]
    Idle,
    Verse(Vec<String>),
    Chorus(Vec<String>),
}

#[derive(Debug)]
struct Segmenter {
    block: Block,
    /// The most recently closed chorus.
    chorus: Option<String>,
    next_number: u32,
    segments: Vec<Segment>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            block: Block::Idle,
            chorus: None,
            next_number: 1,
            segments: Vec::new(),
        }
    }
}

impl Segmenter {
    fn step(&mut self, kind: LineKind) {
        match kind {
            LineKind::Blank => self.close(),
            LineKind::ChorusMarker { rest } => {
                let mut lines = match take(&mut self.block) {
                    Block::Idle => Vec::new(),
                    Block::Verse(lines) | Block::Chorus(lines) => lines,
                };
                lines.push(format!("{CHORUS_PREFIX}{rest}"));
                self.block = Block::Chorus(lines);
            }
            LineKind::Filtered(reason) => trace!("Dropping {reason:?} line"),
            LineKind::Content(line) => match &mut self.block {
                Block::Idle => self.block = Block::Verse(vec![line.to_owned()]),
                Block::Verse(lines) | Block::Chorus(lines) => lines.push(line.to_owned()),
            },
        }
    }

    /// Emits the current block, if any, and goes back to idle.
    fn close(&mut self) {
        match take(&mut self.block) {
            Block::Idle => {}
            Block::Verse(lines) => {
                let Some(content) = join_lines(&lines) else {
                    return;
                };
                let number = self.take_number();
                self.segments.push(Segment::numbered(number, content));
                if let Some(chorus) = &self.chorus {
                    self.segments.push(Segment::repeat(chorus.clone()));
                }
            }
            Block::Chorus(lines) => {
                let Some(content) = join_lines(&lines) else {
                    return;
                };
                let number = self.take_number();
                trace!("Captured chorus as segment {number}");
                self.segments.push(Segment::numbered(number, content.clone()));
                self.chorus = Some(content);
            }
        }
    }

    fn take_number(&mut self) -> u32 {
        let number = self.next_number;
        self.next_number += 1;
        number
    }

    fn finish(mut self) -> Vec<Segment> {
        self.close();
        self.segments
    }
}

fn join_lines(lines: &[String]) -> Option<String> {
    let content = lines.join("\n");
    let content = content.trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ChorusMarker;

    #[test]
    fn empty() {
        assert_eq!(parse_verses(""), vec![]);
        assert_eq!(parse_verses("\n\n  \n\t\n"), vec![]);
        assert_eq!(parse_optional(None), vec![]);
    }

    #[test]
    fn plain_verses() {
        assert_eq!(
            parse_verses("Line one\nLine two\n\nLine three"),
            vec![
                Segment::numbered(1, "Line one\nLine two"),
                Segment::numbered(2, "Line three"),
            ]
        );
    }

    #[test]
    fn chorus_after_first_verse() {
        let text = "### Heading\nVerse 1\nFirst line\n\n**CHORUS:**\nChorus line one\nChorus line two\n\nSecond verse line\n";
        let chorus = "Chorus: \nChorus line one\nChorus line two";
        assert_eq!(
            parse_verses(text),
            vec![
                Segment::numbered(1, "First line"),
                Segment::numbered(2, chorus),
                Segment::numbered(3, "Second verse line"),
                Segment::repeat(chorus),
            ]
        );
    }

    #[test]
    fn only_heading() {
        assert_eq!(parse_verses("### Heading\n"), vec![]);
        assert_eq!(parse_verses("# 1\n1. \nVerse 2\n**Tune: Old 100th**\n"), vec![]);
    }

    #[test]
    fn no_trailing_blank_line() {
        assert_eq!(
            parse_optional(Some("Only verse text")),
            vec![Segment::numbered(1, "Only verse text")]
        );
    }

    #[test]
    fn chorus_first() {
        assert_eq!(
            parse_verses("CHORUS: Sing it\nAgain\n\nOne\n\nTwo\n"),
            vec![
                Segment::numbered(1, "Chorus: Sing it\nAgain"),
                Segment::numbered(2, "One"),
                Segment::repeat("Chorus: Sing it\nAgain"),
                Segment::numbered(3, "Two"),
                Segment::repeat("Chorus: Sing it\nAgain"),
            ]
        );
    }

    #[test]
    fn later_chorus_replaces_earlier() {
        assert_eq!(
            parse_verses("One\n\nREFRAIN: A\n\nTwo\n\nCHORUS: B\n\nThree"),
            vec![
                Segment::numbered(1, "One"),
                Segment::numbered(2, "Chorus: A"),
                Segment::numbered(3, "Two"),
                Segment::repeat("Chorus: A"),
                Segment::numbered(4, "Chorus: B"),
                Segment::numbered(5, "Three"),
                Segment::repeat("Chorus: B"),
            ]
        );
    }

    #[test]
    fn marker_inside_verse_makes_it_a_chorus() {
        assert_eq!(
            parse_verses("Verse line\n**CHORUS:** Refrain\n\nNext"),
            vec![
                Segment::numbered(1, "Verse line\nChorus: Refrain"),
                Segment::numbered(2, "Next"),
                Segment::repeat("Verse line\nChorus: Refrain"),
            ]
        );
    }

    #[test]
    fn emphasis_closed_before_colon() {
        assert_eq!(
            parse_verses("One\n\n**CHORUS**:\nRefrain\n\nTwo"),
            vec![
                Segment::numbered(1, "One"),
                Segment::numbered(2, "Chorus: \nRefrain"),
                Segment::numbered(3, "Two"),
                Segment::repeat("Chorus: \nRefrain"),
            ]
        );
    }

    #[test]
    fn worded_labels_are_dropped() {
        assert_eq!(
            parse_verses("Verse One\nA\n\nChorus 2\nB"),
            vec![Segment::numbered(1, "A"), Segment::numbered(2, "B")]
        );
    }

    #[test]
    fn filtered_lines_do_not_split_blocks() {
        assert_eq!(
            parse_verses("A\n2. numbered\nB\n### Heading\nC\n\n\n\nD"),
            vec![Segment::numbered(1, "A\nB\nC"), Segment::numbered(2, "D")]
        );
    }

    #[test]
    fn lines_are_trimmed() {
        assert_eq!(
            parse_verses("  Indented line  \r\n\tTabbed\r\n   \r\nNext\r\n"),
            vec![
                Segment::numbered(1, "Indented line\nTabbed"),
                Segment::numbered(2, "Next"),
            ]
        );
    }

    #[test]
    fn lowercase_label_is_not_a_chorus() {
        assert_eq!(
            parse_verses("One\n\nChorus:\nRefrain line\n\nTwo"),
            vec![
                Segment::numbered(1, "One"),
                Segment::numbered(2, "Refrain line"),
                Segment::numbered(3, "Two"),
            ]
        );
    }

    #[test]
    fn exact_marker_policy() {
        let parser = VerseParser::new(MarkdownClassifier::new(ChorusMarker::Exact(
            "**CHORUS:**".to_string(),
        )));
        assert_eq!(
            parser.parse("One\n\nREFRAIN: not a chorus\n\n**CHORUS:**\nHoly\n\nTwo"),
            vec![
                Segment::numbered(1, "One"),
                Segment::numbered(2, "REFRAIN: not a chorus"),
                Segment::numbered(3, "Chorus: \nHoly"),
                Segment::numbered(4, "Two"),
                Segment::repeat("Chorus: \nHoly"),
            ]
        );
    }

    #[test]
    fn parse_hymn_keeps_record() {
        let record = HymnRecord {
            id: "english-5".to_string(),
            number: 5,
            title: "Title".to_string(),
            markdown: "Text".to_string(),
        };
        let parser: VerseParser = VerseParser::default();
        let hymn = parser.parse_hymn(record.clone());
        assert_eq!(hymn.record, record);
        assert_eq!(hymn.verses, vec![Segment::numbered(1, "Text")]);
    }
}
