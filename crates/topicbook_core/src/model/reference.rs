//! Scripture reference parsing and canonical rendering.
//!
//! # Responsibility
//! - Parse user-typed references (`gen 3:5`, `1 jn 2:1-3`) into `VerseRef`.
//! - Render references in one canonical form (`Genesis 3:5`).
//!
//! # Invariants
//! - Chapter and verse numbers are 1-based; zero is rejected.
//! - Chapters never exceed the book's chapter count.
//! - A range end is never before its start; a degenerate range collapses.
//!
//! Verse counts per chapter are not validated; that requires a versification
//! table which belongs to the Bible text layer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<book>(?:[1-3]\s*)?[A-Za-z][A-Za-z .]*?)\.?\s*(?P<chapter>\d+)(?::(?P<verse>\d+))?(?:\s*-\s*(?P<end_a>\d+)(?::(?P<end_b>\d+))?)?$",
    )
    .expect("valid reference regex")
});

struct BookInfo {
    name: &'static str,
    chapters: u16,
    aliases: &'static [&'static str],
}

const fn book(name: &'static str, chapters: u16, aliases: &'static [&'static str]) -> BookInfo {
    BookInfo {
        name,
        chapters,
        aliases,
    }
}

// Canonical order matters: prefix lookups take the first match.
const BOOKS: &[BookInfo] = &[
    book("Genesis", 50, &["gn"]),
    book("Exodus", 40, &["exo"]),
    book("Leviticus", 27, &["lv"]),
    book("Numbers", 36, &["nm"]),
    book("Deuteronomy", 34, &["dt"]),
    book("Joshua", 24, &["jsh"]),
    book("Judges", 21, &["jdg"]),
    book("Ruth", 4, &["rth"]),
    book("1 Samuel", 31, &["1sm"]),
    book("2 Samuel", 24, &["2sm"]),
    book("1 Kings", 22, &["1kgs"]),
    book("2 Kings", 25, &["2kgs"]),
    book("1 Chronicles", 29, &["1chr"]),
    book("2 Chronicles", 36, &["2chr"]),
    book("Ezra", 10, &[]),
    book("Nehemiah", 13, &[]),
    book("Esther", 10, &[]),
    book("Job", 42, &[]),
    book("Psalms", 150, &["ps", "psa", "psalm"]),
    book("Proverbs", 31, &["prv"]),
    book("Ecclesiastes", 12, &["qoh"]),
    book("Song of Solomon", 8, &["sos", "song", "songofsongs", "canticles"]),
    book("Isaiah", 66, &[]),
    book("Jeremiah", 52, &[]),
    book("Lamentations", 5, &[]),
    book("Ezekiel", 48, &["ezk"]),
    book("Daniel", 12, &[]),
    book("Hosea", 14, &[]),
    book("Joel", 3, &[]),
    book("Amos", 9, &[]),
    book("Obadiah", 1, &[]),
    book("Jonah", 4, &[]),
    book("Micah", 7, &[]),
    book("Nahum", 3, &[]),
    book("Habakkuk", 3, &[]),
    book("Zephaniah", 3, &[]),
    book("Haggai", 2, &[]),
    book("Zechariah", 14, &[]),
    book("Malachi", 4, &[]),
    book("Matthew", 28, &["mt"]),
    book("Mark", 16, &["mk", "mrk"]),
    book("Luke", 24, &["lk"]),
    book("John", 21, &["jn", "jhn"]),
    book("Acts", 28, &[]),
    book("Romans", 16, &[]),
    book("1 Corinthians", 16, &[]),
    book("2 Corinthians", 13, &[]),
    book("Galatians", 6, &[]),
    book("Ephesians", 6, &[]),
    book("Philippians", 4, &["php", "phil"]),
    book("Colossians", 4, &[]),
    book("1 Thessalonians", 5, &[]),
    book("2 Thessalonians", 3, &[]),
    book("1 Timothy", 6, &[]),
    book("2 Timothy", 4, &[]),
    book("Titus", 3, &[]),
    book("Philemon", 1, &["phm", "philem"]),
    book("Hebrews", 13, &[]),
    book("James", 5, &["jas"]),
    book("1 Peter", 5, &["1pt"]),
    book("2 Peter", 3, &["2pt"]),
    book("1 John", 5, &["1jn"]),
    book("2 John", 1, &["2jn"]),
    book("3 John", 1, &["3jn"]),
    book("Jude", 1, &[]),
    book("Revelation", 22, &["rv", "apocalypse"]),
];

/// Errors from reference parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// Input is blank after trim.
    Empty,
    /// Input does not look like `<book> <chapter>[:<verse>][-<end>]`.
    Malformed(String),
    /// Book name did not resolve to any canonical book.
    UnknownBook(String),
    /// Zero chapter/verse, chapter beyond the book, or end before start.
    InvalidRange(String),
}

impl Display for ReferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "reference must not be blank"),
            Self::Malformed(value) => write!(f, "malformed reference: `{value}`"),
            Self::UnknownBook(value) => write!(f, "unknown book: `{value}`"),
            Self::InvalidRange(value) => write!(f, "invalid reference range: `{value}`"),
        }
    }
}

impl Error for ReferenceError {}

/// End point of a reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeEnd {
    pub chapter: u16,
    /// `None` for whole-chapter ranges (`Psalms 23-24`).
    pub verse: Option<u16>,
}

/// Canonical scripture reference.
///
/// Serialized as its display string so stored snapshots stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerseRef {
    book: u8,
    chapter: u16,
    verse: Option<u16>,
    end: Option<RangeEnd>,
}

impl VerseRef {
    /// Parses a user-typed reference.
    ///
    /// # Errors
    /// - `Empty`/`Malformed` when the text has no recognizable shape.
    /// - `UnknownBook` when the book name does not resolve.
    /// - `InvalidRange` when numbers are zero, out of the book, or reversed.
    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ReferenceError::Empty);
        }
        let captures = REFERENCE_RE
            .captures(trimmed)
            .ok_or_else(|| ReferenceError::Malformed(trimmed.to_string()))?;

        let book_text = &captures["book"];
        let book = resolve_book(book_text)
            .ok_or_else(|| ReferenceError::UnknownBook(book_text.trim().to_string()))?;

        let number = |name: &str| -> Result<Option<u16>, ReferenceError> {
            captures
                .name(name)
                .map(|value| {
                    value
                        .as_str()
                        .parse::<u16>()
                        .map_err(|_| ReferenceError::InvalidRange(trimmed.to_string()))
                })
                .transpose()
        };

        let mut chapter = number("chapter")?.unwrap_or_default();
        let mut verse = number("verse")?;
        let end_a = number("end_a")?;
        let end_b = number("end_b")?;

        let mut end = match (verse, end_a, end_b) {
            (_, None, _) => None,
            (Some(_), Some(end_verse), None) => Some(RangeEnd {
                chapter,
                verse: Some(end_verse),
            }),
            (Some(_), Some(end_chapter), Some(end_verse)) => Some(RangeEnd {
                chapter: end_chapter,
                verse: Some(end_verse),
            }),
            (None, Some(end_chapter), None) => Some(RangeEnd {
                chapter: end_chapter,
                verse: None,
            }),
            (None, Some(_), Some(_)) => return Err(ReferenceError::Malformed(trimmed.to_string())),
        };

        // A bare number in a one-chapter book names a verse.
        if BOOKS[book].chapters == 1 && verse.is_none() {
            verse = Some(chapter);
            chapter = 1;
            end = end.map(|value| RangeEnd {
                chapter: 1,
                verse: Some(value.chapter),
            });
        }

        let reference = Self {
            book: book as u8,
            chapter,
            verse,
            end,
        };
        reference.validate(trimmed)
    }

    /// Canonical book name, e.g. `1 John`.
    pub fn book_name(&self) -> &'static str {
        BOOKS[self.book as usize].name
    }

    pub fn chapter(&self) -> u16 {
        self.chapter
    }

    pub fn verse(&self) -> Option<u16> {
        self.verse
    }

    pub fn end(&self) -> Option<RangeEnd> {
        self.end
    }

    /// Returns whether the reference spans more than one verse or chapter.
    pub fn is_range(&self) -> bool {
        self.end.is_some()
    }

    fn validate(mut self, input: &str) -> Result<Self, ReferenceError> {
        let invalid = || ReferenceError::InvalidRange(input.to_string());
        let chapters = BOOKS[self.book as usize].chapters;

        if self.chapter == 0 || self.chapter > chapters || self.verse == Some(0) {
            return Err(invalid());
        }
        if let Some(end) = self.end {
            if end.chapter == 0 || end.chapter > chapters || end.verse == Some(0) {
                return Err(invalid());
            }
            let start_key = (self.chapter, self.verse.unwrap_or(0));
            let end_key = (end.chapter, end.verse.unwrap_or(0));
            if end_key < start_key {
                return Err(invalid());
            }
            if end_key == start_key {
                self.end = None;
            }
        }
        Ok(self)
    }
}

impl Display for VerseRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.book_name(), self.chapter)?;
        if let Some(verse) = self.verse {
            write!(f, ":{verse}")?;
        }
        match (self.verse, self.end) {
            (_, None) => Ok(()),
            (Some(_), Some(RangeEnd {
                chapter,
                verse: Some(end_verse),
            })) if chapter == self.chapter => write!(f, "-{end_verse}"),
            (_, Some(RangeEnd {
                chapter,
                verse: Some(end_verse),
            })) => write!(f, "-{chapter}:{end_verse}"),
            (_, Some(RangeEnd {
                chapter,
                verse: None,
            })) => write!(f, "-{chapter}"),
        }
    }
}

impl FromStr for VerseRef {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VerseRef {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<VerseRef> for String {
    fn from(value: VerseRef) -> Self {
        value.to_string()
    }
}

fn normalize_book_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

fn resolve_book(value: &str) -> Option<usize> {
    let key = normalize_book_key(value);
    if key.is_empty() {
        return None;
    }

    let keys = BOOKS
        .iter()
        .map(|info| normalize_book_key(info.name))
        .collect::<Vec<_>>();

    if let Some(index) = keys.iter().position(|name| *name == key) {
        return Some(index);
    }
    if let Some(index) = BOOKS
        .iter()
        .position(|info| info.aliases.contains(&key.as_str()))
    {
        return Some(index);
    }
    keys.iter().position(|name| name.starts_with(key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::{resolve_book, RangeEnd, ReferenceError, VerseRef};

    #[test]
    fn abbreviated_book_renders_canonical_name() {
        let reference = VerseRef::parse("gen 3:5").expect("valid reference");
        assert_eq!(reference.to_string(), "Genesis 3:5");
        assert_eq!(reference.chapter(), 3);
        assert_eq!(reference.verse(), Some(5));
        assert!(!reference.is_range());
    }

    #[test]
    fn aliases_win_over_prefix_matches() {
        assert_eq!(VerseRef::parse("jn 3:16").unwrap().book_name(), "John");
        assert_eq!(VerseRef::parse("1 jn 1:9").unwrap().book_name(), "1 John");
        assert_eq!(VerseRef::parse("php 4:13").unwrap().book_name(), "Philippians");
        assert_eq!(VerseRef::parse("jude 3").unwrap().book_name(), "Jude");
    }

    #[test]
    fn prefix_match_takes_canonical_order() {
        assert_eq!(resolve_book("jo"), Some(5));
        assert_eq!(resolve_book("Rev."), Some(65));
        assert_eq!(resolve_book("xyz"), None);
    }

    #[test]
    fn ranges_render_compactly() {
        assert_eq!(
            VerseRef::parse("rom 8:28-30").unwrap().to_string(),
            "Romans 8:28-30"
        );
        assert_eq!(
            VerseRef::parse("Matt 5:3 - 7:29").unwrap().to_string(),
            "Matthew 5:3-7:29"
        );
        assert_eq!(VerseRef::parse("ps 23-24").unwrap().to_string(), "Psalms 23-24");
        assert_eq!(VerseRef::parse("ps 23").unwrap().to_string(), "Psalms 23");
    }

    #[test]
    fn range_end_keeps_chapter_and_verse() {
        assert_eq!(
            VerseRef::parse("Matt 5:3 - 7:29").unwrap().end(),
            Some(RangeEnd {
                chapter: 7,
                verse: Some(29)
            })
        );
        assert_eq!(
            VerseRef::parse("ps 23-24").unwrap().end(),
            Some(RangeEnd {
                chapter: 24,
                verse: None
            })
        );
        assert_eq!(
            VerseRef::parse("jude 3-5").unwrap().end(),
            Some(RangeEnd {
                chapter: 1,
                verse: Some(5)
            })
        );
        assert_eq!(VerseRef::parse("gen 3:5").unwrap().end(), None);
    }

    #[test]
    fn degenerate_range_collapses() {
        let reference = VerseRef::parse("Genesis 1:1-1").unwrap();
        assert!(!reference.is_range());
        assert_eq!(reference.to_string(), "Genesis 1:1");
    }

    #[test]
    fn single_chapter_books_read_bare_number_as_verse() {
        let reference = VerseRef::parse("Jude 3").unwrap();
        assert_eq!(reference.chapter(), 1);
        assert_eq!(reference.verse(), Some(3));
        assert_eq!(reference.to_string(), "Jude 1:3");
        assert_eq!(
            VerseRef::parse("philem 4-7").unwrap().to_string(),
            "Philemon 1:4-7"
        );
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(VerseRef::parse("   "), Err(ReferenceError::Empty));
        assert!(matches!(
            VerseRef::parse("genesis"),
            Err(ReferenceError::Malformed(_))
        ));
        assert!(matches!(
            VerseRef::parse("hezekiah 1:1"),
            Err(ReferenceError::UnknownBook(_))
        ));
        assert!(matches!(
            VerseRef::parse("gen 51:1"),
            Err(ReferenceError::InvalidRange(_))
        ));
        assert!(matches!(
            VerseRef::parse("gen 3:0"),
            Err(ReferenceError::InvalidRange(_))
        ));
        assert!(matches!(
            VerseRef::parse("gen 3:5-2"),
            Err(ReferenceError::InvalidRange(_))
        ));
    }
}
