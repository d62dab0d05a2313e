//! Domain models that mirror the SQLite schema. These stay plain data holders;
//! relationship traversal lives in `db` so every query is visible in one place.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A performer. Linked to albums and tracks through the two association
/// tables, never through a column on its own row.
pub struct Artist {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A release. `compilation` decides whether tracks share the album's single
/// artist or each carry their own.
pub struct Album {
    pub id: i64,
    pub name: String,
    /// Unknown years are stored as NULL rather than a sentinel.
    pub release_year: Option<i64>,
    pub compilation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single song on exactly one album.
pub struct Track {
    pub id: i64,
    pub name: String,
    /// Length in whole seconds.
    pub duration_secs: i64,
    /// Position on the album as entered by the user; not required to be unique.
    pub track_number: i64,
    /// Owning album. The row disappears with it.
    pub album_id: i64,
    /// `None` means "no genre", including after the genre was deleted.
    pub genre_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Insert payload for an album row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlbum {
    pub name: String,
    pub release_year: Option<i64>,
    pub compilation: bool,
}

/// Insert payload for a track row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrack {
    pub name: String,
    pub duration_secs: i64,
    pub track_number: i64,
    pub album_id: i64,
    pub genre_id: Option<i64>,
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Album {
    /// `Name (1999)`, or just the name when the year is unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.release_year {
            Some(year) => write!(f, "{} ({year})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}. {}", self.track_number, self.name)
    }
}

impl Album {
    /// Label used in listings: "Compilation" or "Solo".
    pub fn kind_label(&self) -> &'static str {
        if self.compilation {
            "Compilation"
        } else {
            "Solo"
        }
    }
}
