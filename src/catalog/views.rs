//! Display-ready data. Everything here returns plain rows of primitive values
//! or small structs; laying them out as tables or text is the front-end's job.

use std::collections::HashMap;
use std::fmt;

use rusqlite::Connection;

use crate::catalog::EntityKind;
use crate::db;
use crate::error::Result;
use crate::models::{Album, Artist, Genre, Track};

/// Placeholder shown wherever a track has no genre.
pub const NO_GENRE: &str = "No genre";

/// What front-ends print in place of an empty listing or collection.
pub const NO_INFORMATION: &str = "No information available.";

/// Seconds as zero-padded `MM:SS`. Minutes are not wrapped into hours, so an
/// hour-long track reads `60:00`.
pub fn format_duration(secs: i64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// One cell of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
    Missing,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value}"),
            Value::Missing => write!(f, "-"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Option<i64>> for Value {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Value::Missing, Value::Int)
    }
}

/// Column headers plus rows, ready for a table widget. The first column of
/// every listing is the entity id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Value>>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Id of the entity shown on `row`, if the row exists.
    pub fn id_at(&self, row: usize) -> Option<i64> {
        match self.rows.get(row)?.first()? {
            Value::Int(id) => Some(*id),
            _ => None,
        }
    }
}

/// The table for one entity kind, rows in storage order.
pub fn listing(conn: &Connection, kind: EntityKind) -> Result<Listing> {
    match kind {
        EntityKind::Genre => genre_listing(conn),
        EntityKind::Artist => artist_listing(conn),
        EntityKind::Album => album_listing(conn),
        EntityKind::Track => track_listing(conn),
    }
}

pub fn genre_listing(conn: &Connection) -> Result<Listing> {
    let rows = db::fetch_all::<Genre>(conn)?
        .into_iter()
        .map(|genre| vec![genre.id.into(), genre.name.into()])
        .collect();
    Ok(Listing {
        headers: vec!["ID", "Name"],
        rows,
    })
}

pub fn artist_listing(conn: &Connection) -> Result<Listing> {
    let rows = db::fetch_all::<Artist>(conn)?
        .into_iter()
        .map(|artist| vec![artist.id.into(), artist.name.into()])
        .collect();
    Ok(Listing {
        headers: vec!["ID", "Name"],
        rows,
    })
}

pub fn album_listing(conn: &Connection) -> Result<Listing> {
    let rows = db::fetch_all::<Album>(conn)?
        .into_iter()
        .map(|album| {
            vec![
                album.id.into(),
                album.name.into(),
                album.release_year.into(),
            ]
        })
        .collect();
    Ok(Listing {
        headers: vec!["ID", "Name", "Year"],
        rows,
    })
}

/// Every track with its credited artists, album, year, `MM:SS` duration and
/// genre.
pub fn track_listing(conn: &Connection) -> Result<Listing> {
    let albums: HashMap<i64, Album> = db::fetch_all::<Album>(conn)?
        .into_iter()
        .map(|album| (album.id, album))
        .collect();
    let genres = genre_names(conn)?;

    let mut rows = Vec::new();
    for track in db::fetch_all::<Track>(conn)? {
        let artists = joined_artist_names(conn, track.id)?;
        let album = albums.get(&track.album_id);
        rows.push(vec![
            track.id.into(),
            track.name.into(),
            artists.into(),
            album.map_or(Value::Missing, |album| album.name.clone().into()),
            album.and_then(|album| album.release_year).into(),
            format_duration(track.duration_secs).into(),
            genre_label(&genres, track.genre_id).into(),
        ]);
    }

    Ok(Listing {
        headers: vec!["ID", "Track", "Artist", "Album", "Year", "Duration", "Genre"],
        rows,
    })
}

/// The "whole collection" view: every artist with their albums and tracks,
/// then every compilation with per-track artists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionView {
    /// All four tables are empty; nothing to tabulate.
    Empty,
    Populated(Collection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub artists: Vec<ArtistSection>,
    pub compilations: Vec<CompilationSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistSection {
    pub artist: Artist,
    pub albums: Vec<AlbumSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumSection {
    pub album: Album,
    pub tracks: Vec<TrackLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLine {
    pub track_number: i64,
    pub name: String,
    pub duration_secs: i64,
    /// Genre name or [`NO_GENRE`].
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationSection {
    pub album: Album,
    pub tracks: Vec<CompilationTrackLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationTrackLine {
    pub track_number: i64,
    pub name: String,
    /// Names of every artist linked to the track, joined with ", ".
    pub artists: String,
    /// `MM:SS`.
    pub duration: String,
    pub genre: String,
}

/// `Empty` when all four tables are empty, so front-ends can print a single
/// placeholder instead of empty sections.
pub fn collection_view(conn: &Connection) -> Result<CollectionView> {
    if db::is_empty(conn)? {
        return Ok(CollectionView::Empty);
    }

    let genres = genre_names(conn)?;

    let mut artists = Vec::new();
    for artist in db::fetch_all::<Artist>(conn)? {
        let mut albums = Vec::new();
        for album in db::albums_for_artist(conn, artist.id)? {
            let tracks = db::tracks_for_album(conn, album.id)?
                .into_iter()
                .map(|track| TrackLine {
                    track_number: track.track_number,
                    genre: genre_label(&genres, track.genre_id),
                    name: track.name,
                    duration_secs: track.duration_secs,
                })
                .collect();
            albums.push(AlbumSection { album, tracks });
        }
        artists.push(ArtistSection { artist, albums });
    }

    let mut compilations = Vec::new();
    for album in db::compilation_albums(conn)? {
        let mut tracks = Vec::new();
        for track in db::tracks_for_album(conn, album.id)? {
            tracks.push(CompilationTrackLine {
                track_number: track.track_number,
                artists: joined_artist_names(conn, track.id)?,
                duration: format_duration(track.duration_secs),
                genre: genre_label(&genres, track.genre_id),
                name: track.name,
            });
        }
        compilations.push(CompilationSection { album, tracks });
    }

    Ok(CollectionView::Populated(Collection {
        artists,
        compilations,
    }))
}

fn genre_names(conn: &Connection) -> Result<HashMap<i64, String>> {
    Ok(db::fetch_all::<Genre>(conn)?
        .into_iter()
        .map(|genre| (genre.id, genre.name))
        .collect())
}

fn genre_label(genres: &HashMap<i64, String>, genre_id: Option<i64>) -> String {
    genre_id
        .and_then(|id| genres.get(&id).cloned())
        .unwrap_or_else(|| NO_GENRE.to_string())
}

fn joined_artist_names(conn: &Connection, track_id: i64) -> Result<String> {
    let names: Vec<String> = db::artists_for_track(conn, track_id)?
        .into_iter()
        .map(|artist| artist.name)
        .collect();
    Ok(names.join(", "))
}
